//! Configuration loading, validation, and management for Praias.
//!
//! Loads configuration from `~/.praias/config.toml` (or the file named by
//! `PRAIAS_CONFIG`) with environment variable overrides. Validates all
//! settings at startup. Everything is read once and then passed explicitly
//! into the retriever, the registry, and the gateway.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.praias/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default max tokens per LLM response
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// AWS region, credentials, and endpoint overrides
    #[serde(default)]
    pub aws: AwsConfig,

    /// Knowledge-base retrieval settings
    #[serde(default)]
    pub knowledge_base: KnowledgeBaseConfig,

    /// Logical model id → provider model id table
    #[serde(default)]
    pub models: ModelsConfig,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,
}

fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    1024
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    #[serde(default = "default_region")]
    pub region: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_access_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,

    /// Override for `https://bedrock-runtime.{region}.amazonaws.com`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrock_runtime_endpoint: Option<String>,

    /// Override for `https://bedrock-agent-runtime.{region}.amazonaws.com`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_runtime_endpoint: Option<String>,
}

fn default_region() -> String {
    "us-east-1".into()
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            bedrock_runtime_endpoint: None,
            agent_runtime_endpoint: None,
        }
    }
}

impl std::fmt::Debug for AwsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsConfig")
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &redact(&self.secret_access_key))
            .field("session_token", &redact(&self.session_token))
            .field("bedrock_runtime_endpoint", &self.bedrock_runtime_endpoint)
            .field("agent_runtime_endpoint", &self.agent_runtime_endpoint)
            .finish()
    }
}

impl AwsConfig {
    /// Both halves of a static credential pair are present.
    pub fn has_credentials(&self) -> bool {
        self.access_key_id.as_deref().is_some_and(|s| !s.is_empty())
            && self.secret_access_key.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Base URL of the model-serving API.
    pub fn bedrock_runtime_url(&self) -> String {
        self.bedrock_runtime_endpoint
            .clone()
            .unwrap_or_else(|| format!("https://bedrock-runtime.{}.amazonaws.com", self.region))
    }

    /// Base URL of the knowledge-base retrieval API.
    pub fn agent_runtime_url(&self) -> String {
        self.agent_runtime_endpoint.clone().unwrap_or_else(|| {
            format!("https://bedrock-agent-runtime.{}.amazonaws.com", self.region)
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseConfig {
    /// Default knowledge-base id. Absent = retrieval disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Number of passages requested per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Characters of passage text kept in each source snippet
    #[serde(default = "default_snippet_chars")]
    pub snippet_chars: usize,
}

fn default_top_k() -> usize {
    5
}
fn default_snippet_chars() -> usize {
    200
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            id: None,
            top_k: default_top_k(),
            snippet_chars: default_snippet_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Logical model id → provider model id
    #[serde(default = "default_model_table")]
    pub table: BTreeMap<String, String>,

    /// Entry whose output gets reasoning extraction
    #[serde(default = "default_reasoning_model")]
    pub reasoning_model: String,

    /// Tag wrapping reasoning in that entry's raw output
    #[serde(default = "default_reasoning_tag")]
    pub reasoning_tag: String,

    /// Entry used to title conversations
    #[serde(default = "default_title_model")]
    pub title_model: String,
}

const NOVA_MICRO: &str = "amazon.nova-micro-v1:0";

fn default_model_table() -> BTreeMap<String, String> {
    ["chat-model", "chat-model-reasoning", "title-model", "artifact-model"]
        .into_iter()
        .map(|id| (id.to_string(), NOVA_MICRO.to_string()))
        .collect()
}
fn default_reasoning_model() -> String {
    "chat-model-reasoning".into()
}
fn default_reasoning_tag() -> String {
    "think".into()
}
fn default_title_model() -> String {
    "title-model".into()
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            table: default_model_table(),
            reasoning_model: default_reasoning_model(),
            reasoning_tag: default_reasoning_tag(),
            title_model: default_title_model(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Origins allowed by CORS. Empty = same-origin only.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

fn default_port() -> u16 {
    3000
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            allowed_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `PRAIAS_CONFIG` or the default path
    /// (~/.praias/config.toml), then apply environment overrides:
    /// - `AWS_REGION`
    /// - `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_SESSION_TOKEN`
    /// - `KNOWLEDGE_BASE_ID`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = std::env::var("PRAIAS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::config_path());
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup` (usually `std::env::var`).
    ///
    /// Empty values are treated as unset.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(region) = get("AWS_REGION") {
            self.aws.region = region;
        }
        if let Some(key_id) = get("AWS_ACCESS_KEY_ID") {
            self.aws.access_key_id = Some(key_id);
        }
        if let Some(secret) = get("AWS_SECRET_ACCESS_KEY") {
            self.aws.secret_access_key = Some(secret);
        }
        if let Some(token) = get("AWS_SESSION_TOKEN") {
            self.aws.session_token = Some(token);
        }
        if let Some(kb_id) = get("KNOWLEDGE_BASE_ID") {
            self.knowledge_base.id = Some(kb_id);
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".praias")
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_temperature < 0.0 || self.default_temperature > 1.0 {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 1.0".into(),
            ));
        }

        if self.knowledge_base.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "knowledge_base.top_k must be > 0".into(),
            ));
        }

        if self.models.table.is_empty() {
            return Err(ConfigError::ValidationError(
                "models.table must define at least one model".into(),
            ));
        }

        for (role, id) in [
            ("reasoning_model", &self.models.reasoning_model),
            ("title_model", &self.models.title_model),
        ] {
            if !self.models.table.contains_key(id) {
                return Err(ConfigError::ValidationError(format!(
                    "models.{role} '{id}' is not in models.table"
                )));
            }
        }

        if self.models.reasoning_tag.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "models.reasoning_tag must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Whether a default knowledge base is configured.
    pub fn has_knowledge_base(&self) -> bool {
        self.knowledge_base.id.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            aws: AwsConfig::default(),
            knowledge_base: KnowledgeBaseConfig::default(),
            models: ModelsConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
