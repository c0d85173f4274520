//! Amazon Bedrock provider implementation.
//!
//! Uses the Bedrock Runtime Converse API directly over HTTPS.
//!
//! Features:
//! - SigV4 request signing (service `bedrock`)
//! - System prompt as top-level `system` content blocks
//! - Consecutive same-role turns merged, as Converse requires alternation
//! - Token usage and stop reason mapped into the response

use async_trait::async_trait;
use praias_core::error::ProviderError;
use praias_core::message::{Message, Role};
use praias_core::provider::*;
use praias_security::{Credentials, SignableRequest, SigningScope};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const SIGNING_SERVICE: &str = "bedrock";

/// Bedrock Converse API provider.
pub struct BedrockProvider {
    name: String,
    base_url: String,
    region: String,
    credentials: Option<Credentials>,
    client: reqwest::Client,
}

impl BedrockProvider {
    /// Create a provider for `region` using the public runtime endpoint.
    pub fn new(region: impl Into<String>, credentials: Option<Credentials>) -> Self {
        let region = region.into();
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: "bedrock".into(),
            base_url: format!("https://bedrock-runtime.{region}.amazonaws.com"),
            region,
            credentials,
            client,
        }
    }

    /// Create from the `[aws]` config section.
    pub fn from_config(aws: &praias_config::AwsConfig) -> Self {
        Self::new(&aws.region, Credentials::from_config(aws)).with_base_url(aws.bedrock_runtime_url())
    }

    /// Create with a custom base URL (e.g., for testing or VPC endpoints).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Extract system messages from the message list.
    /// Converse takes the system prompt as a top-level field, not in messages.
    fn extract_system(messages: &[Message]) -> (Vec<SystemBlock>, Vec<&Message>) {
        let mut system = Vec::new();
        let mut rest = Vec::new();

        for msg in messages {
            match msg.role {
                Role::System => system.push(SystemBlock {
                    text: msg.content.clone(),
                }),
                _ => rest.push(msg),
            }
        }

        (system, rest)
    }

    /// Convert messages to Converse format, merging consecutive same-role turns.
    fn to_api_messages(messages: &[&Message]) -> Vec<ApiMessage> {
        let mut result: Vec<ApiMessage> = Vec::new();

        for msg in messages {
            if msg.content.is_empty() {
                continue;
            }
            let role = match msg.role {
                Role::Assistant => "assistant",
                _ => "user",
            };
            let block = ContentBlock {
                text: Some(msg.content.clone()),
            };
            match result.last_mut() {
                Some(last) if last.role == role => last.content.push(block),
                _ => result.push(ApiMessage {
                    role: role.into(),
                    content: vec![block],
                }),
            }
        }

        result
    }

    fn converse_url(&self, model: &str) -> String {
        format!(
            "{}/model/{}/converse",
            self.base_url,
            praias_security::uri_encode(model, true)
        )
    }
}

#[async_trait]
impl praias_core::Provider for BedrockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            ProviderError::NotConfigured(
                "AWS credentials missing: set AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY".into(),
            )
        })?;

        let (system, rest) = Self::extract_system(&request.messages);
        let body = ConverseRequest {
            messages: Self::to_api_messages(&rest),
            system,
            inference_config: InferenceConfig {
                max_tokens: request.max_tokens,
                temperature: request.temperature,
                stop_sequences: request.stop.clone(),
            },
        };
        let payload = serde_json::to_vec(&body).map_err(|e| ProviderError::ApiError {
            status_code: 0,
            message: format!("Failed to encode request: {e}"),
        })?;

        let url = reqwest::Url::parse(&self.converse_url(&request.model))
            .map_err(|e| ProviderError::NotConfigured(format!("Invalid Bedrock endpoint: {e}")))?;
        let host = match (url.host_str(), url.port()) {
            (Some(h), Some(p)) => format!("{h}:{p}"),
            (Some(h), None) => h.to_string(),
            (None, _) => {
                return Err(ProviderError::NotConfigured(
                    "Bedrock endpoint has no host".into(),
                ));
            }
        };

        let signed = praias_security::sign(
            &SignableRequest {
                method: "POST",
                host: &host,
                path: url.path(),
                query: "",
                headers: vec![("content-type", "application/json")],
                body: &payload,
            },
            credentials,
            SigningScope {
                region: &self.region,
                service: SIGNING_SERVICE,
            },
            chrono::Utc::now(),
        );

        debug!(provider = %self.name, model = %request.model, "Sending converse request");

        let mut builder = self
            .client
            .post(url)
            .header("Content-Type", "application/json");
        for (name, value) in signed {
            builder = builder.header(name, value);
        }

        let response = builder
            .body(payload)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ProviderError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ProviderError::AuthenticationFailed(error_body));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Bedrock returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ConverseResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        let content: String = api_response
            .output
            .message
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect();

        let usage = api_response.usage.map(|u| Usage {
            prompt_tokens: u.input_tokens,
            completion_tokens: u.output_tokens,
            total_tokens: u.total_tokens,
        });

        let mut metadata = serde_json::Map::new();
        if let Some(reason) = api_response.stop_reason {
            metadata.insert("stop_reason".into(), serde_json::Value::String(reason));
        }

        Ok(ProviderResponse {
            message: Message::assistant(content),
            reasoning: None,
            usage,
            model: request.model,
            metadata,
        })
    }
}

// ── Converse API types ────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConverseRequest {
    messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    system: Vec<SystemBlock>,
    inference_config: InferenceConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContentBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct SystemBlock {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InferenceConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    temperature: f32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop_sequences: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConverseResponse {
    output: ConverseOutput,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Deserialize)]
struct ConverseOutput {
    message: ApiMessage,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiUsage {
    input_tokens: u32,
    output_tokens: u32,
    total_tokens: u32,
}
