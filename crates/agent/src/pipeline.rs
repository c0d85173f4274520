//! Chat pipeline - one request from selected model to displayable answer.
//!
//! # Flow
//!
//! 1. Resolve the selected model (unknown ids fail before any I/O)
//! 2. Retrieve knowledge for the latest user message (best effort)
//! 3. Assemble the system prompt
//! 4. Call the model with the system prompt and the conversation
//! 5. Post-process the answer for display

use std::sync::Arc;
use praias_core::error::{Error, Result};
use praias_core::hints::RequestHints;
use praias_core::knowledge::{KnowledgeBaseResult, KnowledgeSource};
use praias_core::message::{Message, Role, last_user_message};
use praias_core::model::{DEFAULT_CHAT_MODEL, TITLE_MODEL};
use praias_core::provider::{ProviderRequest, Usage};
use praias_knowledge::KnowledgeRetriever;
use praias_providers::{ModelHandle, ModelRegistry};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::prompt::{self, PERSONA_PROMPT_VERSION, PromptSection, SystemPromptInput};
use crate::thinking::annotate_thinking;

const MAX_TITLE_CHARS: usize = 80;

/// A chat turn as received from a caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default = "default_chat_model")]
    pub selected_chat_model: String,

    #[serde(default)]
    pub request_hints: RequestHints,

    /// Conversation so far, ending with the user's latest message.
    pub messages: Vec<Message>,

    /// Overrides the configured knowledge base for this request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_base_id: Option<String>,
}

fn default_chat_model() -> String {
    DEFAULT_CHAT_MODEL.into()
}

impl ChatRequest {
    /// A single-message request for the default model.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            selected_chat_model: default_chat_model(),
            request_hints: RequestHints::default(),
            messages: vec![Message::user(message)],
            knowledge_base_id: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.selected_chat_model = model.into();
        self
    }

    pub fn with_hints(mut self, hints: RequestHints) -> Self {
        self.request_hints = hints;
        self
    }

    pub fn with_knowledge_base(mut self, id: impl Into<String>) -> Self {
        self.knowledge_base_id = Some(id.into());
        self
    }
}

/// Everything decided before the model is called.
#[derive(Debug, Clone)]
pub struct PreparedChat {
    pub handle: ModelHandle,
    pub request: ProviderRequest,
    pub system_prompt: String,
    pub sections: Vec<PromptSection>,
    pub knowledge: Option<KnowledgeBaseResult>,
}

/// The answer to a chat turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatOutcome {
    /// Answer ready for display (thinking spans rendered as callouts).
    pub text: String,
    /// Answer exactly as the model produced it.
    pub raw_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    pub sources: Vec<KnowledgeSource>,
    pub model_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// Orchestrates retrieval, prompt assembly and model invocation.
pub struct ChatPipeline {
    registry: Arc<ModelRegistry>,
    retriever: Arc<KnowledgeRetriever>,
    temperature: f32,
    max_tokens: Option<u32>,
    title_model: String,
}

impl ChatPipeline {
    pub fn new(registry: Arc<ModelRegistry>, retriever: Arc<KnowledgeRetriever>) -> Self {
        Self {
            registry,
            retriever,
            temperature: 0.7,
            max_tokens: None,
            title_model: TITLE_MODEL.into(),
        }
    }

    /// Build a pipeline with the sampling settings from `config`.
    pub fn from_config(
        config: &praias_config::AppConfig,
        registry: Arc<ModelRegistry>,
        retriever: Arc<KnowledgeRetriever>,
    ) -> Self {
        Self {
            temperature: config.default_temperature,
            max_tokens: Some(config.default_max_tokens),
            title_model: config.models.title_model.clone(),
            ..Self::new(registry, retriever)
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn retriever(&self) -> &KnowledgeRetriever {
        &self.retriever
    }

    /// Resolve, retrieve and assemble, without calling the model.
    pub async fn prepare(&self, request: &ChatRequest) -> Result<PreparedChat> {
        let query = last_user_message(&request.messages)
            .map(|m| m.content.clone())
            .ok_or_else(|| Error::InvalidRequest("no user message to answer".into()))?;

        let handle = self.registry.resolve(&request.selected_chat_model)?;

        let knowledge = self
            .retriever
            .retrieve(&query, request.knowledge_base_id.as_deref())
            .await;

        let builder = prompt::assemble(SystemPromptInput {
            selected_chat_model: &request.selected_chat_model,
            request_hints: &request.request_hints,
            knowledge_base_context: knowledge.as_ref(),
        });
        let sections = builder.sections();
        let system_prompt = builder.build();

        debug!(
            model = %handle.id,
            persona_version = PERSONA_PROMPT_VERSION,
            sections = ?sections,
            prompt_chars = system_prompt.len(),
            "System prompt assembled"
        );

        // The assembled prompt is the only system text the model sees.
        let history: Vec<Message> = request
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
            .cloned()
            .collect();
        let dropped = request.messages.len() - history.len();
        if dropped > 0 {
            warn!(dropped, "Ignoring caller-supplied system messages");
        }

        let mut provider_request = handle.request(system_prompt.clone(), &history);
        provider_request.temperature = self.temperature;
        provider_request.max_tokens = self.max_tokens;

        Ok(PreparedChat {
            handle,
            request: provider_request,
            system_prompt,
            sections,
            knowledge,
        })
    }

    /// Answer one chat turn.
    pub async fn run(&self, request: ChatRequest) -> Result<ChatOutcome> {
        let prepared = self.prepare(&request).await?;

        info!(
            model = %prepared.handle.id,
            provider = prepared.handle.provider.name(),
            knowledge = prepared.knowledge.is_some(),
            "Invoking model"
        );

        let response = prepared.handle.complete(prepared.request).await?;
        let raw_text = response.message.content;

        Ok(ChatOutcome {
            text: annotate_thinking(&raw_text),
            raw_text,
            reasoning: response.reasoning,
            sources: prepared.knowledge.map(|k| k.sources).unwrap_or_default(),
            model_id: prepared.handle.id,
            usage: response.usage,
        })
    }

    /// Generate a short conversation title from the first user message.
    pub async fn generate_title(&self, first_message: &str) -> Result<String> {
        if first_message.trim().is_empty() {
            return Err(Error::InvalidRequest("cannot title an empty message".into()));
        }

        let handle = self.registry.resolve(&self.title_model)?;
        let mut request = handle.request(prompt::title_prompt(), &[Message::user(first_message)]);
        request.temperature = self.temperature;
        request.max_tokens = Some(64);

        let response = handle.complete(request).await?;
        let title = clean_title(&response.message.content);
        debug!(model = %handle.id, title = %title, "Generated title");
        Ok(title)
    }
}

/// Trim, drop surrounding quotes and cap the length of a model-written title.
fn clean_title(raw: &str) -> String {
    let trimmed = raw
        .trim()
        .trim_matches(|c| matches!(c, '"' | '\'' | '“' | '”' | '‘' | '’'))
        .trim();
    trimmed.chars().take(MAX_TITLE_CHARS).collect::<String>().trim_end().to_string()
}
