//! Model registry - maps logical model ids to invocation handles.
//!
//! Built once at startup from the `[models]` config table and shared
//! read-only (behind an `Arc`) by every in-flight request.

use std::collections::HashMap;
use std::sync::Arc;
use praias_core::error::ProviderError;
use praias_core::message::Message;
use praias_core::provider::{Provider, ProviderRequest, ProviderResponse};
use tracing::info;
use crate::bedrock::BedrockProvider;
use crate::reasoning::ReasoningExtractor;

/// A resolved model: which provider to call and with which model id.
#[derive(Clone)]
pub struct ModelHandle {
    /// Logical id (e.g. "chat-model").
    pub id: String,
    /// Provider-specific model id (e.g. "amazon.nova-micro-v1:0").
    pub model: String,
    /// The provider, possibly wrapped in middleware.
    pub provider: Arc<dyn Provider>,
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("id", &self.id)
            .field("model", &self.model)
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl ModelHandle {
    /// Build a request for this model: system prompt first, then history.
    pub fn request(&self, system_prompt: impl Into<String>, history: &[Message]) -> ProviderRequest {
        ProviderRequest::with_system(&self.model, system_prompt, history)
    }

    /// Send `request` to the provider.
    pub async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.provider.complete(request).await
    }
}

/// Logical model id → invocation handle.
#[derive(Default)]
pub struct ModelRegistry {
    models: HashMap<String, ModelHandle>,
}

impl ModelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` to call `model` on `provider`. Replaces any existing entry.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        model: impl Into<String>,
        provider: Arc<dyn Provider>,
    ) {
        let id = id.into();
        self.models.insert(
            id.clone(),
            ModelHandle {
                id,
                model: model.into(),
                provider,
            },
        );
    }

    /// Resolve a logical id. Unknown ids are an error, never a fallback.
    pub fn resolve(&self, id: &str) -> Result<ModelHandle, ProviderError> {
        self.models
            .get(id)
            .cloned()
            .ok_or_else(|| ProviderError::ModelNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.models.contains_key(id)
    }

    /// All registered ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.models.keys().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// Build the registry from the `[models]` table over a shared base provider.
///
/// The entry named by `models.reasoning_model` is wrapped in
/// [`ReasoningExtractor`]; all others call `base` directly.
pub fn build_with_provider(
    models: &praias_config::ModelsConfig,
    base: Arc<dyn Provider>,
) -> ModelRegistry {
    let mut registry = ModelRegistry::new();

    for (id, model) in &models.table {
        let provider: Arc<dyn Provider> = if *id == models.reasoning_model {
            Arc::new(ReasoningExtractor::new(base.clone(), &models.reasoning_tag))
        } else {
            base.clone()
        };
        registry.register(id.clone(), model.clone(), provider);
    }

    info!(models = ?registry.ids(), "Model registry built");
    registry
}

/// Build the registry from configuration, backed by Amazon Bedrock.
pub fn build_from_config(config: &praias_config::AppConfig) -> ModelRegistry {
    let bedrock: Arc<dyn Provider> = Arc::new(BedrockProvider::from_config(&config.aws));
    build_with_provider(&config.models, bedrock)
}
