//! The chat model catalog shown to callers.

use serde::Serialize;

/// Logical id of the default chat model.
pub const DEFAULT_CHAT_MODEL: &str = "chat-model";

/// Logical id of the chat model that shows its thinking.
pub const REASONING_CHAT_MODEL: &str = "chat-model-reasoning";

/// Logical id of the model used to title conversations.
pub const TITLE_MODEL: &str = "title-model";

/// A selectable chat model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChatModel {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

static CHAT_MODELS: [ChatModel; 2] = [
    ChatModel {
        id: DEFAULT_CHAT_MODEL,
        name: "Amazon Nova Micro",
        description: "Fast and efficient AI model powered by Amazon Bedrock",
    },
    ChatModel {
        id: REASONING_CHAT_MODEL,
        name: "Amazon Nova Micro (Reasoning)",
        description: "AI model with reasoning capabilities - shows thinking process",
    },
];

impl ChatModel {
    /// All chat models callers may select.
    pub fn catalog() -> &'static [ChatModel] {
        &CHAT_MODELS
    }

    /// Look up a catalog entry by id.
    pub fn find(id: &str) -> Option<&'static ChatModel> {
        CHAT_MODELS.iter().find(|m| m.id == id)
    }
}

/// Whether `model_id` selects the reasoning prompt variant.
pub fn is_reasoning_model(model_id: &str) -> bool {
    model_id == REASONING_CHAT_MODEL
}
