//! LLM provider implementations for Praias.
//!
//! All providers implement the `praias_core::Provider` trait.
//! The registry maps logical model ids to configured provider handles.

pub mod bedrock;
pub mod reasoning;
pub mod registry;

pub use bedrock::BedrockProvider;
pub use reasoning::{ReasoningExtractor, split_reasoning};
pub use registry::{ModelHandle, ModelRegistry, build_from_config, build_with_provider};
