//! # Praias Core
//!
//! Domain types, traits, and error definitions for the Praias beach-parking
//! assistant. This crate has **zero framework dependencies** - it defines the
//! domain model that the provider, knowledge, and agent crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (the model-serving API, the vector-retrieval
//! API) is defined as a trait here. Implementations live in their respective
//! crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with fake backends and scripted providers
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod hints;
pub mod knowledge;
pub mod markup;
pub mod message;
pub mod model;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result, RetrievalError};
pub use hints::RequestHints;
pub use knowledge::{KnowledgeBackend, KnowledgeBaseResult, KnowledgeSource, RetrievedPassage};
pub use markup::{Segment, scan_tagged};
pub use message::{Message, Role};
pub use model::{ChatModel, DEFAULT_CHAT_MODEL, REASONING_CHAT_MODEL, TITLE_MODEL};
pub use provider::{Provider, ProviderRequest, ProviderResponse, StreamChunk, Usage};
