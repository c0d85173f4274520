//! Knowledge-base retrieval for Praias.
//!
//! [`KnowledgeRetriever`] queries a [`praias_core::KnowledgeBackend`] and
//! condenses the hits into a `KnowledgeBaseResult`; [`formatter`] renders
//! that result as a system-prompt section.

pub mod bedrock;
pub mod formatter;
pub mod retriever;

pub use bedrock::BedrockKnowledgeBackend;
pub use formatter::format_knowledge_base_context;
pub use retriever::KnowledgeRetriever;
