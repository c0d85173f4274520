//! Knowledge-base domain types and the backend trait.
//!
//! A backend returns raw passages for a query; the retriever in
//! `praias-knowledge` turns them into a [`KnowledgeBaseResult`] that the
//! prompt assembler can append to the system prompt.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RetrievalError;

/// One citation attached to a knowledge-base result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// Retrieved content plus its ordered citations.
///
/// Produced once per query and consumed by prompt assembly; never cached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBaseResult {
    pub content: String,

    #[serde(default)]
    pub sources: Vec<KnowledgeSource>,
}

impl KnowledgeBaseResult {
    /// True when there is no content to put in a prompt.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// A single hit returned by a retrieval backend, in relevance order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    /// The passage text.
    pub text: String,

    /// Where the passage came from (e.g. `s3://bucket/beaches.csv`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_uri: Option<String>,

    /// Relevance score reported by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

/// A vector-retrieval service.
#[async_trait]
pub trait KnowledgeBackend: Send + Sync {
    /// A human-readable name for this backend (e.g., "bedrock-kb").
    fn name(&self) -> &str;

    /// Return at most `top_k` passages for `query` from `knowledge_base_id`,
    /// most relevant first.
    async fn retrieve(
        &self,
        knowledge_base_id: &str,
        query: &str,
        top_k: usize,
    ) -> std::result::Result<Vec<RetrievedPassage>, RetrievalError>;
}
