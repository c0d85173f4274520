//! Knowledge Retriever.
//!
//! Best effort by contract: every failure path (no knowledge base, blank
//! query, backend error, nothing useful returned) logs and yields `None`.
//! Callers treat `None` as "no knowledge available" and carry on.

use std::sync::Arc;
use praias_core::knowledge::{KnowledgeBackend, KnowledgeBaseResult, KnowledgeSource, RetrievedPassage};
use tracing::{debug, info, warn};
use crate::bedrock::BedrockKnowledgeBackend;

const UNKNOWN_TITLE: &str = "Unknown";

/// Retrieves and condenses knowledge-base passages for a query.
pub struct KnowledgeRetriever {
    backend: Arc<dyn KnowledgeBackend>,
    default_knowledge_base_id: Option<String>,
    top_k: usize,
    snippet_chars: usize,
}

impl KnowledgeRetriever {
    pub fn new(backend: Arc<dyn KnowledgeBackend>) -> Self {
        let defaults = praias_config::KnowledgeBaseConfig::default();
        Self {
            backend,
            default_knowledge_base_id: None,
            top_k: defaults.top_k,
            snippet_chars: defaults.snippet_chars,
        }
    }

    /// Build a Bedrock-backed retriever from configuration.
    pub fn from_config(config: &praias_config::AppConfig) -> Self {
        let backend: Arc<dyn KnowledgeBackend> =
            Arc::new(BedrockKnowledgeBackend::from_config(&config.aws));
        Self::with_config(backend, &config.knowledge_base)
    }

    /// Wrap `backend` with the limits and default id from `[knowledge_base]`.
    pub fn with_config(
        backend: Arc<dyn KnowledgeBackend>,
        kb: &praias_config::KnowledgeBaseConfig,
    ) -> Self {
        Self {
            backend,
            default_knowledge_base_id: kb.id.clone().filter(|id| !id.trim().is_empty()),
            top_k: kb.top_k,
            snippet_chars: kb.snippet_chars,
        }
    }

    pub fn with_default_knowledge_base(mut self, id: impl Into<String>) -> Self {
        self.default_knowledge_base_id = Some(id.into());
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn default_knowledge_base_id(&self) -> Option<&str> {
        self.default_knowledge_base_id.as_deref()
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Query the knowledge base. `knowledge_base_id` overrides the default.
    pub async fn retrieve(
        &self,
        query: &str,
        knowledge_base_id: Option<&str>,
    ) -> Option<KnowledgeBaseResult> {
        let kb_id = knowledge_base_id
            .filter(|id| !id.trim().is_empty())
            .or(self.default_knowledge_base_id.as_deref());

        let Some(kb_id) = kb_id else {
            warn!("Knowledge base id not configured, skipping retrieval");
            return None;
        };

        if query.trim().is_empty() {
            debug!(kb_id, "Empty query, skipping retrieval");
            return None;
        }

        info!(kb_id, backend = self.backend.name(), "Retrieving from knowledge base");

        let passages = match self.backend.retrieve(kb_id, query, self.top_k).await {
            Ok(passages) => passages,
            Err(e) => {
                warn!(kb_id, error = %e, "Knowledge base retrieval failed");
                return None;
            }
        };

        let result = self.condense(passages);
        match &result {
            Some(r) => debug!(kb_id, sources = r.sources.len(), chars = r.content.len(), "Retrieved knowledge"),
            None => debug!(kb_id, "Knowledge base returned nothing usable"),
        }
        result
    }

    /// Join passage texts and build one citation per non-empty passage.
    fn condense(&self, passages: Vec<RetrievedPassage>) -> Option<KnowledgeBaseResult> {
        let passages: Vec<RetrievedPassage> = passages
            .into_iter()
            .filter(|p| !p.text.is_empty())
            .collect();
        if passages.is_empty() {
            return None;
        }

        let content = passages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let sources = passages
            .into_iter()
            .map(|p| KnowledgeSource {
                title: Some(p.location_uri.clone().unwrap_or_else(|| UNKNOWN_TITLE.into())),
                snippet: Some(format!("{}...", truncate_chars(&p.text, self.snippet_chars))),
                url: p.location_uri,
            })
            .collect();

        Some(KnowledgeBaseResult { content, sources })
    }
}

/// The first `max` characters of `s`, never splitting a character.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use praias_core::error::RetrievalError;
    use std::sync::Mutex;

    /// Returns canned passages and records what it was asked.
    struct FakeBackend {
        passages: Vec<RetrievedPassage>,
        calls: Mutex<Vec<(String, String, usize)>>,
    }

    impl FakeBackend {
        fn new(passages: Vec<RetrievedPassage>) -> Arc<Self> {
            Arc::new(Self {
                passages,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl KnowledgeBackend for FakeBackend {
        fn name(&self) -> &str {
            "fake"
        }

        async fn retrieve(
            &self,
            knowledge_base_id: &str,
            query: &str,
            top_k: usize,
        ) -> Result<Vec<RetrievedPassage>, RetrievalError> {
            self.calls
                .lock()
                .unwrap()
                .push((knowledge_base_id.into(), query.into(), top_k));
            Ok(self.passages.clone())
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl KnowledgeBackend for FailingBackend {
        fn name(&self) -> &str {
            "failing"
        }

        async fn retrieve(&self, _: &str, _: &str, _: usize) -> Result<Vec<RetrievedPassage>, RetrievalError> {
            Err(RetrievalError::Network("connection refused".into()))
        }
    }

    fn passage(text: &str, uri: Option<&str>) -> RetrievedPassage {
        RetrievedPassage {
            text: text.into(),
            location_uri: uri.map(String::from),
            score: None,
        }
    }

    #[tokio::test]
    async fn joins_texts_and_builds_sources_in_order() {
        let backend = FakeBackend::new(vec![
            passage("Guincho fills by 11:00.", Some("s3://kb/guincho.md")),
            passage("Cresmina is usually easier.", None),
        ]);
        let retriever = KnowledgeRetriever::new(backend.clone()).with_default_knowledge_base("KB1");

        let result = retriever.retrieve("Guincho at noon?", None).await.unwrap();
        assert_eq!(result.content, "Guincho fills by 11:00.\n\nCresmina is usually easier.");
        assert_eq!(result.sources.len(), 2);
        assert_eq!(result.sources[0].title.as_deref(), Some("s3://kb/guincho.md"));
        assert_eq!(result.sources[0].url.as_deref(), Some("s3://kb/guincho.md"));
        assert_eq!(result.sources[0].snippet.as_deref(), Some("Guincho fills by 11:00...."));
        assert_eq!(result.sources[1].title.as_deref(), Some("Unknown"));
        assert!(result.sources[1].url.is_none());

        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls[0], ("KB1".to_string(), "Guincho at noon?".to_string(), 5));
    }

    #[tokio::test]
    async fn explicit_id_overrides_default() {
        let backend = FakeBackend::new(vec![passage("x", None)]);
        let retriever = KnowledgeRetriever::new(backend.clone()).with_default_knowledge_base("KB1");
        retriever.retrieve("q", Some("KB2")).await.unwrap();
        assert_eq!(backend.calls.lock().unwrap()[0].0, "KB2");
    }

    #[tokio::test]
    async fn no_knowledge_base_id_returns_none_without_calling_backend() {
        let backend = FakeBackend::new(vec![passage("x", None)]);
        let retriever = KnowledgeRetriever::new(backend.clone());
        assert!(retriever.retrieve("best time to visit Carcavelos", None).await.is_none());
        assert!(backend.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_query_returns_none() {
        let backend = FakeBackend::new(vec![passage("x", None)]);
        let retriever = KnowledgeRetriever::new(backend.clone()).with_default_knowledge_base("KB1");
        assert!(retriever.retrieve("   ", None).await.is_none());
        assert!(backend.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn zero_results_returns_none() {
        let retriever = KnowledgeRetriever::new(FakeBackend::new(vec![])).with_default_knowledge_base("KB1");
        assert!(retriever.retrieve("q", None).await.is_none());
    }

    #[tokio::test]
    async fn all_empty_texts_return_none() {
        let backend = FakeBackend::new(vec![passage("", Some("s3://a")), passage("", None)]);
        let retriever = KnowledgeRetriever::new(backend).with_default_knowledge_base("KB1");
        assert!(retriever.retrieve("q", None).await.is_none());
    }

    #[tokio::test]
    async fn empty_texts_are_skipped() {
        let backend = FakeBackend::new(vec![passage("", Some("s3://a")), passage("kept", Some("s3://b"))]);
        let retriever = KnowledgeRetriever::new(backend).with_default_knowledge_base("KB1");
        let result = retriever.retrieve("q", None).await.unwrap();
        assert_eq!(result.content, "kept");
        assert_eq!(result.sources.len(), 1);
        assert_eq!(result.sources[0].url.as_deref(), Some("s3://b"));
    }

    #[tokio::test]
    async fn backend_failure_is_swallowed() {
        let retriever = KnowledgeRetriever::new(Arc::new(FailingBackend)).with_default_knowledge_base("KB1");
        assert!(retriever.retrieve("q", None).await.is_none());
    }

    #[tokio::test]
    async fn snippet_is_truncated_on_char_boundary() {
        let long = "ã".repeat(250);
        let retriever = KnowledgeRetriever::new(FakeBackend::new(vec![passage(&long, None)]))
            .with_default_knowledge_base("KB1");
        let result = retriever.retrieve("q", None).await.unwrap();
        let snippet = result.sources[0].snippet.as_deref().unwrap();
        assert_eq!(snippet.chars().count(), 203);
        assert!(snippet.ends_with("ã..."));
        assert_eq!(result.content, long);
    }

    #[test]
    fn with_config_ignores_blank_default_id() {
        let kb = praias_config::KnowledgeBaseConfig {
            id: Some("  ".into()),
            top_k: 3,
            snippet_chars: 50,
        };
        let retriever = KnowledgeRetriever::with_config(FakeBackend::new(vec![]), &kb);
        assert!(retriever.default_knowledge_base_id().is_none());
        assert_eq!(retriever.top_k, 3);
        assert_eq!(retriever.snippet_chars, 50);
    }

    #[test]
    fn truncate_short_string_is_whole() {
        assert_eq!(truncate_chars("abc", 200), "abc");
        assert_eq!(truncate_chars("abcdef", 3), "abc");
    }
}
