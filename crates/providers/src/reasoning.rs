//! Reasoning extraction middleware.
//!
//! Wraps another provider and moves `<tag>…</tag>` spans out of the answer
//! text into [`ProviderResponse::reasoning`], so callers see the model's
//! thinking and its final answer as separate channels.

use async_trait::async_trait;
use praias_core::error::ProviderError;
use praias_core::markup::{Segment, scan_tagged};
use praias_core::provider::*;
use std::sync::Arc;
use tracing::trace;

/// A provider that separates tagged reasoning from the final answer.
pub struct ReasoningExtractor {
    name: String,
    inner: Arc<dyn Provider>,
    tag: String,
}

impl ReasoningExtractor {
    /// Wrap `inner`, extracting content delimited by `<tag>` / `</tag>`.
    pub fn new(inner: Arc<dyn Provider>, tag: impl Into<String>) -> Self {
        Self {
            name: format!("{}+reasoning", inner.name()),
            inner,
            tag: tag.into(),
        }
    }

    /// The tag this middleware extracts.
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

/// Split `text` into (answer, reasoning).
///
/// Returns the text untouched and `None` when it has no complete tag pair.
/// Otherwise tagged spans are removed from the answer (which is trimmed) and
/// their trimmed contents are joined with newlines.
pub fn split_reasoning(text: &str, tag: &str) -> (String, Option<String>) {
    let segments = scan_tagged(text, tag);
    if !segments.iter().any(|s| matches!(s, Segment::Tagged(_))) {
        return (text.to_string(), None);
    }

    let mut answer = String::with_capacity(text.len());
    let mut reasoning: Vec<&str> = Vec::new();
    for segment in segments {
        match segment {
            Segment::Plain(s) => answer.push_str(s),
            Segment::Tagged(s) => {
                let s = s.trim();
                if !s.is_empty() {
                    reasoning.push(s);
                }
            }
        }
    }

    let reasoning = if reasoning.is_empty() {
        None
    } else {
        Some(reasoning.join("\n"))
    };
    (answer.trim().to_string(), reasoning)
}

#[async_trait]
impl Provider for ReasoningExtractor {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let mut response = self.inner.complete(request).await?;

        let (answer, reasoning) = split_reasoning(&response.message.content, &self.tag);
        if let Some(reasoning) = reasoning {
            trace!(tag = %self.tag, chars = reasoning.len(), "Extracted reasoning");
            response.reasoning = Some(match response.reasoning.take() {
                Some(existing) => format!("{existing}\n{reasoning}"),
                None => reasoning,
            });
        }
        response.message.content = answer;

        Ok(response)
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        self.inner.health_check().await
    }
}
