//! Renders a retrieval result as a system-prompt section.

use praias_core::knowledge::KnowledgeBaseResult;

const KNOWLEDGE_BASE_HEADER: &str = "IMPORTANT: Use the following information from the knowledge base to answer the user's question. Do not call external tools if this information is sufficient:";

/// Format `result` for appending to a system prompt.
///
/// Returns `""` when there is nothing to say, so the caller can append the
/// output unconditionally. Otherwise the section starts with a blank line,
/// carries the content verbatim and, when sources exist, a numbered
/// `Sources:` list in input order.
pub fn format_knowledge_base_context(result: Option<&KnowledgeBaseResult>) -> String {
    let Some(result) = result.filter(|r| !r.is_empty()) else {
        return String::new();
    };

    let mut out = format!("\n\n{KNOWLEDGE_BASE_HEADER}\n\n{}", result.content);

    if !result.sources.is_empty() {
        let entries: Vec<String> = result
            .sources
            .iter()
            .enumerate()
            .map(|(i, source)| {
                format!(
                    "{}. {}\n   {}",
                    i + 1,
                    source.title.as_deref().unwrap_or("Unknown source"),
                    source.snippet.as_deref().unwrap_or("")
                )
            })
            .collect();
        out.push_str("\n\nSources:\n");
        out.push_str(&entries.join("\n"));
    }

    out
}
