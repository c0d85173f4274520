//! Ordered section builder for system prompts.

use serde::Serialize;

/// The named parts of a system prompt, in assembly order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptSection {
    Persona,
    RequestHints,
    KnowledgeBase,
    Artifacts,
}

impl PromptSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Persona => "persona",
            Self::RequestHints => "request_hints",
            Self::KnowledgeBase => "knowledge_base",
            Self::Artifacts => "artifacts",
        }
    }
}

impl std::fmt::Display for PromptSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulates prompt sections and concatenates them in insertion order.
///
/// Sections carry their own leading separators, so `build()` joins them
/// with nothing in between. Empty sections are skipped and never show up
/// in [`SystemPromptBuilder::sections`].
#[derive(Debug, Default, Clone)]
pub struct SystemPromptBuilder {
    parts: Vec<(PromptSection, String)>,
}

impl SystemPromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text` as `section`.
    pub fn section(mut self, section: PromptSection, text: impl Into<String>) -> Self {
        let text = text.into();
        if !text.is_empty() {
            self.parts.push((section, text));
        }
        self
    }

    /// Append `section` only when `include` holds.
    pub fn section_if(
        self,
        include: bool,
        section: PromptSection,
        text: impl FnOnce() -> String,
    ) -> Self {
        if include {
            self.section(section, text())
        } else {
            self
        }
    }

    /// Names of the sections included so far, in order.
    pub fn sections(&self) -> Vec<PromptSection> {
        self.parts.iter().map(|(s, _)| *s).collect()
    }

    pub fn build(self) -> String {
        let len = self.parts.iter().map(|(_, t)| t.len()).sum();
        self.parts
            .into_iter()
            .fold(String::with_capacity(len), |mut out, (_, text)| {
                out.push_str(&text);
                out
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_concatenate_in_order() {
        let builder = SystemPromptBuilder::new()
            .section(PromptSection::Persona, "A")
            .section(PromptSection::RequestHints, "\n\nB")
            .section(PromptSection::Artifacts, "\n\nC");
        assert_eq!(
            builder.sections(),
            vec![PromptSection::Persona, PromptSection::RequestHints, PromptSection::Artifacts]
        );
        assert_eq!(builder.build(), "A\n\nB\n\nC");
    }

    #[test]
    fn empty_sections_are_skipped() {
        let builder = SystemPromptBuilder::new()
            .section(PromptSection::Persona, "A")
            .section(PromptSection::KnowledgeBase, "");
        assert_eq!(builder.sections(), vec![PromptSection::Persona]);
    }

    #[test]
    fn conditional_section_is_lazy() {
        let builder = SystemPromptBuilder::new()
            .section_if(false, PromptSection::Artifacts, || panic!("must not render"));
        assert_eq!(builder.build(), "");
    }

    #[test]
    fn section_names_are_snake_case() {
        assert_eq!(PromptSection::KnowledgeBase.to_string(), "knowledge_base");
        assert_eq!(
            serde_json::to_string(&PromptSection::RequestHints).unwrap(),
            "\"request_hints\""
        );
    }
}
