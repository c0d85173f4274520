//! Prompt Assembler.
//!
//! The system prompt is built from four sections, always in this order:
//!
//! 1. **Persona** - the fixed assistant instructions
//! 2. **Request hints** - where the caller is, separated by a blank line
//! 3. **Knowledge base** - retrieved context, or nothing
//! 4. **Artifacts** - document guidance, skipped for the reasoning model
//!
//! Assembly is a pure function of its input.

pub mod builder;
pub mod persona;

pub use builder::{PromptSection, SystemPromptBuilder};
pub use persona::{ARTIFACTS_PROMPT, PERSONA_PROMPT, PERSONA_PROMPT_VERSION, TITLE_PROMPT};

use praias_core::hints::RequestHints;
use praias_core::knowledge::KnowledgeBaseResult;
use praias_core::model::is_reasoning_model;
use praias_knowledge::format_knowledge_base_context;

/// Everything the assembler needs for one request.
#[derive(Debug, Clone, Copy)]
pub struct SystemPromptInput<'a> {
    pub selected_chat_model: &'a str,
    pub request_hints: &'a RequestHints,
    pub knowledge_base_context: Option<&'a KnowledgeBaseResult>,
}

/// Render the hints block. Missing values read `unknown`.
pub fn request_hints_prompt(hints: &RequestHints) -> String {
    fn value(v: &Option<String>) -> &str {
        v.as_deref().filter(|s| !s.is_empty()).unwrap_or("unknown")
    }

    let mut out = format!(
        "About the origin of user's request:\n- latitude: {}\n- longitude: {}\n- city: {}\n- country: {}\n",
        value(&hints.latitude),
        value(&hints.longitude),
        value(&hints.city),
        value(&hints.country),
    );
    if let Some(now) = hints.current_date_time.as_deref().filter(|s| !s.is_empty()) {
        out.push_str(&format!("- currentDateTime: {now}\n"));
    }
    out
}

/// Build the section list for `input` without flattening it.
pub fn assemble(input: SystemPromptInput<'_>) -> SystemPromptBuilder {
    SystemPromptBuilder::new()
        .section(PromptSection::Persona, PERSONA_PROMPT)
        .section(
            PromptSection::RequestHints,
            format!("\n\n{}", request_hints_prompt(input.request_hints)),
        )
        .section(
            PromptSection::KnowledgeBase,
            format_knowledge_base_context(input.knowledge_base_context),
        )
        .section_if(
            !is_reasoning_model(input.selected_chat_model),
            PromptSection::Artifacts,
            || format!("\n\n{ARTIFACTS_PROMPT}"),
        )
}

/// The full system prompt for `input`.
pub fn system_prompt(input: SystemPromptInput<'_>) -> String {
    assemble(input).build()
}

/// The system prompt for the title model.
pub fn title_prompt() -> &'static str {
    TITLE_PROMPT
}

#[cfg(test)]
mod tests {
    use super::*;
    use praias_core::knowledge::KnowledgeSource;
    use praias_core::model::{DEFAULT_CHAT_MODEL, REASONING_CHAT_MODEL};

    fn cascais() -> RequestHints {
        RequestHints {
            latitude: Some("38.6979".into()),
            longitude: Some("-9.4215".into()),
            city: Some("Cascais".into()),
            country: Some("PT".into()),
            current_date_time: None,
        }
    }

    fn kb() -> KnowledgeBaseResult {
        KnowledgeBaseResult {
            content: "Guincho parking fills by 11:00 on summer weekends.".into(),
            sources: vec![KnowledgeSource {
                title: Some("s3://kb/guincho.md".into()),
                url: Some("s3://kb/guincho.md".into()),
                snippet: Some("Guincho parking fills...".into()),
            }],
        }
    }

    fn input<'a>(model: &'a str, hints: &'a RequestHints, kb: Option<&'a KnowledgeBaseResult>) -> SystemPromptInput<'a> {
        SystemPromptInput {
            selected_chat_model: model,
            request_hints: hints,
            knowledge_base_context: kb,
        }
    }

    #[test]
    fn hints_block_lists_all_fields() {
        assert_eq!(
            request_hints_prompt(&cascais()),
            "About the origin of user's request:\n- latitude: 38.6979\n- longitude: -9.4215\n- city: Cascais\n- country: PT\n"
        );
    }

    #[test]
    fn missing_hints_render_unknown() {
        let out = request_hints_prompt(&RequestHints::default());
        assert!(out.contains("- latitude: unknown\n"));
        assert!(out.contains("- country: unknown\n"));
        assert!(!out.contains("currentDateTime"));
    }

    #[test]
    fn current_date_time_is_appended_when_present() {
        let hints = RequestHints {
            current_date_time: Some("2025-08-14T15:00+01:00".into()),
            ..cascais()
        };
        assert!(request_hints_prompt(&hints).ends_with("- country: PT\n- currentDateTime: 2025-08-14T15:00+01:00\n"));
    }

    #[test]
    fn prompt_starts_with_persona() {
        let hints = cascais();
        for model in [DEFAULT_CHAT_MODEL, REASONING_CHAT_MODEL, "anything-else"] {
            assert!(system_prompt(input(model, &hints, None)).starts_with(PERSONA_PROMPT));
        }
    }

    #[test]
    fn chat_model_layout_without_knowledge() {
        let hints = cascais();
        let prompt = system_prompt(input(DEFAULT_CHAT_MODEL, &hints, None));
        assert_eq!(
            prompt,
            format!("{PERSONA_PROMPT}\n\n{}\n\n{ARTIFACTS_PROMPT}", request_hints_prompt(&hints))
        );
    }

    #[test]
    fn reasoning_model_omits_artifacts() {
        let hints = cascais();
        let kb = kb();
        let reasoning = system_prompt(input(REASONING_CHAT_MODEL, &hints, Some(&kb)));
        let regular = system_prompt(input(DEFAULT_CHAT_MODEL, &hints, Some(&kb)));

        assert!(!reasoning.contains(ARTIFACTS_PROMPT));
        assert!(regular.contains(ARTIFACTS_PROMPT));
        assert_eq!(
            reasoning,
            format!(
                "{PERSONA_PROMPT}\n\n{}{}",
                request_hints_prompt(&hints),
                format_knowledge_base_context(Some(&kb))
            )
        );
    }

    #[test]
    fn knowledge_follows_hints_and_precedes_artifacts() {
        let hints = cascais();
        let kb = kb();
        let prompt = system_prompt(input(DEFAULT_CHAT_MODEL, &hints, Some(&kb)));

        let hints_at = prompt.find("About the origin").unwrap();
        let kb_at = prompt.find("IMPORTANT: Use the following").unwrap();
        let artifacts_at = prompt.find("Artifacts is a special").unwrap();
        assert!(hints_at < kb_at && kb_at < artifacts_at);
        assert!(prompt.contains("Sources:\n1. s3://kb/guincho.md"));
    }

    #[test]
    fn empty_knowledge_adds_no_header() {
        let hints = cascais();
        let empty = KnowledgeBaseResult::default();
        let prompt = system_prompt(input(DEFAULT_CHAT_MODEL, &hints, Some(&empty)));
        assert!(!prompt.contains("knowledge base"));
        assert!(!prompt.contains("Sources:"));
        assert_eq!(prompt, system_prompt(input(DEFAULT_CHAT_MODEL, &hints, None)));
    }

    #[test]
    fn assemble_reports_included_sections() {
        let hints = cascais();
        let kb = kb();
        assert_eq!(
            assemble(input(REASONING_CHAT_MODEL, &hints, Some(&kb))).sections(),
            vec![PromptSection::Persona, PromptSection::RequestHints, PromptSection::KnowledgeBase]
        );
        assert_eq!(
            assemble(input(DEFAULT_CHAT_MODEL, &hints, None)).sections(),
            vec![PromptSection::Persona, PromptSection::RequestHints, PromptSection::Artifacts]
        );
    }

    #[test]
    fn persona_carries_decision_policy() {
        assert!(PERSONA_PROMPT.starts_with("You are BeachParking Assistant."));
        assert!(PERSONA_PROMPT.contains("Yes / Maybe / No"));
        assert!(PERSONA_PROMPT.contains("ask at most one concise follow-up"));
        assert!(PERSONA_PROMPT.contains("Do not show numbers, probabilities, datasets, or tool names"));
        assert!(PERSONA_PROMPT.contains("suggest one or two nearby beaches"));
    }

    #[test]
    fn title_prompt_limits_length() {
        assert!(title_prompt().contains("80 characters"));
    }
}
