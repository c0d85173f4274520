//! The chat pipeline for Praias.
//!
//! Turns a caller's chat turn into a model answer:
//!
//! 1. **Resolve** the selected model through the registry
//! 2. **Retrieve** knowledge for the latest user message
//! 3. **Assemble** the system prompt ([`prompt`])
//! 4. **Invoke** the model with the prompt and the conversation
//! 5. **Post-process** the answer for display ([`thinking`])

pub mod pipeline;
pub mod prompt;
pub mod thinking;

pub use pipeline::{ChatOutcome, ChatPipeline, ChatRequest, PreparedChat};
pub use prompt::{
    PERSONA_PROMPT_VERSION, PromptSection, SystemPromptBuilder, SystemPromptInput,
    request_hints_prompt, system_prompt, title_prompt,
};
pub use thinking::annotate_thinking;
