//! `praias prompt` - Print the assembled system prompt.
//!
//! Runs retrieval and assembly exactly as a chat request would, but never
//! calls the model.

use praias_agent::{ChatRequest, PERSONA_PROMPT_VERSION};
use praias_config::AppConfig;
use praias_core::hints::RequestHints;

pub async fn run(
    model: String,
    query: String,
    kb: Option<String>,
    hints: RequestHints,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let pipeline = praias_gateway::build_pipeline(&config);

    let mut request = ChatRequest::new(query).with_model(model).with_hints(hints);
    if let Some(kb) = kb {
        request = request.with_knowledge_base(kb);
    }

    let prepared = pipeline.prepare(&request).await?;

    let sections: Vec<String> = prepared.sections.iter().map(|s| s.to_string()).collect();
    eprintln!("  model:    {} → {}", prepared.handle.id, prepared.handle.model);
    eprintln!("  persona:  {PERSONA_PROMPT_VERSION}");
    eprintln!("  sections: {}", sections.join(", "));
    eprintln!(
        "  sources:  {}",
        prepared.knowledge.as_ref().map_or(0, |k| k.sources.len())
    );
    eprintln!();

    println!("{}", prepared.system_prompt);

    Ok(())
}
