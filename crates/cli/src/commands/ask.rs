//! `praias ask` - Single-question mode.

use praias_agent::ChatRequest;
use praias_config::AppConfig;
use praias_core::hints::RequestHints;

pub async fn run(
    message: String,
    model: String,
    kb: Option<String>,
    hints: RequestHints,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for credentials early - give a clear error
    if !config.aws.has_credentials() {
        eprintln!();
        eprintln!("  ERROR: No AWS credentials configured!");
        eprintln!();
        eprintln!("  Set these environment variables:");
        eprintln!("    export AWS_ACCESS_KEY_ID=...");
        eprintln!("    export AWS_SECRET_ACCESS_KEY=...");
        eprintln!("    export AWS_REGION=us-east-1        (optional)");
        eprintln!();
        eprintln!("  Or add them to the [aws] table of:");
        eprintln!("    {}", AppConfig::config_path().display());
        eprintln!();
        return Err("No AWS credentials found. See above for setup instructions.".into());
    }

    let pipeline = praias_gateway::build_pipeline(&config);

    let mut request = ChatRequest::new(message).with_model(model).with_hints(hints);
    if let Some(kb) = kb {
        request = request.with_knowledge_base(kb);
    }

    eprint!("  Thinking...");
    let outcome = pipeline.run(request).await;
    eprint!("\r              \r");
    let outcome = outcome?;

    if let Some(reasoning) = &outcome.reasoning {
        for line in reasoning.lines() {
            eprintln!("  💭 {line}");
        }
        eprintln!();
    }

    println!("{}", outcome.text.trim());

    if !outcome.sources.is_empty() {
        println!();
        println!("  Sources:");
        for (i, source) in outcome.sources.iter().enumerate() {
            println!(
                "    {}. {}",
                i + 1,
                source.url.as_deref().or(source.title.as_deref()).unwrap_or("Unknown source")
            );
        }
    }

    Ok(())
}
