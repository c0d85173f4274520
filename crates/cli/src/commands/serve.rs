//! `praias serve` - Start the HTTP API server.

use praias_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }
    tracing::debug!(?config, "Loaded configuration");

    println!("🏖️  Praias Gateway");
    println!("   Listening:      {}:{}", config.gateway.host, config.gateway.port);
    println!("   Region:         {}", config.aws.region);
    println!(
        "   Knowledge base: {}",
        config.knowledge_base.id.as_deref().unwrap_or("(none)")
    );

    praias_gateway::start(config).await?;

    Ok(())
}
