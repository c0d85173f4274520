//! `praias doctor` - Diagnose configuration and credentials.

use praias_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Praias Doctor — Configuration Diagnostics");
    println!("============================================\n");

    let mut issues = 0;

    // Check config file
    let config_path = std::env::var("PRAIAS_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| AppConfig::config_path());
    if config_path.exists() {
        println!("  ✅ Config file found: {}", config_path.display());
    } else {
        println!("  ⚠️  No config file at {} — using defaults (run `praias init`)", config_path.display());
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            config
        }
        Err(e) => {
            println!("  ❌ Configuration invalid: {e}");
            println!("\n  ⚠️  1 issue found. Fix the configuration and run again.");
            return Ok(());
        }
    };

    println!("  ✅ Region: {}", config.aws.region);

    if config.aws.has_credentials() {
        println!("  ✅ AWS credentials configured");
    } else {
        println!("  ❌ No AWS credentials — set AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY");
        issues += 1;
    }

    match config.knowledge_base.id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => println!(
            "  ✅ Knowledge base: {id} (top {} results)",
            config.knowledge_base.top_k
        ),
        None => {
            println!("  ⚠️  No knowledge base — set KNOWLEDGE_BASE_ID to enable retrieval");
            issues += 1;
        }
    }

    let registry = praias_providers::build_from_config(&config);
    println!("  ✅ Models registered: {}", registry.ids().join(", "));
    match registry.resolve(&config.models.reasoning_model) {
        Ok(handle) => println!("  ✅ Reasoning model: {} via {}", handle.id, handle.provider.name()),
        Err(e) => {
            println!("  ❌ Reasoning model: {e}");
            issues += 1;
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
