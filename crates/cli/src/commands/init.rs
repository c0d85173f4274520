//! `praias init` - Write a default config file.

use praias_config::AppConfig;

pub async fn run(force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = AppConfig::config_path();

    println!("🏖️  Praias — Setup");
    println!("==================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    }

    if config_path.exists() && !force {
        println!("  Config file exists: {}", config_path.display());
        println!("  Use --force to overwrite it.");
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("✅ Wrote {}", config_path.display());

    println!();
    println!("  Next steps:");
    println!("    export AWS_ACCESS_KEY_ID=...");
    println!("    export AWS_SECRET_ACCESS_KEY=...");
    println!("    export KNOWLEDGE_BASE_ID=...    (optional)");
    println!("    praias doctor");

    Ok(())
}
