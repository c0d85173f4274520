//! `praias models` - List selectable chat models and the model table.

use praias_config::AppConfig;
use praias_core::model::{ChatModel, DEFAULT_CHAT_MODEL};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("🤖 Chat Models");
    println!("==============");
    println!();
    for model in ChatModel::catalog() {
        let marker = if model.id == DEFAULT_CHAT_MODEL { " (default)" } else { "" };
        println!("  {}{marker}", model.id);
        println!("    {} — {}", model.name, model.description);
    }

    println!();
    println!("  Model table:");
    for (id, model) in &config.models.table {
        let wrapped = if *id == config.models.reasoning_model {
            format!("  [reasoning <{}>]", config.models.reasoning_tag)
        } else {
            String::new()
        };
        println!("    {id:<22} → {model}{wrapped}");
    }

    Ok(())
}
