//! Praias CLI - the main entry point.
//!
//! Commands:
//! - `init` - Write a default config file
//! - `serve` - Start the HTTP API server
//! - `ask` - Ask the assistant a single question
//! - `prompt` - Print the assembled system prompt
//! - `models` - List selectable chat models
//! - `doctor` - Diagnose configuration

use clap::{Args, Parser, Subcommand};
use praias_core::hints::RequestHints;

mod commands;

#[derive(Parser)]
#[command(
    name = "praias",
    about = "Praias — should you drive to the beach right now?",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file to ~/.praias/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Start the HTTP API server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask a single question and print the answer
    Ask {
        /// The question, e.g. "Can I park at Guincho at 3pm?"
        message: String,

        /// Chat model id
        #[arg(short, long, default_value = praias_core::DEFAULT_CHAT_MODEL)]
        model: String,

        /// Knowledge base id (overrides config)
        #[arg(long)]
        kb: Option<String>,

        #[command(flatten)]
        hints: HintArgs,
    },

    /// Print the system prompt that would be sent for a question
    Prompt {
        /// Chat model id
        #[arg(short, long, default_value = praias_core::DEFAULT_CHAT_MODEL)]
        model: String,

        /// The user message the prompt is built for
        #[arg(short, long, default_value = "Should I go to the beach now?")]
        query: String,

        /// Knowledge base id (overrides config)
        #[arg(long)]
        kb: Option<String>,

        #[command(flatten)]
        hints: HintArgs,
    },

    /// List selectable chat models
    Models,

    /// Diagnose configuration and credentials
    Doctor,
}

/// Caller location, as the gateway would receive it from geolocation headers.
#[derive(Args, Debug, Default, Clone)]
pub struct HintArgs {
    /// Caller city
    #[arg(long)]
    city: Option<String>,

    /// Caller country code
    #[arg(long)]
    country: Option<String>,

    /// Caller latitude
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<String>,

    /// Caller longitude
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<String>,

    /// Caller-local date and time
    #[arg(long)]
    at: Option<String>,
}

impl From<HintArgs> for RequestHints {
    fn from(args: HintArgs) -> Self {
        RequestHints {
            latitude: args.lat,
            longitude: args.lon,
            city: args.city,
            country: args.country,
            current_date_time: args.at,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { force } => commands::init::run(force).await?,
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Ask { message, model, kb, hints } => {
            commands::ask::run(message, model, kb, hints.into()).await?
        }
        Commands::Prompt { model, query, kb, hints } => {
            commands::prompt::run(model, query, kb, hints.into()).await?
        }
        Commands::Models => commands::models::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
