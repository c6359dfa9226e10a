//! PromptWire CLI — the main entry point.
//!
//! Commands:
//! - `generate` — Augment a prompt from memory and generate a reply
//! - `embed`    — Embed a single piece of text
//! - `models`   — List known models and their pricing
//! - `config`   — Initialize or validate the config file

use clap::{Parser, Subcommand};

mod commands;
mod setup;

#[derive(Parser)]
#[command(
    name = "promptwire",
    about = "PromptWire — memory-augmented prompts for Google Vertex AI",
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
    /// Generate a reply to a message
    Generate {
        /// The message to send
        #[arg(short, long)]
        message: String,

        /// Session id used for memory lookups (a new one is created if omitted)
        #[arg(short, long)]
        session: Option<String>,

        /// System instructions placed ahead of the conversation
        #[arg(long)]
        system: Option<String>,

        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Embed a piece of text
    Embed {
        /// The text to embed
        #[arg(short, long)]
        text: String,

        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List known models
    Models,

    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default config file if none exists
    Init,

    /// Load and validate the config file
    Validate,
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
        .init();

    match cli.command {
        Commands::Generate {
            message,
            session,
            system,
            json,
        } => commands::generate::run(message, session, system, json).await?,
        Commands::Embed { text, json } => commands::embed::run(text, json).await?,
        Commands::Models => commands::models::run(),
        Commands::Config { action } => match action {
            ConfigAction::Init => commands::config_cmd::init()?,
            ConfigAction::Validate => commands::config_cmd::validate()?,
        },
    }

    Ok(())
}
