//! docqa CLI
//!
//! Main entry point for the docqa command-line tool.
//! Builds an in-memory index from local documents and answers questions
//! grounded in them.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand, ClassifyCommand};
use docqa_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;
use tracing::Instrument;

/// docqa - ask questions about your documents
#[derive(Parser, Debug)]
#[command(name = "docqa")]
#[command(about = "Document-grounded question answering", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "DOCQA_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "DOCQA_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Generation provider (ollama, openai)
    #[arg(short, long, global = true, env = "DOCQA_PROVIDER")]
    provider: Option<String>,

    /// Generation model identifier
    #[arg(short, long, global = true, env = "DOCQA_MODEL")]
    model: Option<String>,

    /// Embedding provider (trigram, ollama, openai)
    #[arg(long, global = true, env = "DOCQA_EMBEDDING_PROVIDER")]
    embedding_provider: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Index documents and answer one question
    Ask(AskCommand),

    /// Index documents once, then answer questions read from stdin
    Chat(ChatCommand),

    /// Show how a question would be classified
    Classify(ClassifyCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from file and environment
    let config = AppConfig::load()?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.workspace,
        cli.config,
        cli.provider,
        cli.model,
        cli.embedding_provider,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("docqa starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {} ({})", config.provider, config.model);
    tracing::debug!("Embedding provider: {}", config.embedding_provider);

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Chat(_) => "chat",
        Commands::Classify(_) => "classify",
    };
    let span = tracing::info_span!("command", name = command_name);

    let result = async {
        match cli.command {
            Commands::Ask(cmd) => cmd.execute(&config).await,
            Commands::Chat(cmd) => cmd.execute(&config).await,
            Commands::Classify(cmd) => cmd.execute(),
        }
    }
    .instrument(span)
    .await;

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
