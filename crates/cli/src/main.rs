//! localrag CLI
//!
//! Main entry point for the localrag command-line tool.
//! Answers questions about the files of a local directory with retrieval
//! augmented generation.

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use commands::{
    AskCommand, FormatsCommand, IndexCommand, InstructionsCommand, LearnCommand, SearchCommand,
};
use localrag_core::{config::AppConfig, logging};
use std::path::PathBuf;

/// localrag - ask questions about your local documents
#[derive(Parser, Debug)]
#[command(name = "localrag")]
#[command(about = "Ask questions about the documents in a local directory", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory of documents to index (default: current directory)
    #[arg(short, long, global = true, env = "LOCALRAG_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "LOCALRAG_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Generation provider
    #[arg(short, long, global = true, env = "LOCALRAG_PROVIDER")]
    provider: Option<String>,

    /// Generation model identifier
    #[arg(short, long, global = true, env = "LOCALRAG_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer a question from the indexed documents
    Ask(AskCommand),

    /// Rebuild the index and report what was indexed or skipped
    Index(IndexCommand),

    /// Show the documents most similar to a query
    Search(SearchCommand),

    /// Append text to the completions file and re-index
    Learn(LearnCommand),

    /// Show or replace the assistant instructions
    Instructions(InstructionsCommand),

    /// List the document formats this build can read
    Formats(FormatsCommand),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Ask(_) => "ask",
            Commands::Index(_) => "index",
            Commands::Search(_) => "search",
            Commands::Learn(_) => "learn",
            Commands::Instructions(_) => "instructions",
            Commands::Formats(_) => "formats",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments first (needed for config and logging)
    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.data_dir.clone(), cli.config.clone())
        .context("failed to load configuration")?;

    let config = config.with_overrides(
        cli.data_dir,
        cli.provider,
        cli.model,
        cli.log_level,
        cli.log_file,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(
        config.logging.level.as_deref(),
        config.no_color(),
        config.logging.file.as_deref(),
    )
    .context("failed to initialize logging")?;

    tracing::info!("localrag starting");
    tracing::debug!("Data directory: {:?}", config.data_dir);
    tracing::debug!(
        "Embedding: {}/{}",
        config.embedding.provider,
        config.embedding.model
    );
    tracing::debug!(
        "Generation: {}/{}",
        config.generation.provider,
        config.generation.model
    );

    config.validate().context("invalid configuration")?;

    let _span = tracing::info_span!("command", name = cli.command.name()).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Index(cmd) => cmd.execute(&config).await,
        Commands::Search(cmd) => cmd.execute(&config).await,
        Commands::Learn(cmd) => cmd.execute(&config).await,
        Commands::Instructions(cmd) => cmd.execute(&config),
        Commands::Formats(cmd) => cmd.execute(&config),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    Ok(result?)
}
