//! Command-line interface for repo-prompt
//!
//! Provides `pack`, `info`, and `token` subcommands.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod info;
mod pack;
mod token;
mod utils;

/// Assemble LLM prompts from GitHub repositories or local folders
#[derive(Parser)]
#[command(name = "repo-prompt")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the prompt: tree outline plus selected file contents
    Pack(Box<pack::PackArgs>),

    /// Print the repository tree without fetching any contents
    Info(info::InfoArgs),

    /// Manage the stored GitHub token
    Token(token::TokenArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Wire verbose flag to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Pack(args) => pack::run(*args),
        Commands::Info(args) => info::run(args),
        Commands::Token(args) => token::run(args),
    }
}
