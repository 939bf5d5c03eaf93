//! Command-line interface for prompt-pack
//!
//! Provides `generate` and `analyze` subcommands.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod analyze;
mod generate;
mod utils;

/// Pack repository files into a token-budgeted prompt for AI assistants
#[derive(Parser)]
#[command(name = "prompt-pack")]
#[command(author, version, about, long_about = None)]
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
    /// Generate a prompt from a local directory
    Generate(Box<generate::GenerateArgs>),

    /// Show how files would be classified and ranked, without generating
    Analyze(analyze::AnalyzeArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate(args) => generate::run(*args),
        Commands::Analyze(args) => analyze::run(args),
    }
}

/// Logs go to stderr so a prompt written to stdout stays clean. Directives
/// from RUST_LOG are kept; the base level is WARN, or DEBUG with --verbose.
fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::from_default_env().add_directive(level.into());
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(verbose))
        .with(filter)
        .try_init();
}
