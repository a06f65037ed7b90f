//! Command-line interface for evc-config
//!
//! Provides `show`, `check` and `chain` subcommands over a layered
//! experiment config.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod chain;
mod check;
mod show;
mod utils;

/// Resolve and validate layered experiment configs
#[derive(Parser)]
#[command(name = "evc-config")]
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
    /// Print the fully merged config
    Show(show::ShowArgs),

    /// Load and validate a config, printing a summary
    Check(check::CheckArgs),

    /// List the files a config is built from, in merge order
    Chain(chain::ChainArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

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
        Commands::Show(args) => show::run(args),
        Commands::Check(args) => check::run(args),
        Commands::Chain(args) => chain::run(args),
    }
}
