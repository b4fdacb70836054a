//! Ferry — move history between repositories through a transformation pipeline.
//!
//! # Usage
//!
//! ```text
//! ferry run <config> [workflow] [--ref REF] [--workdir DIR] [--last-rev REF]
//!           [--change-baseline REF] [--ignore-noop]
//! ferry validate <config> [--json]
//! ```
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` for engine detail.

mod commands;
mod console;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{run::RunArgs, validate::ValidateArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "ferry",
    version,
    about = "Migrate change history from an origin to a destination",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one workflow from a configuration file.
    Run(RunArgs),

    /// Build every workflow in a configuration file without running it.
    Validate(ValidateArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => args.run(),
        Commands::Validate(args) => args.run(),
    }
}
