//! Srpmbot CLI - Rebuild source RPMs from upstream snapshots.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod run;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // RUST_LOG wins over --debug
    let level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .init();

    cli.run()
}
