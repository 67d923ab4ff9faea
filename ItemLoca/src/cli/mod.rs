//! `itemloca` CLI - Command-line interface for importing localized item names

pub mod commands;
pub mod progress;

use clap::Parser;
use commands::Commands;
use tracing::Level;

#[derive(Parser)]
#[command(name = "itemloca")]
#[command(version, about = "ItemLoca: localized item names for the marketplace catalog", long_about = None)]
struct Cli {
    /// Log every resolved row and skipped write
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Run the `itemloca` CLI
///
/// # Errors
/// Returns an error if the selected command fails.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    cli.command.execute()?;

    Ok(())
}
