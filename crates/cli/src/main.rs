//! # personachat: sample tooling for `personachat`
//!
//! Command-line helpers for the historical sample files read by the
//! sample-backed personas: building them from group chat exports and checking
//! what a data directory holds.

mod extract;
mod inspect;

use anyhow::Result;
use clap::{Parser, Subcommand};
use extract::ExtractArgs;
use inspect::InspectArgs;
use tracing_subscriber::{fmt, EnvFilter};

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(name = "personachat", author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract one person's messages from a chat export into a sample file
    Extract(ExtractArgs),
    /// Report on the sample files of a data directory
    Inspect(InspectArgs),
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for reports.
    let subscriber = fmt::Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    let (name, result) = match &cli.command {
        Commands::Extract(args) => ("Extract", extract::handle_extract(args).await),
        Commands::Inspect(args) => ("Inspect", inspect::handle_inspect(args).await),
    };

    if let Err(e) = result {
        eprintln!("{name} failed: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}
