//! ats-postings command-line entry point
//!
//! Collects one public job board and prints its postings table as JSON.

use anyhow::Context;
use ats_postings::config::{load_config, CollectorConfig};
use ats_postings::collect_postings;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// ats-postings: open job postings from a public ATS board
///
/// Supports Ashby, Greenhouse and Lever boards; the provider is chosen from
/// the board URL's host.
#[derive(Parser, Debug)]
#[command(name = "ats-postings")]
#[command(version)]
#[command(about = "Fetch and normalize job postings from a public ATS board", long_about = None)]
struct Cli {
    /// Public board URL, e.g. https://boards.greenhouse.io/carta
    #[arg(value_name = "BOARD_URL")]
    board_url: String,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => CollectorConfig::default(),
    };

    let table = collect_postings(&cli.board_url, &config)
        .await
        .with_context(|| format!("collecting {}", cli.board_url))?;

    if let Some(payload) = table.envelope_error() {
        tracing::warn!("Board returned no data: {}", payload);
    }
    if table.dropped() > 0 {
        tracing::warn!("{} postings dropped", table.dropped());
    }

    let output = if cli.pretty {
        serde_json::to_string_pretty(&table)?
    } else {
        serde_json::to_string(&table)?
    };
    println!("{}", output);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only the JSON table.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ats_postings=info,warn"),
            1 => EnvFilter::new("ats_postings=debug,info"),
            2 => EnvFilter::new("ats_postings=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
