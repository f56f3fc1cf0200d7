//! Webgrep main entry point
//!
//! This is the command-line interface for webgrep: a "grep over many live
//! pages" utility that fetches URLs concurrently, matches regex patterns
//! against each body, and appends deduplicated results to one output file.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use webgrep::scanner::{run_batch, Batch};

/// Webgrep: concurrent regex matching over live pages
///
/// Fetches every URL concurrently over one shared connection pool, scans
/// each response body against every pattern, and appends one tab-separated
/// record per URL to the output file. A URL that cannot be fetched is
/// recorded as a failure; it never aborts the rest of the batch.
#[derive(Parser, Debug)]
#[command(name = "webgrep")]
#[command(version = "1.0.0")]
#[command(about = "Concurrent regex matching over live pages", long_about = None)]
struct Cli {
    /// URLs to fetch, space delimited (duplicates collapse to one)
    #[arg(long, required = true, num_args = 1.., value_name = "URL")]
    urls: Vec<String>,

    /// Regex patterns to match against each body, space delimited
    #[arg(long, required = true, num_args = 1.., value_name = "PATTERN")]
    regex: Vec<String>,

    /// Output file for matching results
    #[arg(long, default_value = "found_matches.txt", value_name = "PATH")]
    output: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30, value_name = "SECONDS")]
    timeout_secs: u64,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Validate and deduplicate input before any task starts; setup errors
    // are the only per-input faults that abort the run.
    let batch = Batch::new(cli.urls, cli.regex).context("Invalid input")?;

    tracing::info!(
        "Scanning {} URLs with {} patterns, writing to {}",
        batch.urls().len(),
        batch.pattern_count(),
        cli.output.display()
    );

    let summary = run_batch(batch, &cli.output, cli.timeout_secs)
        .await
        .context("Batch failed")?;

    tracing::info!(
        "Done: {} URLs scanned, {} matched, {} failed",
        summary.total,
        summary.succeeded,
        summary.failed
    );

    // Per-URL failures are recorded in the artifact, not reflected in the
    // exit status.
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("webgrep=info,warn"),
            1 => EnvFilter::new("webgrep=debug,info"),
            2 => EnvFilter::new("webgrep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
