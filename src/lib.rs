//! Webgrep: concurrent regex matching over live pages
//!
//! This crate fetches a set of URLs concurrently, scans each response body
//! against a set of regular-expression patterns, deduplicates the matches per
//! URL, and appends one record per URL to a shared tab-separated output file.
//! One bad host never aborts the batch: per-URL failures are recorded as data.

pub mod output;
pub mod scanner;

use thiserror::Error;

/// Main error type for webgrep operations
#[derive(Debug, Error)]
pub enum WebgrepError {
    #[error("Setup error: {0}")]
    Setup(#[from] SetupError),

    #[error("Output sink error: {0}")]
    Sink(#[from] output::SinkError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Setup-time errors
///
/// These abort the run before any task starts; they are the only errors
/// (besides sink failures) that terminate a batch.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("No URLs supplied")]
    EmptyUrls,

    #[error("No regex patterns supplied")]
    EmptyPatterns,

    #[error("Invalid regex pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// Result type alias for webgrep operations
pub type Result<T> = std::result::Result<T, WebgrepError>;

/// Result type alias for setup operations
pub type SetupResult<T> = std::result::Result<T, SetupError>;

// Re-export commonly used types
pub use output::{Payload, ResultRecord, ResultSink};
pub use scanner::{run_batch, Batch, BatchSummary, FetchOutcome, PatternSet};
