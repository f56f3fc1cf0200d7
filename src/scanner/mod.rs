//! Scanner module for concurrent fetch-and-match
//!
//! This module contains the core pipeline, including:
//! - HTTP fetching over a shared connection pool
//! - Regex matching with per-URL match deduplication
//! - The per-URL task unit (fetch, classify, match)
//! - Batch coordination (fan-out, fan-in, completeness accounting)

mod coordinator;
mod fetcher;
mod matcher;
mod task;

pub use coordinator::{run_batch, Batch, BatchSummary};
pub use fetcher::{build_http_client, fetch_url, FailureKind, FetchFailure, FetchOutcome};
pub use matcher::PatternSet;
