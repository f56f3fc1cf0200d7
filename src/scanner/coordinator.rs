//! Batch coordinator - fan-out/fan-in orchestration
//!
//! This module turns the raw input collections into an immutable [`Batch`]
//! and runs it: one task per distinct URL, all sharing one HTTP client and
//! one compiled pattern set, results funneled into the result sink. The
//! batch completes only when every task has produced its record and the sink
//! has appended every record.
//!
//! Per-URL failures are data, never batch-aborting errors; only setup-time
//! and sink-level errors terminate a run.

use crate::output::{Payload, ResultRecord, ResultSink};
use crate::scanner::fetcher::{build_http_client, FailureKind, FetchFailure};
use crate::scanner::matcher::PatternSet;
use crate::scanner::task;
use crate::{SetupError, WebgrepError};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// One invocation's worth of work, immutable once constructed
///
/// URLs and patterns are each deduplicated with set semantics before any
/// task is created; supplying the same URL twice yields exactly one task
/// and exactly one record.
#[derive(Debug)]
pub struct Batch {
    urls: Vec<String>,
    patterns: PatternSet,
}

impl Batch {
    /// Builds a batch from raw input, validating before any task starts
    ///
    /// URLs are opaque here: a malformed request target is not a setup
    /// error, it flows to the fetcher and comes back as a per-URL transport
    /// failure record, leaving the rest of the batch untouched.
    ///
    /// # Arguments
    ///
    /// * `urls` - Request targets; duplicates collapse, first-seen order kept
    /// * `patterns` - Regex patterns; duplicates collapse
    ///
    /// # Returns
    ///
    /// * `Ok(Batch)` - Inputs deduplicated, patterns compiled
    /// * `Err(SetupError)` - Empty collection or invalid pattern syntax
    pub fn new<U, P>(urls: U, patterns: P) -> Result<Self, SetupError>
    where
        U: IntoIterator<Item = String>,
        P: IntoIterator<Item = String>,
    {
        let mut seen = HashSet::new();
        let mut distinct_urls = Vec::new();
        for url in urls {
            if seen.insert(url.clone()) {
                distinct_urls.push(url);
            }
        }

        if distinct_urls.is_empty() {
            return Err(SetupError::EmptyUrls);
        }

        let patterns = PatternSet::compile(patterns)?;

        Ok(Self {
            urls: distinct_urls,
            patterns,
        })
    }

    /// Distinct URLs in this batch
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// Number of distinct compiled patterns
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

/// End-of-run accounting for one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// Distinct URLs scanned
    pub total: u64,
    /// URLs whose fetch succeeded and whose matches were recorded
    pub succeeded: u64,
    /// URLs recorded with a classified fetch failure
    pub failed: u64,
}

/// Runs a batch to completion, appending one record per URL to `output`
///
/// All tasks run fully concurrently over one shared connection pool; no
/// ordering holds between URLs, and records land in completion order. A
/// task that dies outside the classified failure paths is converted into an
/// unexpected-failure record at this boundary, so every URL is accounted
/// for exactly once.
pub async fn run_batch(
    batch: Batch,
    output: &Path,
    timeout_secs: u64,
) -> Result<BatchSummary, WebgrepError> {
    let client = build_http_client(timeout_secs)?;
    let patterns = Arc::new(batch.patterns);
    let sink = ResultSink::open(output).await?;

    tracing::info!(
        "Starting batch: {} URLs, {} patterns",
        batch.urls.len(),
        patterns.len()
    );

    let mut handles = Vec::with_capacity(batch.urls.len());
    for url in &batch.urls {
        let client = client.clone();
        let patterns = Arc::clone(&patterns);
        let tx = sink.sender();
        let task_url = url.clone();

        let handle = tokio::spawn(async move {
            let record = task::run(&client, &task_url, &patterns).await;
            let succeeded = record.is_success();
            // A send can only fail once the writer has died; the sink
            // surfaces that as a fatal error when the batch closes.
            let _ = tx.send(record).await;
            succeeded
        });
        handles.push((url.clone(), handle));
    }

    let mut succeeded = 0u64;
    let mut failed = 0u64;
    for (url, handle) in handles {
        match handle.await {
            Ok(true) => succeeded += 1,
            Ok(false) => failed += 1,
            Err(e) => {
                // Completeness: even a panicked task leaves a record behind
                tracing::error!("Task for {} died unexpectedly: {}", url, e);
                let record = ResultRecord::new(
                    url,
                    Payload::Failure(FetchFailure {
                        kind: FailureKind::Unexpected,
                        message: format!("task aborted: {}", e),
                    }),
                );
                let _ = sink.sender().send(record).await;
                failed += 1;
            }
        }
    }

    let written = sink.close().await?;
    let summary = BatchSummary {
        total: succeeded + failed,
        succeeded,
        failed,
    };

    tracing::info!(
        "Batch complete: {} records written ({} matched, {} failed)",
        written,
        summary.succeeded,
        summary.failed
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_duplicate_urls_collapse_to_one() {
        let batch = Batch::new(
            strings(&[
                "http://example.com/",
                "http://example.com/",
                "http://other.example/",
            ]),
            strings(&[r"\d+"]),
        )
        .unwrap();

        assert_eq!(
            batch.urls(),
            &["http://example.com/", "http://other.example/"]
        );
    }

    #[test]
    fn test_duplicate_patterns_collapse_to_one() {
        let batch = Batch::new(
            strings(&["http://example.com/"]),
            strings(&[r"\d+", r"\d+"]),
        )
        .unwrap();
        assert_eq!(batch.pattern_count(), 1);
    }

    #[test]
    fn test_empty_urls_is_setup_error() {
        let result = Batch::new(Vec::new(), strings(&[r"\d+"]));
        assert!(matches!(result, Err(SetupError::EmptyUrls)));
    }

    #[test]
    fn test_empty_patterns_is_setup_error() {
        let result = Batch::new(strings(&["http://example.com/"]), Vec::new());
        assert!(matches!(result, Err(SetupError::EmptyPatterns)));
    }

    #[test]
    fn test_malformed_url_is_kept_for_the_fetcher() {
        // A malformed target must not abort the batch; it gets its own
        // failure record at fetch time instead.
        let batch = Batch::new(
            strings(&["not a url", "http://example.com/"]),
            strings(&[r"\d+"]),
        )
        .unwrap();
        assert_eq!(batch.urls(), &["not a url", "http://example.com/"]);
    }

    #[test]
    fn test_invalid_pattern_rejected_before_batch_exists() {
        let result = Batch::new(strings(&["http://example.com/"]), strings(&["[unclosed"]));
        assert!(matches!(result, Err(SetupError::InvalidPattern { .. })));
    }
}
