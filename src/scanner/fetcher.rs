//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scanner, including:
//! - Building the shared HTTP client (one connection pool per batch)
//! - GET requests to fetch page bodies
//! - Failure classification (transport vs. unexpected)
//!
//! Fetching is a total operation: it never returns an `Err`, every fault is
//! folded into a [`FetchOutcome::Failure`] so the caller can record it.

use reqwest::Client;
use std::time::Duration;

/// Result of a fetch operation
///
/// Exactly one of the two variants holds: a successfully read body, or a
/// classified failure. A failure never carries a body and vice versa.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Successfully fetched the full body as text
    Body(String),

    /// The request failed; carries the classification and a message
    Failure(FetchFailure),
}

/// A classified fetch failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// Failure classification
///
/// Transport covers connection, timeout, redirect, non-2xx status and
/// malformed-response faults; Unexpected covers everything else (for example
/// body decoding errors), and is also the tag the orchestrator uses for a
/// task that died outside the classified paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Unexpected,
}

impl FailureKind {
    /// Short lowercase tag used in the output artifact
    pub fn tag(&self) -> &'static str {
        match self {
            FailureKind::Transport => "transport",
            FailureKind::Unexpected => "unexpected",
        }
    }
}

/// Builds the HTTP client shared by all tasks in a batch
///
/// # Arguments
///
/// * `timeout_secs` - Per-request timeout in seconds; a timed-out request
///   surfaces as a transport failure, never as a batch abort
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(timeout_secs: u64) -> Result<Client, reqwest::Error> {
    let user_agent = format!("webgrep/{}", env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns the body or a classified failure
///
/// Issues a single GET over the shared client. A non-success status code is
/// a failure (never silently accepted); on success the full body is read as
/// text. Emits one log event per request: the status code on success, the
/// failure message otherwise.
pub async fn fetch_url(client: &Client, url: &str) -> FetchOutcome {
    let response = match client.get(url).send().await {
        Ok(r) => r,
        Err(e) => {
            let failure = classify_error(&e);
            tracing::error!("Request failed for {}: {}", url, failure.message);
            return FetchOutcome::Failure(failure);
        }
    };

    let status = response.status();

    // Non-2xx is a transport failure, not a body worth matching
    let response = match response.error_for_status() {
        Ok(r) => r,
        Err(_) => {
            let failure = FetchFailure {
                kind: FailureKind::Transport,
                message: format!("HTTP status {}", status.as_u16()),
            };
            tracing::error!("Got response [{}] for URL: {}", status.as_u16(), url);
            return FetchOutcome::Failure(failure);
        }
    };

    tracing::info!("Got response [{}] for URL: {}", status.as_u16(), url);

    match response.text().await {
        Ok(body) => FetchOutcome::Body(body),
        Err(e) => {
            let failure = classify_error(&e);
            tracing::error!("Failed to read body for {}: {}", url, failure.message);
            FetchOutcome::Failure(failure)
        }
    }
}

/// Classifies a reqwest error into a [`FetchFailure`]
///
/// Timeouts, connection faults, redirect faults, status errors, malformed
/// request targets and body transfer faults are transport failures;
/// decoding faults and anything not recognized are unexpected.
fn classify_error(e: &reqwest::Error) -> FetchFailure {
    let kind = if e.is_decode() {
        FailureKind::Unexpected
    } else if e.is_timeout()
        || e.is_connect()
        || e.is_redirect()
        || e.is_status()
        || e.is_request()
        || e.is_body()
        || e.is_builder()
    {
        FailureKind::Transport
    } else {
        FailureKind::Unexpected
    };

    FetchFailure {
        kind,
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(30);
        assert!(client.is_ok());
    }

    #[test]
    fn test_failure_kind_tags() {
        assert_eq!(FailureKind::Transport.tag(), "transport");
        assert_eq!(FailureKind::Unexpected.tag(), "unexpected");
    }

    #[tokio::test]
    async fn test_malformed_url_is_transport_failure() {
        let client = build_http_client(5).unwrap();

        let outcome = fetch_url(&client, "not a url").await;
        match outcome {
            FetchOutcome::Failure(f) => assert_eq!(f.kind, FailureKind::Transport),
            FetchOutcome::Body(_) => panic!("expected a failure"),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport() {
        let client = build_http_client(5).unwrap();

        // Port 1 on localhost is essentially never listening
        let outcome = fetch_url(&client, "http://127.0.0.1:1/").await;
        match outcome {
            FetchOutcome::Failure(f) => assert_eq!(f.kind, FailureKind::Transport),
            FetchOutcome::Body(_) => panic!("expected a failure"),
        }
    }
}
