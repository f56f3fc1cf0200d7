//! Per-URL task unit
//!
//! Composes the fetcher and the matcher for a single URL: fetch, classify
//! the failure if any, otherwise match. Always produces exactly one
//! [`ResultRecord`] — a URL is never left unaccounted for, and the matcher
//! is never invoked on a failed fetch.

use crate::output::{Payload, ResultRecord};
use crate::scanner::fetcher::{fetch_url, FetchOutcome};
use crate::scanner::matcher::PatternSet;
use reqwest::Client;

/// Runs the fetch-match pipeline for one URL
///
/// This function has no error path: both fetch outcomes map to a record,
/// and matching cannot fail for a compiled pattern set.
pub async fn run(client: &Client, url: &str, patterns: &PatternSet) -> ResultRecord {
    match fetch_url(client, url).await {
        FetchOutcome::Body(body) => {
            let matches = patterns.find_matches(&body);
            tracing::info!("Found {} matches for {}", matches.len(), url);
            ResultRecord::new(url, Payload::Matches(matches))
        }
        FetchOutcome::Failure(failure) => ResultRecord::new(url, Payload::Failure(failure)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::fetcher::{build_http_client, FailureKind};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_successful_fetch_produces_matches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("x1y22"))
            .mount(&server)
            .await;

        let client = build_http_client(5).unwrap();
        let patterns = PatternSet::compile([r"\d+"]).unwrap();
        let url = format!("{}/", server.uri());

        let record = run(&client, &url, &patterns).await;
        match record.payload {
            Payload::Matches(matches) => {
                assert_eq!(matches.len(), 2);
                assert!(matches.contains("1"));
                assert!(matches.contains("22"));
            }
            Payload::Failure(f) => panic!("expected matches, got failure: {}", f.message),
        }
    }

    #[tokio::test]
    async fn test_http_error_produces_failure_not_matches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(500).set_body_string("12345"))
            .mount(&server)
            .await;

        let client = build_http_client(5).unwrap();
        let patterns = PatternSet::compile([r"\d+"]).unwrap();
        let url = format!("{}/", server.uri());

        // The 500 body contains digits, but a failed fetch must never be matched
        let record = run(&client, &url, &patterns).await;
        match record.payload {
            Payload::Failure(f) => {
                assert_eq!(f.kind, FailureKind::Transport);
                assert!(f.message.contains("500"));
            }
            Payload::Matches(_) => panic!("expected failure for HTTP 500"),
        }
    }
}
