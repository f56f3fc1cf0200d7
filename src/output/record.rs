//! Result records and their on-disk rendering
//!
//! One [`ResultRecord`] is produced per URL per batch and rendered as a
//! single tab-separated line: `<url>\t<payload>`. Matched substrings and
//! failure messages are debug-escaped so embedded tabs or newlines can never
//! split a record across lines or columns.

use crate::scanner::FetchFailure;
use std::collections::BTreeSet;
use std::fmt;

/// Column header written once before any record
pub const HEADER: &str = "initial_url\tregex_matching_result";

/// The success-or-failure outcome for one URL
#[derive(Debug)]
pub struct ResultRecord {
    pub url: String,
    pub payload: Payload,
}

/// Exactly one of the two holds: a match set, or a classified fetch failure
#[derive(Debug)]
pub enum Payload {
    Matches(BTreeSet<String>),
    Failure(FetchFailure),
}

impl ResultRecord {
    pub fn new(url: impl Into<String>, payload: Payload) -> Self {
        Self {
            url: url.into(),
            payload,
        }
    }

    /// Whether this record carries matches rather than a failure
    pub fn is_success(&self) -> bool {
        matches!(self.payload, Payload::Matches(_))
    }

    /// Renders the record as one output line, without the trailing newline
    pub fn to_line(&self) -> String {
        format!("{}\t{}", self.url, self.payload)
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Matches(matches) => {
                write!(f, "{{")?;
                for (i, m) in matches.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    // Debug formatting quotes and escapes the substring
                    write!(f, "{:?}", m)?;
                }
                write!(f, "}}")
            }
            Payload::Failure(failure) => {
                write!(
                    f,
                    "error[{}]: {}",
                    failure.kind.tag(),
                    failure.message.escape_debug()
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::FailureKind;

    fn matches(values: &[&str]) -> Payload {
        Payload::Matches(values.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_match_line_is_sorted_and_quoted() {
        let record = ResultRecord::new("http://a.example/", matches(&["22", "1"]));
        assert_eq!(record.to_line(), "http://a.example/\t{\"1\", \"22\"}");
    }

    #[test]
    fn test_empty_match_set_renders_empty_braces() {
        let record = ResultRecord::new("http://a.example/", matches(&[]));
        assert_eq!(record.to_line(), "http://a.example/\t{}");
    }

    #[test]
    fn test_failure_line_carries_classification_tag() {
        let record = ResultRecord::new(
            "http://b.example/",
            Payload::Failure(FetchFailure {
                kind: FailureKind::Transport,
                message: "HTTP status 404".to_string(),
            }),
        );
        assert_eq!(
            record.to_line(),
            "http://b.example/\terror[transport]: HTTP status 404"
        );
    }

    #[test]
    fn test_embedded_control_characters_stay_on_one_line() {
        let record = ResultRecord::new("http://a.example/", matches(&["a\tb", "c\nd"]));
        let line = record.to_line();

        assert!(!line.contains('\n'));
        // The only literal tab is the column separator
        assert_eq!(line.matches('\t').count(), 1);
    }

    #[test]
    fn test_success_and_failure_are_mutually_exclusive() {
        let ok = ResultRecord::new("u", matches(&["x"]));
        let err = ResultRecord::new(
            "u",
            Payload::Failure(FetchFailure {
                kind: FailureKind::Unexpected,
                message: "boom".to_string(),
            }),
        );
        assert!(ok.is_success());
        assert!(!err.is_success());
    }
}
