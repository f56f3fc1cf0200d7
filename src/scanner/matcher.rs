//! Regex matching over fetched bodies
//!
//! A [`PatternSet`] is compiled once at setup from the deduplicated input
//! patterns and then shared read-only by every task in the batch. Matching
//! pools the non-overlapping matches of *all* patterns into one set of
//! distinct substrings per body ("any pattern matched this string"), rather
//! than keeping per-pattern result sets.

use crate::SetupError;
use regex::Regex;
use std::collections::BTreeSet;

/// A compiled, deduplicated set of regex patterns
///
/// Invalid pattern syntax is a setup error surfaced here, before any task
/// starts; matching itself has no failure path.
#[derive(Debug)]
pub struct PatternSet {
    regexes: Vec<Regex>,
}

impl PatternSet {
    /// Compiles a set of patterns, deduplicating the input
    ///
    /// # Arguments
    ///
    /// * `patterns` - Raw pattern strings; duplicates collapse to one
    ///
    /// # Returns
    ///
    /// * `Ok(PatternSet)` - All patterns compiled
    /// * `Err(SetupError)` - Empty input or invalid pattern syntax
    pub fn compile<I, S>(patterns: I) -> Result<Self, SetupError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let distinct: BTreeSet<String> = patterns
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .collect();

        if distinct.is_empty() {
            return Err(SetupError::EmptyPatterns);
        }

        let mut regexes = Vec::with_capacity(distinct.len());
        for pattern in distinct {
            let regex = Regex::new(&pattern).map_err(|source| SetupError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            regexes.push(regex);
        }

        Ok(Self { regexes })
    }

    /// Number of distinct compiled patterns
    pub fn len(&self) -> usize {
        self.regexes.len()
    }

    /// Finds all distinct matched substrings in a body
    ///
    /// Every pattern contributes its non-overlapping matches; the results
    /// are pooled into a single set, so a substring matched by two patterns
    /// (or matched twice by one) appears once. An empty result is valid —
    /// no match is not an error.
    pub fn find_matches(&self, body: &str) -> BTreeSet<String> {
        let mut matches = BTreeSet::new();
        for regex in &self.regexes {
            for found in regex.find_iter(body) {
                matches.insert(found.as_str().to_string());
            }
        }
        matches
    }
}
