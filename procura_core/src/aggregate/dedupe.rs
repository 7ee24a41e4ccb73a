//! Cross-provider deduplication keyed on canonical URLs.

use super::CanonicalResult;
use std::collections::HashSet;

/// Deduplication key: lowercased, trailing-slash-stripped canonical URL.
pub fn dedupe_key(result: &CanonicalResult) -> String {
    let key = if result.canonical_url.is_empty() {
        &result.url
    } else {
        &result.canonical_url
    };
    key.to_lowercase().trim_end_matches('/').to_string()
}

/// Collapse results that resolve to the same canonical URL.
///
/// First occurrence in merge order wins; later duplicates are dropped
/// entirely, provenance included. Idempotent.
pub fn dedupe(results: Vec<CanonicalResult>) -> Vec<CanonicalResult> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique = Vec::with_capacity(results.len());
    for result in results {
        if seen.insert(dedupe_key(&result)) {
            unique.push(result);
        }
    }
    unique
}

/// Stateful variant for the streaming path: the seen-set persists across
/// batches so a later-completing provider cannot re-emit an earlier URL.
#[derive(Debug, Default)]
pub struct DedupeSet {
    seen: HashSet<String>,
}

impl DedupeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only results whose key has not been seen yet, recording them.
    pub fn filter_batch(&mut self, results: Vec<CanonicalResult>) -> Vec<CanonicalResult> {
        results
            .into_iter()
            .filter(|r| self.seen.insert(dedupe_key(r)))
            .collect()
    }
}
