//! Relevance scoring for merged results.

use super::CanonicalResult;
use crate::query::SearchQuery;
use std::collections::HashSet;

// Weighting is behavioral parity with the shipped ranker; treat these as
// tuning constants, not derived values.
pub const TITLE_OVERLAP_WEIGHT: f64 = 0.4;
pub const HAS_IMAGE_WEIGHT: f64 = 0.15;
pub const HAS_RATING_WEIGHT: f64 = 0.15;
pub const HAS_REVIEWS_WEIGHT: f64 = 0.15;
pub const HAS_PRICE_WEIGHT: f64 = 0.15;

/// Score threshold above which a "Strong match" provenance feature is added.
pub const STRONG_MATCH_THRESHOLD: f64 = 0.7;

/// Feature text appended when a result clears [`STRONG_MATCH_THRESHOLD`].
pub const STRONG_MATCH_FEATURE: &str = "Strong match for your search";

/// Compute a relevance score in [0, 1] for one result.
///
/// Factors: query-word overlap with the title, and presence of an image,
/// a rating, reviews, and a price. Deterministic and pure.
pub fn compute_match_score(result: &CanonicalResult, query: &str) -> f64 {
    let mut score = 0.0;

    let query_words: HashSet<String> = query
        .to_lowercase()
        .split_whitespace()
        .map(|w| w.to_string())
        .collect();
    if !query_words.is_empty() {
        let title_words: HashSet<String> = result
            .title
            .to_lowercase()
            .split_whitespace()
            .map(|w| w.to_string())
            .collect();
        let overlap = query_words.intersection(&title_words).count();
        score += TITLE_OVERLAP_WEIGHT * (overlap as f64 / query_words.len() as f64);
    }

    if result.image_url.is_some() {
        score += HAS_IMAGE_WEIGHT;
    }
    if result.rating.is_some_and(|r| r > 0.0) {
        score += HAS_RATING_WEIGHT;
    }
    if result.reviews_count.is_some_and(|n| n > 0) {
        score += HAS_REVIEWS_WEIGHT;
    }
    if result.price.is_some_and(|p| p > 0.0) {
        score += HAS_PRICE_WEIGHT;
    }

    score.min(1.0)
}

/// Score every result against the query, append the "Strong match"
/// provenance feature where earned, and stable-sort by score descending.
pub fn score_and_sort(results: &mut Vec<CanonicalResult>, query: &SearchQuery) {
    for result in results.iter_mut() {
        result.match_score = compute_match_score(result, &query.text);
        if result.match_score > STRONG_MATCH_THRESHOLD {
            result
                .provenance
                .matched_features
                .push(STRONG_MATCH_FEATURE.to_string());
        }
    }
    // sort_by is stable: ties keep their pre-sort relative order.
    results.sort_by(|a, b| {
        b.match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
