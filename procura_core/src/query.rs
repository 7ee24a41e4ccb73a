//! The immutable search request consumed by every provider.

use crate::error::QueryError;
use serde::{Deserialize, Serialize};

/// A fully-formed search request.
///
/// The HTTP layer owns query sanitation (price-pattern stripping, length
/// capping); this type only rejects queries that are empty after trimming
/// and repairs inverted price bounds by swapping them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text query, non-empty after trimming.
    pub text: String,

    /// Country hint (e.g. "us"), passed to providers that accept one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Language hint (e.g. "en").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Inclusive lower price bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,

    /// Inclusive upper price bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,

    /// Restrict dispatch to these provider ids. Empty means all registered
    /// providers; unknown ids select nothing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub providers: Vec<String>,

    /// Per-provider result cap hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Drop results whose title contains any of these terms.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_keywords: Vec<String>,

    /// Drop results from merchants matching any of these terms.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_merchants: Vec<String>,
}

impl SearchQuery {
    /// Create a query, failing fast on empty text.
    pub fn new(text: impl Into<String>) -> Result<Self, QueryError> {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return Err(QueryError::Empty);
        }
        Ok(Self {
            text,
            country: None,
            language: None,
            min_price: None,
            max_price: None,
            providers: Vec::new(),
            limit: None,
            exclude_keywords: Vec::new(),
            exclude_merchants: Vec::new(),
        })
    }

    /// Builder method to set locale hints.
    pub fn with_locale(
        mut self,
        country: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        self.country = Some(country.into());
        self.language = Some(language.into());
        self
    }

    /// Builder method to set price bounds; inverted bounds are swapped.
    pub fn with_price_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        match (min, max) {
            (Some(lo), Some(hi)) if lo > hi => {
                self.min_price = Some(hi);
                self.max_price = Some(lo);
            }
            _ => {
                self.min_price = min;
                self.max_price = max;
            }
        }
        self
    }

    /// Builder method to restrict dispatch to a subset of providers.
    pub fn with_providers<I, S>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.providers = providers.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to cap results per provider.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Builder method to set post-search exclusion lists.
    pub fn with_exclusions<I, S>(mut self, keywords: I, merchants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_keywords = keywords.into_iter().map(Into::into).collect();
        self.exclude_merchants = merchants.into_iter().map(Into::into).collect();
        self
    }

    /// Whether any price bound is set.
    pub fn has_price_bounds(&self) -> bool {
        self.min_price.is_some() || self.max_price.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_and_rejects_empty() {
        assert_eq!(SearchQuery::new("  red shoes ").unwrap().text, "red shoes");
        assert_eq!(SearchQuery::new("   "), Err(QueryError::Empty));
        assert_eq!(SearchQuery::new(""), Err(QueryError::Empty));
    }

    #[test]
    fn test_inverted_price_bounds_swapped() {
        let query = SearchQuery::new("desk")
            .unwrap()
            .with_price_bounds(Some(300.0), Some(100.0));
        assert_eq!(query.min_price, Some(100.0));
        assert_eq!(query.max_price, Some(300.0));
    }

    #[test]
    fn test_single_bound_kept() {
        let query = SearchQuery::new("desk")
            .unwrap()
            .with_price_bounds(None, Some(50.0));
        assert_eq!(query.min_price, None);
        assert_eq!(query.max_price, Some(50.0));
        assert!(query.has_price_bounds());
    }

    #[test]
    fn test_provider_restriction() {
        let query = SearchQuery::new("desk")
            .unwrap()
            .with_providers(["amazon", "ebay_browse"]);
        assert_eq!(query.providers, vec!["amazon", "ebay_browse"]);
    }
}
