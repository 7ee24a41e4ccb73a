//! Mock provider for development and tests.
//!
//! Returns deterministic sample data seeded from the query text, so the
//! same query always produces the same listings without any network I/O.

use crate::error::ProviderError;
use crate::query::SearchQuery;
use crate::{RawHit, SourcingProvider};
use async_trait::async_trait;
use serde_json::json;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const MERCHANTS: &[&str] = &[
    "Amazon", "Walmart", "Target", "eBay", "Best Buy", "Costco", "Kohl's", "Macy's",
];

/// Small deterministic PRNG so mock listings vary per query but never
/// between runs.
struct SeededRng(u64);

impl SeededRng {
    fn next(&mut self) -> u64 {
        // Knuth's MMIX LCG constants.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 16
    }

    fn in_range(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next() % (hi - lo + 1)
    }

    fn fraction(&mut self) -> f64 {
        (self.next() % 10_000) as f64 / 10_000.0
    }
}

#[derive(Default)]
pub struct MockShoppingProvider;

impl MockShoppingProvider {
    pub fn new() -> Self {
        Self
    }

    fn seed(query: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        query.hash(&mut hasher);
        hasher.finish()
    }
}

#[async_trait]
impl SourcingProvider for MockShoppingProvider {
    fn id(&self) -> &'static str {
        "mock"
    }

    fn description(&self) -> &'static str {
        "Deterministic sample listings for development and tests."
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawHit>, ProviderError> {
        let seed = Self::seed(&query.text);
        let mut rng = SeededRng(seed);

        let count = rng.in_range(8, 15);
        let mut hits = Vec::with_capacity(count as usize);
        for i in 0..count {
            let price = 15.0 + rng.fraction() * 135.0;
            let style = char::from(b'A' + (i % 26) as u8);
            let edition = if i % 3 == 0 { "Premium" } else { "Standard" };
            let item_key = seed.wrapping_add(i);
            hits.push(RawHit(json!({
                "title": format!("{} - Style {} {} Edition", query.text, style, edition),
                "price": (price * 100.0).round() / 100.0,
                "currency": "USD",
                "merchant": MERCHANTS[(rng.next() % MERCHANTS.len() as u64) as usize],
                "url": format!("https://example.com/product/{item_key}"),
                "image_url": format!("https://picsum.photos/seed/{item_key}/300/300"),
                "rating": ((3.5 + rng.fraction() * 1.5) * 10.0).round() / 10.0,
                "reviews_count": rng.in_range(10, 5000),
                "shipping_info": if rng.fraction() > 0.3 { "Free shipping" } else { "Ships in 2-3 days" },
            })));
        }
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deterministic_per_query() {
        let provider = MockShoppingProvider::new();
        let query = SearchQuery::new("red shoes").unwrap();
        let first = provider.search(&query).await.unwrap();
        let second = provider.search(&query).await.unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert!(first.len() >= 8 && first.len() <= 15);
    }

    #[tokio::test]
    async fn test_different_queries_differ() {
        let provider = MockShoppingProvider::new();
        let a = provider
            .search(&SearchQuery::new("red shoes").unwrap())
            .await
            .unwrap();
        let b = provider
            .search(&SearchQuery::new("blue hats").unwrap())
            .await
            .unwrap();
        assert_ne!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[tokio::test]
    async fn test_hits_normalize_cleanly() {
        let provider = MockShoppingProvider::new();
        let query = SearchQuery::new("standing desk").unwrap();
        let hits = provider.search(&query).await.unwrap();
        let results = crate::normalize::normalize("mock", &hits);
        assert_eq!(results.len(), hits.len());
        assert!(results.iter().all(|r| r.price.is_some()));
    }
}
