//! Vendor directory semantic matching.
//!
//! Queries the internal vendor-directory service, which embeds the query
//! and runs cosine similarity against vendor embeddings server-side. The
//! directory always runs alongside the shopping providers; its vendors are
//! quote-based, so they merge into the pipeline with `price = None`.

use crate::error::ProviderError;
use crate::query::SearchQuery;
use crate::{RawHit, SourcingProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

/// Cosine distance cutoff: 0 = identical, 2 = opposite.
pub const DEFAULT_DISTANCE_THRESHOLD: f64 = 0.45;

const DEFAULT_LIMIT: u32 = 15;

pub struct VendorDirectoryProvider {
    client: Client,
    base_url: String,
    distance_threshold: f64,
}

impl VendorDirectoryProvider {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(super::USER_AGENT)
            .build()
            .map_err(|e| ProviderError::Other(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
        })
    }

    /// Override the distance cutoff (looser = more, fuzzier matches).
    pub fn with_distance_threshold(mut self, threshold: f64) -> Self {
        self.distance_threshold = threshold;
        self
    }

    /// Keep vendors under the distance cutoff, stamping each with its
    /// similarity so the normalizer can surface it in provenance.
    fn filter_matches(&self, vendors: &[Value]) -> Vec<RawHit> {
        vendors
            .iter()
            .filter_map(|vendor| {
                let distance = vendor.get("distance").and_then(|v| v.as_f64());
                let similarity = match distance {
                    Some(distance) if distance > self.distance_threshold => return None,
                    Some(distance) => 1.0 - distance,
                    None => vendor.get("similarity").and_then(|v| v.as_f64())?,
                };
                let mut stamped = vendor.clone();
                if let Some(map) = stamped.as_object_mut() {
                    map.insert("similarity".to_string(), json!(similarity));
                    map.remove("distance");
                }
                Some(RawHit(stamped))
            })
            .collect()
    }
}

#[async_trait]
impl SourcingProvider for VendorDirectoryProvider {
    fn id(&self) -> &'static str {
        "vendor_directory"
    }

    fn description(&self) -> &'static str {
        "Semantic vendor-directory matching via the directory service."
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawHit>, ProviderError> {
        let url = format!("{}/match", self.base_url);
        let body = json!({
            "query": query.text,
            "limit": query.limit.unwrap_or(DEFAULT_LIMIT),
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(ProviderError::HttpRequest)?;
        let status = response.status();
        let data: Value = response.json().await.map_err(ProviderError::HttpRequest)?;
        if !status.is_success() {
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                message: format!("directory service error: {data}"),
            });
        }

        let vendors = data
            .get("vendors")
            .and_then(|v| v.as_array())
            .cloned()
            .or_else(|| data.as_array().cloned())
            .unwrap_or_default();

        let hits = self.filter_matches(&vendors);
        tracing::debug!(
            provider_id = self.id(),
            checked = vendors.len(),
            matched = hits.len(),
            threshold = self.distance_threshold,
            "directory match complete"
        );
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> VendorDirectoryProvider {
        VendorDirectoryProvider::new("http://directory.internal").unwrap()
    }

    #[test]
    fn test_distance_threshold_filters() {
        let vendors = vec![
            json!({"name": "Close Match", "distance": 0.2}),
            json!({"name": "Far Match", "distance": 0.9}),
        ];
        let hits = provider().filter_matches(&vendors);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0["name"], "Close Match");
        let similarity = hits[0].0["similarity"].as_f64().unwrap();
        assert!((similarity - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_precomputed_similarity_accepted() {
        let vendors = vec![json!({"name": "Scored", "similarity": 0.75})];
        let hits = provider().filter_matches(&vendors);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0["similarity"].as_f64(), Some(0.75));
    }

    #[test]
    fn test_unscored_vendor_dropped() {
        let vendors = vec![json!({"name": "No Score"})];
        assert!(provider().filter_matches(&vendors).is_empty());
    }

    #[test]
    fn test_custom_threshold() {
        let vendors = vec![json!({"name": "Borderline", "distance": 0.6})];
        let strict = provider();
        assert!(strict.filter_matches(&vendors).is_empty());
        let loose = provider().with_distance_threshold(0.7);
        assert_eq!(loose.filter_matches(&vendors).len(), 1);
    }
}
