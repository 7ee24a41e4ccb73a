// src/lib.rs
pub mod aggregate;
pub mod error;
pub mod filters;
pub mod metrics;
pub mod normalize;
pub mod providers;
pub mod query;
pub mod util;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use crate::aggregate::{
    AggregateResponse, Aggregator, CanonicalResult, EngineConfig, OutcomeStatus, ProviderOutcome,
    Provenance, SearchStream, StreamBatch,
};
pub use crate::error::{ProviderError, QueryError};
pub use crate::query::SearchQuery;

/// One provider-native search hit.
///
/// The payload shape is whatever the upstream API returned for a single
/// item; it never crosses the adapter boundary except into that provider's
/// paired normalizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawHit(pub serde_json::Value);

/// One external search integration.
///
/// Implementations perform a single upstream lookup per call and return
/// the raw hits in their native shape. An adapter that is not applicable
/// to a query class returns an empty list, not an error. Adapters may
/// retry internally, but the aggregator imposes the overall time budget
/// externally.
#[async_trait]
pub trait SourcingProvider: Send + Sync {
    /// Unique provider id, used for registry lookup and result provenance.
    fn id(&self) -> &'static str;

    /// Human-readable description of the integration.
    fn description(&self) -> &'static str;

    /// Execute one search against the external system.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawHit>, ProviderError>;
}

/// Registry entry summary, for diagnostics and admin surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub id: String,
    pub description: String,
}

/// Ordered collection of registered providers.
///
/// Registration order is load-bearing: it fixes the merge order of the
/// collect-all engine and therefore which provider owns a deduplicated
/// URL, independent of task completion order. The registry is read-only
/// during a call and safe to share across concurrent calls.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<(String, Arc<dyn SourcingProvider>)>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its own id.
    ///
    /// Re-registering an id replaces the adapter in place, keeping its
    /// original position.
    pub fn register(&mut self, provider: Arc<dyn SourcingProvider>) {
        let id = provider.id().to_string();
        if let Some(entry) = self.providers.iter_mut().find(|(existing, _)| *existing == id) {
            entry.1 = provider;
        } else {
            self.providers.push((id, provider));
        }
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn SourcingProvider>> {
        self.providers
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, provider)| provider)
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> Vec<String> {
        self.providers.iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn provider_details(&self) -> Vec<ProviderInfo> {
        self.providers
            .iter()
            .map(|(id, provider)| ProviderInfo {
                id: id.clone(),
                description: provider.description().to_string(),
            })
            .collect()
    }

    /// Select the active provider set for a call, in registration order.
    ///
    /// An empty filter selects every registered provider; unknown names in
    /// the filter are silently ignored.
    pub fn select(&self, filter: &[String]) -> Vec<(String, Arc<dyn SourcingProvider>)> {
        let allow: Vec<&str> = filter
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .collect();
        self.providers
            .iter()
            .filter(|(id, _)| allow.is_empty() || allow.contains(&id.as_str()))
            .map(|(id, provider)| (id.clone(), Arc::clone(provider)))
            .collect()
    }
}

/// Build a registry from environment/secret material.
///
/// Each provider is registered only when its credentials are present. The
/// mock provider backstops an otherwise-empty registry unless explicitly
/// forced on or off via `USE_MOCK_SEARCH`.
pub fn registry_from_env() -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();

    if let Ok(key) = std::env::var("SERPAPI_API_KEY") {
        if !key.is_empty() && key != "demo" {
            if let Ok(provider) = providers::google_shopping::GoogleShoppingProvider::new(key) {
                registry.register(Arc::new(provider));
            }
        }
    }

    if let (Ok(client_id), Ok(client_secret)) = (
        std::env::var("EBAY_CLIENT_ID"),
        std::env::var("EBAY_CLIENT_SECRET"),
    ) {
        if !client_id.is_empty() && !client_secret.is_empty() {
            let marketplace_id =
                std::env::var("EBAY_MARKETPLACE_ID").unwrap_or_else(|_| "EBAY-US".to_string());
            if let Ok(provider) =
                providers::ebay::EbayBrowseProvider::new(client_id, client_secret, marketplace_id)
            {
                registry.register(Arc::new(provider));
            }
        }
    }

    if let Ok(key) = std::env::var("RAINFOREST_API_KEY") {
        if !key.is_empty() {
            if let Ok(provider) = providers::amazon::AmazonCatalogProvider::new(key) {
                registry.register(Arc::new(provider));
            }
        }
    }

    if let Ok(base_url) = std::env::var("VENDOR_DIRECTORY_URL") {
        if !base_url.is_empty() {
            if let Ok(provider) =
                providers::directory::VendorDirectoryProvider::new(base_url)
            {
                registry.register(Arc::new(provider));
            }
        }
    }

    let use_mock = std::env::var("USE_MOCK_SEARCH").unwrap_or_else(|_| "auto".to_string());
    match use_mock.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "always" => {
            registry.register(Arc::new(providers::mock::MockShoppingProvider::new()));
        }
        "auto" => {
            if registry.is_empty() {
                registry.register(Arc::new(providers::mock::MockShoppingProvider::new()));
            }
        }
        _ => {}
    }

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubProvider {
        id: &'static str,
    }

    #[async_trait]
    impl SourcingProvider for StubProvider {
        fn id(&self) -> &'static str {
            self.id
        }
        fn description(&self) -> &'static str {
            "stub"
        }
        async fn search(&self, _query: &SearchQuery) -> Result<Vec<RawHit>, ProviderError> {
            Ok(Vec::new())
        }
    }

    fn registry_with(ids: &[&'static str]) -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();
        for id in ids {
            registry.register(Arc::new(StubProvider { id }));
        }
        registry
    }

    #[test]
    fn test_registration_order_preserved() {
        let registry = registry_with(&["alpha", "beta", "gamma"]);
        assert_eq!(registry.ids(), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_reregistration_keeps_position() {
        let mut registry = registry_with(&["alpha", "beta"]);
        registry.register(Arc::new(StubProvider { id: "alpha" }));
        assert_eq!(registry.ids(), vec!["alpha", "beta"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_select_empty_filter_selects_all() {
        let registry = registry_with(&["alpha", "beta"]);
        let selected = registry.select(&[]);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn test_select_ignores_unknown_names() {
        let registry = registry_with(&["alpha", "beta"]);
        let selected = registry.select(&["beta".to_string(), "nope".to_string()]);
        let ids: Vec<_> = selected.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["beta"]);
    }

    #[test]
    fn test_select_keeps_registration_order() {
        let registry = registry_with(&["alpha", "beta", "gamma"]);
        let selected = registry.select(&["gamma".to_string(), "alpha".to_string()]);
        let ids: Vec<_> = selected.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "gamma"]);
    }
}
