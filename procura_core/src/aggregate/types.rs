//! Core types for aggregated search results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Terminal status of one provider task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Provider completed, possibly with zero hits.
    Ok,
    /// Generic failure.
    Error,
    /// Exceeded the per-provider time budget.
    Timeout,
    /// Quota/payment-required signal from the upstream.
    Exhausted,
    /// Throttling signal from the upstream.
    RateLimited,
}

impl OutcomeStatus {
    pub fn is_ok(self) -> bool {
        self == OutcomeStatus::Ok
    }
}

/// Execution record for one dispatched provider, finalized exactly once
/// when the task completes or times out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderOutcome {
    /// Provider id this outcome belongs to.
    pub provider_id: String,

    /// Terminal status.
    pub status: OutcomeStatus,

    /// Hits the provider produced (0 for any non-ok status).
    #[serde(default)]
    pub result_count: usize,

    /// Wall-clock latency of the provider task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,

    /// Redacted failure detail, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProviderOutcome {
    /// Record a successful completion.
    pub fn ok(provider_id: impl Into<String>, result_count: usize, latency_ms: u64) -> Self {
        Self {
            provider_id: provider_id.into(),
            status: OutcomeStatus::Ok,
            result_count,
            latency_ms: Some(latency_ms),
            message: None,
        }
    }

    /// Record a failure with its classified status.
    pub fn failed(
        provider_id: impl Into<String>,
        status: OutcomeStatus,
        latency_ms: u64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            status,
            result_count: 0,
            latency_ms: Some(latency_ms),
            message: Some(message.into()),
        }
    }

    /// Record a timeout.
    pub fn timed_out(provider_id: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            provider_id: provider_id.into(),
            status: OutcomeStatus::Timeout,
            result_count: 0,
            latency_ms: Some(latency_ms),
            message: Some("Search timed out".to_string()),
        }
    }
}

/// Echo of the product fields a result matched on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductInfo {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub specs: Value,
}

/// Why a result matched, attached per result.
///
/// Built once by the normalizer; downstream enrichment may append to
/// `matched_features` but never removes entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Provenance {
    pub product_info: ProductInfo,

    /// Ordered, human-readable relevance signals.
    #[serde(default)]
    pub matched_features: Vec<String>,

    /// Provider that produced the result.
    pub source_provider: String,

    /// Cosine similarity reported by the vendor directory, when the result
    /// came from it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_similarity: Option<f64>,
}

/// The merged, normalized representation of one offer, independent of its
/// source provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalResult {
    /// Listing title, non-empty.
    pub title: String,

    /// Price in `currency`. `None` means quote-based/unknown, never zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    /// 3-letter currency code.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Price as the provider reported it, before FX conversion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_original: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_original: Option<String>,

    /// Merchant display name.
    pub merchant_name: String,

    /// Host of the listing URL, www-stripped and lowercased; "unknown"
    /// when unparseable.
    pub merchant_domain: String,

    /// Listing URL as the provider returned it (absolute-ized).
    pub url: String,

    /// Stable canonical form of `url`, used as the deduplication key.
    pub canonical_url: String,

    /// Outbound redirect convenience URL; downstream layers may override.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub click_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews_count: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_info: Option<String>,

    /// Provider id that produced this result.
    pub source: String,

    /// Relevance score in [0, 1]; 0.0 until scored.
    #[serde(default)]
    pub match_score: f64,

    /// Structured explanation of the match.
    #[serde(default)]
    pub provenance: Provenance,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl CanonicalResult {
    /// Create a result with required fields; everything else defaults.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        merchant_name: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        let url = url.into();
        let source = source.into();
        Self {
            title: title.into(),
            price: None,
            currency: default_currency(),
            price_original: None,
            currency_original: None,
            merchant_name: merchant_name.into(),
            merchant_domain: crate::util::url::merchant_domain(&url),
            canonical_url: crate::util::url::canonicalize_url(&url),
            url,
            click_url: String::new(),
            image_url: None,
            rating: None,
            reviews_count: None,
            shipping_info: None,
            provenance: Provenance {
                source_provider: source.clone(),
                ..Provenance::default()
            },
            source,
            match_score: 0.0,
        }
    }

    /// Builder method to set the price.
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Builder method to set the currency.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Builder method to set the image URL.
    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Builder method to set rating and review count.
    pub fn with_reputation(mut self, rating: Option<f64>, reviews_count: Option<u64>) -> Self {
        self.rating = rating;
        self.reviews_count = reviews_count;
        self
    }

    /// Builder method to set the shipping description.
    pub fn with_shipping(mut self, shipping_info: impl Into<String>) -> Self {
        self.shipping_info = Some(shipping_info.into());
        self
    }
}

/// One emission of the streaming aggregator: everything a single provider
/// contributed, in completion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamBatch {
    pub provider_id: String,

    /// Deduplicated, scored results from this provider.
    pub results: Vec<CanonicalResult>,

    pub outcome: ProviderOutcome,

    /// Providers still running; 0 signals stream completion.
    pub providers_remaining: usize,
}

/// Complete response of a collect-all aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateResponse {
    /// Deduplicated results, sorted by score descending.
    pub results: Vec<CanonicalResult>,

    /// One outcome per dispatched provider, in registration order.
    pub provider_outcomes: Vec<ProviderOutcome>,

    /// True iff every outcome is non-ok.
    #[serde(default)]
    pub all_providers_failed: bool,

    /// Caller-facing explanation when the search came back empty for a
    /// reason worth surfacing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_message: Option<String>,

    pub generated_at: DateTime<Utc>,
}

impl AggregateResponse {
    /// Number of providers that completed ok.
    pub fn providers_succeeded(&self) -> usize {
        self.provider_outcomes
            .iter()
            .filter(|o| o.status.is_ok())
            .count()
    }
}
