//! Raw-hit normalization.
//!
//! Converts provider-native hits into [`CanonicalResult`]s. Each provider
//! with a distinctive payload shape has its own mapper; everything else
//! goes through the generic mapper, which probes the field names commonly
//! seen across shopping APIs. Pure functions of their inputs, no I/O.

mod amazon;
mod directory;
mod ebay;
mod google_shopping;

use crate::aggregate::{CanonicalResult, Provenance};
use crate::util::currency::convert_currency;
use crate::util::price::parse_price_value;
use crate::util::url::{ensure_absolute, is_allowed_scheme};
use crate::RawHit;
use serde_json::Value;

/// Rating above which a "Highly rated" feature is recorded.
pub const HIGH_RATING_THRESHOLD: f64 = 4.0;

/// Review count above which a "Popular" feature is recorded.
pub const POPULAR_REVIEWS_THRESHOLD: u64 = 100;

/// Field set a provider mapper extracts from one raw hit before the shared
/// finishing pass.
#[derive(Debug, Default)]
pub(crate) struct ExtractedHit {
    pub title: String,
    pub url: String,
    pub merchant: String,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub image_url: Option<String>,
    pub rating: Option<f64>,
    pub reviews_count: Option<u64>,
    pub shipping_info: Option<String>,
    pub vector_similarity: Option<f64>,
}

/// Normalize a provider's raw hits into canonical results.
pub fn normalize(provider_id: &str, hits: &[RawHit]) -> Vec<CanonicalResult> {
    let mapper: fn(&Value) -> Option<ExtractedHit> = match provider_id {
        "google_shopping" => google_shopping::extract,
        "ebay_browse" => ebay::extract,
        "amazon" => amazon::extract,
        "vendor_directory" => directory::extract,
        _ => extract_generic,
    };

    hits.iter()
        .filter_map(|hit| mapper(&hit.0))
        .filter_map(|extracted| build_result(provider_id, extracted))
        .collect()
}

/// Shared finishing pass: URL policy, currency conversion, provenance.
///
/// Returns `None` for hits with an empty title or a URL outside the
/// http/https/mailto set.
pub(crate) fn build_result(provider_id: &str, hit: ExtractedHit) -> Option<CanonicalResult> {
    if hit.title.trim().is_empty() {
        return None;
    }
    let url = ensure_absolute(&hit.url);
    if !is_allowed_scheme(&url) {
        return None;
    }

    let merchant = if hit.merchant.trim().is_empty() {
        "Unknown".to_string()
    } else {
        hit.merchant
    };

    let mut result = CanonicalResult::new(hit.title, url, merchant, provider_id);

    let reported_currency = hit
        .currency
        .clone()
        .unwrap_or_else(|| "USD".to_string());
    match convert_currency(hit.price, Some(&reported_currency), Some("USD")) {
        Some(converted) => {
            result.price = Some(converted);
            result.currency = "USD".to_string();
            result.price_original = hit.price;
            result.currency_original = Some(reported_currency);
        }
        None => {
            result.price = hit.price;
            result.currency = reported_currency;
        }
    }

    result.image_url = hit.image_url;
    result.rating = hit.rating;
    result.reviews_count = hit.reviews_count;
    result.shipping_info = hit.shipping_info;

    let provenance = build_provenance(&result, provider_id, hit.vector_similarity);
    result.provenance = provenance;
    Some(result)
}

/// Build the provenance bag from a result's own fields.
///
/// The "Strong match" feature is score-dependent and appended later by the
/// scoring pass; everything else is fixed at normalization time. A result
/// with no signals gets an empty (not missing) feature list.
fn build_provenance(
    result: &CanonicalResult,
    provider_id: &str,
    vector_similarity: Option<f64>,
) -> Provenance {
    let mut matched_features = Vec::new();

    if let Some(rating) = result.rating {
        if rating > HIGH_RATING_THRESHOLD {
            matched_features.push(format!("Highly rated ({rating:.1}★)"));
        }
    }
    if let Some(shipping) = &result.shipping_info {
        if !shipping.trim().is_empty() {
            matched_features.push(shipping.clone());
        }
    }
    if let Some(reviews) = result.reviews_count {
        if reviews > POPULAR_REVIEWS_THRESHOLD {
            matched_features.push(format!("Popular ({reviews} reviews)"));
        }
    }

    Provenance {
        product_info: crate::aggregate::ProductInfo {
            title: result.title.clone(),
            brand: None,
            specs: Value::Null,
        },
        matched_features,
        source_provider: provider_id.to_string(),
        vector_similarity,
    }
}

fn string_field(item: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| item.get(*key))
        .filter_map(|v| v.as_str())
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .map(|s| s.to_string())
}

fn u64_field(item: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter()
        .filter_map(|key| item.get(*key))
        .find_map(|v| v.as_u64())
}

/// Fallback mapper probing field names common across shopping APIs.
fn extract_generic(item: &Value) -> Option<ExtractedHit> {
    let title = string_field(item, &["title", "name"])?;
    let url = string_field(item, &["url", "link", "product_link"]).unwrap_or_default();
    Some(ExtractedHit {
        title,
        url,
        merchant: string_field(item, &["merchant", "seller", "source"]).unwrap_or_default(),
        price: item.get("price").and_then(parse_price_value),
        currency: string_field(item, &["currency"]),
        image_url: string_field(item, &["image_url", "image", "thumbnail"]),
        rating: item.get("rating").and_then(|v| v.as_f64()),
        reviews_count: u64_field(item, &["reviews_count", "reviews"]),
        shipping_info: string_field(item, &["shipping_info", "shipping", "delivery"]),
        vector_similarity: None,
    })
}
