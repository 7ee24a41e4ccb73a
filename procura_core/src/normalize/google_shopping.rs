//! Mapper for Google Shopping SERP payloads.

use super::ExtractedHit;
use crate::util::price::parse_price_value;
use serde_json::Value;

/// Map one `shopping_results` item.
///
/// Prices arrive as display strings ("$1,299.99"); the listing link lives
/// in `product_link`, `offers_link`, or `link` depending on result type.
pub(crate) fn extract(item: &Value) -> Option<ExtractedHit> {
    let title = item
        .get("title")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())?
        .to_string();

    let url = ["product_link", "offers_link", "link"]
        .iter()
        .filter_map(|key| item.get(*key))
        .filter_map(|v| v.as_str())
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string();

    let merchant = item
        .get("seller")
        .or_else(|| item.get("source"))
        .and_then(|v| v.as_str())
        .unwrap_or("Google Shopping")
        .to_string();

    Some(ExtractedHit {
        title,
        url,
        merchant,
        price: item.get("price").and_then(parse_price_value),
        currency: None,
        image_url: item
            .get("thumbnail")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
        rating: item.get("rating").and_then(|v| v.as_f64()),
        reviews_count: item.get("reviews").and_then(|v| v.as_u64()),
        shipping_info: item
            .get("delivery")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
        vector_similarity: None,
    })
}
