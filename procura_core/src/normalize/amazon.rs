//! Mapper for Rainforest (Amazon) search results.

use super::ExtractedHit;
use crate::util::price::parse_price_value;
use serde_json::Value;

// Fallback keys inside the `prices` object, in preference order.
const PRICE_KEYS: &[&str] = &[
    "current_price",
    "buybox_price",
    "price",
    "current",
    "main_price",
    "list_price",
];

fn extract_price(item: &Value) -> Option<f64> {
    let price_info = item.get("price").or_else(|| {
        item.get("prices")
            .and_then(|prices| PRICE_KEYS.iter().find_map(|key| prices.get(*key)))
    })?;

    if let Some(obj) = price_info.as_object() {
        return obj
            .get("value")
            .and_then(parse_price_value)
            .or_else(|| obj.get("raw").and_then(parse_price_value));
    }
    parse_price_value(price_info)
}

/// Map one Rainforest `search_results` entry.
///
/// Unknown or zero prices drop the hit entirely: $0.00 tiles bypass price
/// bounds and mislead buyers.
pub(crate) fn extract(item: &Value) -> Option<ExtractedHit> {
    let title = item
        .get("title")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())?
        .to_string();

    let price = extract_price(item).filter(|p| *p > 0.0)?;

    Some(ExtractedHit {
        title,
        url: item
            .get("link")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        merchant: "Amazon".to_string(),
        price: Some(price),
        currency: None,
        image_url: item
            .get("image")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
        rating: item.get("rating").and_then(|v| v.as_f64()),
        reviews_count: item.get("ratings_total").and_then(|v| v.as_u64()),
        shipping_info: item
            .get("delivery")
            .and_then(|d| d.get("tagline"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
        vector_similarity: None,
    })
}
