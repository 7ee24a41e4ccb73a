//! Mapper for eBay Browse API item summaries.

use super::ExtractedHit;
use crate::util::price::parse_price_value;
use serde_json::Value;

fn shipping_description(item: &Value) -> Option<String> {
    let first = item.get("shippingOptions")?.as_array()?.first()?;
    let cost_type = first
        .get("shippingCostType")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    if cost_type.eq_ignore_ascii_case("free") {
        return Some("Free shipping".to_string());
    }
    let cost = first.get("shippingCost")?;
    let value = cost.get("value").and_then(parse_price_value)?;
    let currency = cost
        .get("currency")
        .and_then(|v| v.as_str())
        .unwrap_or("USD");
    Some(format!("Shipping {currency} {value:.2}"))
}

/// Map one `itemSummaries` entry.
pub(crate) fn extract(item: &Value) -> Option<ExtractedHit> {
    let title = item
        .get("title")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())?
        .to_string();

    let price_obj = item.get("price");
    let price = price_obj
        .and_then(|p| p.get("value"))
        .and_then(parse_price_value);
    let currency = price_obj
        .and_then(|p| p.get("currency"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    Some(ExtractedHit {
        title,
        url: item
            .get("itemWebUrl")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        merchant: item
            .get("seller")
            .and_then(|s| s.get("username"))
            .and_then(|v| v.as_str())
            .unwrap_or("eBay")
            .to_string(),
        price,
        currency,
        image_url: item
            .get("image")
            .and_then(|i| i.get("imageUrl"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
        rating: None,
        reviews_count: None,
        shipping_info: shipping_description(item),
        vector_similarity: None,
    })
}
