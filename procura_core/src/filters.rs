//! Unified result filtering — single source of truth for every search path.
//!
//! Both aggregation modes run the same filters so collect-all and streaming
//! callers see identical result sets for identical provider output.

use crate::aggregate::CanonicalResult;
use crate::query::SearchQuery;

/// Price-bound filter.
///
/// Rules:
/// - `price == None` (quote-based vendors) always passes
/// - no bounds set: always passes
/// - otherwise min/max are hard bounds
pub fn should_include_result(
    price: Option<f64>,
    min_price: Option<f64>,
    max_price: Option<f64>,
) -> bool {
    let Some(price) = price else {
        return true;
    };
    if let Some(min) = min_price {
        if price < min {
            return false;
        }
    }
    if let Some(max) = max_price {
        if price > max {
            return false;
        }
    }
    true
}

/// Post-search exclusion filter for negative keywords and merchants.
///
/// Shopping APIs have no negative-keyword support, so "no digital" or
/// "NOT Amazon" constraints are applied here after results come back.
/// Returns true when the result should be excluded.
pub fn should_exclude(
    result: &CanonicalResult,
    exclude_keywords: &[String],
    exclude_merchants: &[String],
) -> bool {
    if exclude_keywords.is_empty() && exclude_merchants.is_empty() {
        return false;
    }

    let title = result.title.to_lowercase();
    let merchant = result.merchant_name.to_lowercase();
    let domain = result.merchant_domain.to_lowercase();

    for excluded in exclude_merchants {
        let ex = excluded.to_lowercase();
        if !ex.is_empty() && (merchant.contains(&ex) || domain.contains(&ex)) {
            tracing::debug!(
                title = %result.title,
                merchant = %result.merchant_name,
                excluded = %excluded,
                "dropping result for excluded merchant"
            );
            return true;
        }
    }

    for excluded in exclude_keywords {
        let ex = excluded.to_lowercase();
        if !ex.is_empty() && title.contains(&ex) {
            tracing::debug!(
                title = %result.title,
                excluded = %excluded,
                "dropping result for excluded keyword"
            );
            return true;
        }
    }

    false
}

/// Apply both filters to a merged result list, returning the survivors and
/// the number dropped by the price filter.
pub fn apply_filters(
    results: Vec<CanonicalResult>,
    query: &SearchQuery,
) -> (Vec<CanonicalResult>, usize) {
    let mut price_dropped = 0;
    let filtered = results
        .into_iter()
        .filter(|r| {
            if !should_include_result(r.price, query.min_price, query.max_price) {
                price_dropped += 1;
                return false;
            }
            !should_exclude(r, &query.exclude_keywords, &query.exclude_merchants)
        })
        .collect();
    (filtered, price_dropped)
}
