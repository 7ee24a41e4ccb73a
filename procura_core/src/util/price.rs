//! Price extraction from heterogeneous provider payloads.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

// First numeric component: handles "$1,299.99", "1,299", "USD 1299",
// "$500 - $800" (takes the low end of a range).
static PRICE_COMPONENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d[\d,]*\.?\d*)").expect("valid regex"));

/// Parse a price out of a free-form string.
///
/// Returns `None` when no numeric component is present; never coerces
/// unparseable input to zero.
pub fn parse_price_str(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let captures = PRICE_COMPONENT.captures(trimmed)?;
    let number = captures.get(1)?.as_str().replace(',', "");
    number.parse::<f64>().ok()
}

/// Parse a price out of a JSON value that may be a number or a string.
pub fn parse_price_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_price_str(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_price_str_formats() {
        assert_eq!(parse_price_str("$1,299.99"), Some(1299.99));
        assert_eq!(parse_price_str("1,299"), Some(1299.0));
        assert_eq!(parse_price_str("USD 1299"), Some(1299.0));
        assert_eq!(parse_price_str("$500 - $800"), Some(500.0));
        assert_eq!(parse_price_str("49.99"), Some(49.99));
        assert_eq!(parse_price_str("€89,99"), Some(8999.0));
    }

    #[test]
    fn test_parse_price_str_unparseable_is_none() {
        assert_eq!(parse_price_str(""), None);
        assert_eq!(parse_price_str("   "), None);
        assert_eq!(parse_price_str("call for quote"), None);
        assert_eq!(parse_price_str("$"), None);
    }

    #[test]
    fn test_parse_price_value() {
        assert_eq!(parse_price_value(&json!(12.5)), Some(12.5));
        assert_eq!(parse_price_value(&json!("$12.50")), Some(12.5));
        assert_eq!(parse_price_value(&json!(null)), None);
        assert_eq!(parse_price_value(&json!({"value": 1})), None);
    }
}
