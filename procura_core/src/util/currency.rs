//! Currency code normalization and static FX conversion.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// USD-conversion multipliers for the currencies providers actually return.
/// Static reference rates; live FX is a non-goal.
pub static DEFAULT_CURRENCY_RATES: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        ("USD", 1.0),
        ("EUR", 1.08),
        ("GBP", 1.27),
        ("CAD", 0.74),
        ("AUD", 0.66),
        ("JPY", 0.0067),
        ("CNY", 0.14),
        ("INR", 0.012),
        ("MXN", 0.058),
    ])
});

/// Normalize a currency code to a known uppercase 3-letter code.
///
/// Returns `None` for anything that is not a known ISO code.
pub fn normalize_currency_code(code: Option<&str>) -> Option<String> {
    let trimmed = code?.trim().to_ascii_uppercase();
    if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    if !DEFAULT_CURRENCY_RATES.contains_key(trimmed.as_str()) {
        return None;
    }
    Some(trimmed)
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Convert an amount between currencies using the static FX table.
///
/// Unknown source or target codes fall back to USD; a same-currency
/// conversion only rounds. Returns `None` when the amount is absent.
pub fn convert_currency(amount: Option<f64>, from: Option<&str>, to: Option<&str>) -> Option<f64> {
    let value = amount?;
    let src = normalize_currency_code(from).unwrap_or_else(|| "USD".to_string());
    let dst = normalize_currency_code(to).unwrap_or_else(|| "USD".to_string());

    if src == dst {
        return Some(round_2dp(value));
    }

    let src_rate = *DEFAULT_CURRENCY_RATES.get(src.as_str())?;
    let dst_rate = *DEFAULT_CURRENCY_RATES.get(dst.as_str())?;
    if src_rate <= 0.0 || dst_rate <= 0.0 {
        return None;
    }
    Some(round_2dp(value * src_rate / dst_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_currency_code() {
        assert_eq!(normalize_currency_code(Some("usd")), Some("USD".to_string()));
        assert_eq!(normalize_currency_code(Some(" eur ")), Some("EUR".to_string()));
        assert_eq!(normalize_currency_code(Some("XYZ")), None);
        assert_eq!(normalize_currency_code(Some("dollars")), None);
        assert_eq!(normalize_currency_code(Some("")), None);
        assert_eq!(normalize_currency_code(None), None);
    }

    #[test]
    fn test_convert_same_currency_rounds() {
        assert_eq!(convert_currency(Some(10.555), Some("USD"), Some("USD")), Some(10.56));
    }

    #[test]
    fn test_convert_eur_to_usd() {
        assert_eq!(convert_currency(Some(100.0), Some("EUR"), Some("USD")), Some(108.0));
    }

    #[test]
    fn test_convert_unknown_code_treated_as_usd() {
        // Unknown source falls back to USD, so a USD target is a no-op.
        assert_eq!(convert_currency(Some(50.0), Some("???"), Some("USD")), Some(50.0));
    }

    #[test]
    fn test_convert_missing_amount() {
        assert_eq!(convert_currency(None, Some("EUR"), Some("USD")), None);
    }
}
