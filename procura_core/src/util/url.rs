//! URL normalization helpers for the sourcing pipeline.

use once_cell::sync::Lazy;
use regex::Regex;
use url::form_urlencoded;
use url::Url;

/// Query parameters stripped when building a canonical URL.
const TRACKING_KEYS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "gclid",
    "fbclid",
    "msclkid",
    "yclid",
    "mc_eid",
    "mc_cid",
    "igshid",
    "spm",
    "ref",
    "affid",
    "affidname",
];

/// Key prefixes treated as tracking parameters.
const TRACKING_PREFIXES: &[&str] = &["utm", "ga_", "icid", "mkt_"];

static MULTI_SLASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"/{2,}").expect("valid regex"));

/// Promote a possibly scheme-less or relative URL to an absolute one.
///
/// Empty input stays empty. Relative paths are resolved against Google's
/// shopping host since that is where scheme-less provider links point.
pub fn ensure_absolute(raw: &str) -> String {
    let url = raw.trim();
    if url.is_empty() {
        return String::new();
    }
    let lowered = url.to_ascii_lowercase();
    if lowered.starts_with("http://") || lowered.starts_with("https://") {
        return url.to_string();
    }
    if lowered.starts_with("mailto:") {
        return url.to_string();
    }
    if url.starts_with("//") {
        return format!("https:{url}");
    }
    if lowered.starts_with("www.") {
        return format!("https://{url}");
    }
    if url.starts_with('/') {
        return format!("https://www.google.com{url}");
    }
    if !url.contains("://") {
        return format!("https://{url}");
    }
    url.to_string()
}

/// Extract the merchant domain from a listing URL.
///
/// Host is lowercased with any `www.` prefix removed; unparseable input
/// yields `"unknown"`.
pub fn merchant_domain(raw: &str) -> String {
    let absolute = ensure_absolute(raw);
    match Url::parse(&absolute) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => {
                let host = host.to_ascii_lowercase();
                host.strip_prefix("www.").unwrap_or(&host).to_string()
            }
            None => "unknown".to_string(),
        },
        Err(_) => "unknown".to_string(),
    }
}

/// Whether a URL uses a scheme results are allowed to carry.
pub fn is_allowed_scheme(raw: &str) -> bool {
    let lowered = ensure_absolute(raw).to_ascii_lowercase();
    lowered.starts_with("http://")
        || lowered.starts_with("https://")
        || lowered.starts_with("mailto:")
}

fn is_tracking_key(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    TRACKING_KEYS.contains(&lower.as_str())
        || TRACKING_PREFIXES.iter().any(|p| lower.starts_with(p))
}

/// Generate a stable canonical URL for cross-provider deduplication.
///
/// The canonical form enforces https, lowercases and www-strips the host,
/// drops default ports and fragments, collapses repeated slashes, strips
/// the trailing slash, removes tracking parameters, and deduplicates and
/// sorts the remaining query pairs. `mailto:` URLs pass through lowercased.
pub fn canonicalize_url(raw: &str) -> String {
    let absolute = ensure_absolute(raw);
    if absolute.is_empty() {
        return String::new();
    }
    if absolute.to_ascii_lowercase().starts_with("mailto:") {
        return absolute.to_ascii_lowercase();
    }

    let parsed = match Url::parse(&absolute) {
        Ok(parsed) => parsed,
        Err(_) => return absolute,
    };

    let host = match parsed.host_str() {
        Some(host) => {
            let host = host.to_ascii_lowercase();
            host.strip_prefix("www.").unwrap_or(&host).to_string()
        }
        None => return absolute,
    };

    // Url::port() is None when the port is the scheme default.
    let port = match parsed.port() {
        Some(443) | None => String::new(),
        Some(port) => format!(":{port}"),
    };

    let mut path = MULTI_SLASH.replace_all(parsed.path(), "/").into_owned();
    if !path.starts_with('/') {
        path.insert(0, '/');
    }
    if path != "/" {
        while path.len() > 1 && path.ends_with('/') {
            path.pop();
        }
    }

    let mut pairs: Vec<(String, String)> = Vec::new();
    for (key, value) in parsed.query_pairs() {
        if value.is_empty() || is_tracking_key(&key) {
            continue;
        }
        let signature = (key.to_ascii_lowercase(), value.to_string());
        if pairs
            .iter()
            .any(|(k, v)| k.to_ascii_lowercase() == signature.0 && *v == signature.1)
        {
            continue;
        }
        pairs.push((key.into_owned(), value.into_owned()));
    }
    pairs.sort_by(|a, b| a.0.to_ascii_lowercase().cmp(&b.0.to_ascii_lowercase()));

    let query = if pairs.is_empty() {
        String::new()
    } else {
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .finish();
        format!("?{encoded}")
    };

    format!("https://{host}{port}{path}{query}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_absolute() {
        assert_eq!(ensure_absolute(""), "");
        assert_eq!(ensure_absolute("  "), "");
        assert_eq!(
            ensure_absolute("//cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
        assert_eq!(
            ensure_absolute("www.example.com/x"),
            "https://www.example.com/x"
        );
        assert_eq!(
            ensure_absolute("/shopping/product/1"),
            "https://www.google.com/shopping/product/1"
        );
        assert_eq!(ensure_absolute("example.com"), "https://example.com");
        assert_eq!(
            ensure_absolute("https://example.com"),
            "https://example.com"
        );
        assert_eq!(
            ensure_absolute("mailto:sales@acme.io"),
            "mailto:sales@acme.io"
        );
    }

    #[test]
    fn test_merchant_domain() {
        assert_eq!(merchant_domain("https://www.Amazon.com/dp/B0"), "amazon.com");
        assert_eq!(merchant_domain("https://shop.example.co.uk/x"), "shop.example.co.uk");
        assert_eq!(merchant_domain("not a url at all %%%"), "unknown");
    }

    #[test]
    fn test_scheme_filter() {
        assert!(is_allowed_scheme("https://example.com"));
        assert!(is_allowed_scheme("http://example.com"));
        assert!(is_allowed_scheme("mailto:hi@example.com"));
        assert!(!is_allowed_scheme("ftp://example.com/file"));
        assert!(!is_allowed_scheme("javascript:alert(1)"));
        assert!(!is_allowed_scheme(""));
    }

    #[test]
    fn test_canonicalize_strips_tracking_and_sorts() {
        let canonical = canonicalize_url(
            "http://www.Example.com//a//b/?utm_source=x&b=2&a=1&gclid=zzz&ref=home",
        );
        assert_eq!(canonical, "https://example.com/a/b?a=1&b=2");
    }

    #[test]
    fn test_canonicalize_trailing_slash_and_ports() {
        assert_eq!(
            canonicalize_url("https://example.com:443/widgets/"),
            "https://example.com/widgets"
        );
        assert_eq!(
            canonicalize_url("https://example.com:8443/widgets"),
            "https://example.com:8443/widgets"
        );
        assert_eq!(canonicalize_url("https://example.com"), "https://example.com/");
    }

    #[test]
    fn test_canonicalize_deduplicates_params() {
        let canonical = canonicalize_url("https://example.com/p?id=1&id=1&id=2");
        assert_eq!(canonical, "https://example.com/p?id=1&id=2");
    }

    #[test]
    fn test_canonicalize_mailto_passthrough() {
        assert_eq!(
            canonicalize_url("mailto:Sales@Acme.io"),
            "mailto:sales@acme.io"
        );
    }
}
