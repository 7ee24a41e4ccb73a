//! Mapper for vendor-directory semantic matches.

use super::ExtractedHit;
use serde_json::Value;

// Platform/aggregator hosts that say nothing about the vendor itself.
const AGGREGATOR_DOMAINS: &[&str] = &[
    "google.com",
    "maps.google.com",
    "yelp.com",
    "facebook.com",
    "linkedin.com",
    "instagram.com",
    "twitter.com",
    "x.com",
    "youtube.com",
];

fn meaningful_domain(website: &str) -> Option<String> {
    let domain = crate::util::url::merchant_domain(website);
    if domain == "unknown" || AGGREGATOR_DOMAINS.contains(&domain.as_str()) {
        return None;
    }
    Some(domain)
}

/// Map one directory vendor record.
///
/// Vendors are quote-based: price stays `None`. A vendor without a website
/// falls back to a `mailto:` contact URL; a vendor with neither is dropped
/// by the shared URL policy downstream.
pub(crate) fn extract(item: &Value) -> Option<ExtractedHit> {
    let name = item
        .get("name")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())?
        .to_string();

    let website = item
        .get("website")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    let email = item.get("email").and_then(|v| v.as_str()).unwrap_or_default();
    let url = if !website.is_empty() {
        website.to_string()
    } else if !email.is_empty() {
        format!("mailto:{email}")
    } else {
        String::new()
    };

    let domain = meaningful_domain(website);

    let image_url = item
        .get("image_url")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .or_else(|| {
            domain.as_ref().map(|d| {
                format!(
                    "https://www.google.com/s2/favicons?domain={}&sz=128",
                    urlencoding::encode(d)
                )
            })
        });

    let shipping_info = item
        .get("category")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|category| format!("Category: {category}"));

    Some(ExtractedHit {
        title: name.clone(),
        url,
        merchant: name,
        price: None,
        currency: None,
        image_url,
        rating: None,
        reviews_count: None,
        shipping_info,
        vector_similarity: item.get("similarity").and_then(|v| v.as_f64()),
    })
}

#[cfg(test)]
mod tests {
    use crate::normalize::normalize;
    use crate::RawHit;
    use serde_json::json;

    #[test]
    fn test_vendor_with_website() {
        let hits = vec![RawHit(json!({
            "name": "Skyline Charters",
            "website": "https://www.skylinecharters.example.com",
            "category": "Private Aviation",
            "similarity": 0.82
        }))];

        let results = normalize("vendor_directory", &hits);
        assert_eq!(results.len(), 1);
        let r = &results[0];
        assert_eq!(r.price, None);
        assert_eq!(r.merchant_name, "Skyline Charters");
        assert_eq!(r.merchant_domain, "skylinecharters.example.com");
        assert_eq!(r.shipping_info.as_deref(), Some("Category: Private Aviation"));
        assert_eq!(r.provenance.vector_similarity, Some(0.82));
        assert!(r
            .image_url
            .as_deref()
            .unwrap()
            .contains("favicons?domain=skylinecharters.example.com"));
    }

    #[test]
    fn test_vendor_without_website_uses_mailto() {
        let hits = vec![RawHit(json!({
            "name": "Local Catering Co",
            "email": "events@localcatering.example.com"
        }))];
        let results = normalize("vendor_directory", &hits);
        assert_eq!(results.len(), 1);
        assert!(results[0].url.starts_with("mailto:"));
    }

    #[test]
    fn test_vendor_with_no_contact_dropped() {
        let hits = vec![RawHit(json!({"name": "Ghost Vendor"}))];
        assert!(normalize("vendor_directory", &hits).is_empty());
    }

    #[test]
    fn test_aggregator_domain_gets_no_favicon() {
        let hits = vec![RawHit(json!({
            "name": "Facebook-Only Vendor",
            "website": "https://www.facebook.com/somevendor"
        }))];
        let results = normalize("vendor_directory", &hits);
        assert_eq!(results[0].image_url, None);
    }
}
