//! Amazon product search via the Rainforest API.

use crate::error::ProviderError;
use crate::query::SearchQuery;
use crate::{RawHit, SourcingProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

const BASE_URL: &str = "https://api.rainforestapi.com/request";
const AMAZON_DOMAIN: &str = "amazon.com";
const MAX_HITS: usize = 20;

pub struct AmazonCatalogProvider {
    client: Client,
    api_key: String,
}

impl AmazonCatalogProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(super::USER_AGENT)
            .build()
            .map_err(|e| ProviderError::Other(e.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }

    async fn request(&self, query: &SearchQuery, term: &str) -> Result<Value, ProviderError> {
        let mut params: Vec<(&str, String)> = vec![
            ("api_key", self.api_key.clone()),
            ("type", "search".to_string()),
            ("amazon_domain", AMAZON_DOMAIN.to_string()),
            ("search_term", term.to_string()),
        ];
        // Best-effort upstream price constraints; bounds are also enforced
        // locally by the shared result filter.
        if let Some(min) = query.min_price {
            params.push(("min_price", min.to_string()));
        }
        if let Some(max) = query.max_price {
            params.push(("max_price", max.to_string()));
        }

        let response = self
            .client
            .get(BASE_URL)
            .query(&params)
            .send()
            .await
            .map_err(ProviderError::HttpRequest)?;
        let status = response.status();
        let data: Value = response.json().await.map_err(ProviderError::HttpRequest)?;
        if !status.is_success() {
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                message: format!("Rainforest error: {data}"),
            });
        }
        Ok(data)
    }

    fn hits(data: &Value, limit: usize) -> Vec<RawHit> {
        data.get("search_results")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .take(limit)
                    .map(|item| RawHit(item.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    // "wireless noise cancelling headphones for airplane travel" rarely
    // matches; the leading terms usually do.
    fn simplified_term(query: &str) -> Option<String> {
        let simplified = query
            .split_whitespace()
            .take(4)
            .collect::<Vec<_>>()
            .join(" ");
        if simplified.is_empty() || simplified.eq_ignore_ascii_case(query.trim()) {
            return None;
        }
        Some(simplified)
    }
}

#[async_trait]
impl SourcingProvider for AmazonCatalogProvider {
    fn id(&self) -> &'static str {
        "amazon"
    }

    fn description(&self) -> &'static str {
        "Amazon product search via the Rainforest API."
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawHit>, ProviderError> {
        let limit = query.limit.map(|l| l as usize).unwrap_or(MAX_HITS);

        let data = self.request(query, &query.text).await?;
        let mut hits = Self::hits(&data, limit);

        if hits.is_empty() {
            if let Some(simplified) = Self::simplified_term(&query.text) {
                tracing::debug!(
                    provider_id = self.id(),
                    simplified = %simplified,
                    "empty result set, retrying with simplified query"
                );
                let data = self.request(query, &simplified).await?;
                hits = Self::hits(&data, limit);
            }
        }

        Ok(hits)
    }
}
