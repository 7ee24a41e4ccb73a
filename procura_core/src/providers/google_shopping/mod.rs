//! Google Shopping search via SerpAPI.

use crate::error::ProviderError;
use crate::query::SearchQuery;
use crate::{RawHit, SourcingProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

const BASE_URL: &str = "https://serpapi.com/search";

pub struct GoogleShoppingProvider {
    client: Client,
    api_key: String,
}

impl GoogleShoppingProvider {
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

    // Google Shopping encodes price bounds in the tbs param, in cents.
    fn price_tbs(query: &SearchQuery) -> Option<String> {
        if !query.has_price_bounds() {
            return None;
        }
        let mut parts = vec!["mr:1".to_string(), "price:1".to_string()];
        if let Some(min) = query.min_price {
            parts.push(format!("ppr_min:{}", (min * 100.0) as i64));
        }
        if let Some(max) = query.max_price {
            parts.push(format!("ppr_max:{}", (max * 100.0) as i64));
        }
        Some(parts.join(","))
    }
}

#[async_trait]
impl SourcingProvider for GoogleShoppingProvider {
    fn id(&self) -> &'static str {
        "google_shopping"
    }

    fn description(&self) -> &'static str {
        "Google Shopping results via SerpAPI."
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawHit>, ProviderError> {
        let gl = query.country.as_deref().unwrap_or("us");
        let hl = query.language.as_deref().unwrap_or("en");

        let mut params: Vec<(&str, String)> = vec![
            ("engine", "google_shopping".to_string()),
            ("q", query.text.clone()),
            ("api_key", self.api_key.clone()),
            ("gl", gl.to_string()),
            ("hl", hl.to_string()),
        ];
        if let Some(tbs) = Self::price_tbs(query) {
            params.push(("tbs", tbs));
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
                message: format!("SerpAPI error: {data}"),
            });
        }

        let limit = query.limit.unwrap_or(20) as usize;
        let hits: Vec<RawHit> = data
            .get("shopping_results")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .take(limit)
                    .map(|item| RawHit(item.clone()))
                    .collect()
            })
            .unwrap_or_default();

        tracing::debug!(provider_id = self.id(), count = hits.len(), "shopping search done");
        Ok(hits)
    }
}
