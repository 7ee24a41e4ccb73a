//! eBay Browse API (official).

use crate::error::ProviderError;
use crate::query::SearchQuery;
use crate::{RawHit, SourcingProvider};
use async_trait::async_trait;
use base64::Engine as _;
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const AUTH_URL: &str = "https://api.ebay.com/identity/v1/oauth2/token";
const BASE_URL: &str = "https://api.ebay.com/buy/browse/v1/item_summary/search";
const OAUTH_SCOPE: &str = "https://api.ebay.com/oauth/api_scope";

/// Refresh this long before the token actually expires.
const TOKEN_REFRESH_SKEW: Duration = Duration::from_secs(60);

const DEFAULT_TOKEN_TTL_SECS: f64 = 7200.0;

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_REFRESH_SKEW < self.expires_at
    }
}

/// eBay item-summary search with a cached client-credentials bearer token.
///
/// The token cache lives behind a mutex, so concurrent calls that find an
/// expired token serialize on a single refresh instead of racing the
/// identity endpoint.
pub struct EbayBrowseProvider {
    client: Client,
    client_id: String,
    client_secret: String,
    marketplace_id: String,
    token: Mutex<Option<CachedToken>>,
}

impl EbayBrowseProvider {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        marketplace_id: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(super::USER_AGENT)
            .build()
            .map_err(|e| ProviderError::Other(e.to_string()))?;
        Ok(Self {
            client,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            marketplace_id: marketplace_id.into(),
            token: Mutex::new(None),
        })
    }

    async fn access_token(&self) -> Result<String, ProviderError> {
        let mut guard = self.token.lock().await;
        if let Some(cached) = guard.as_ref() {
            if cached.is_fresh() {
                return Ok(cached.access_token.clone());
            }
        }

        let basic = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", self.client_id, self.client_secret));
        let response = self
            .client
            .post(AUTH_URL)
            .header("Authorization", format!("Basic {basic}"))
            .form(&[
                ("grant_type", "client_credentials"),
                ("scope", OAUTH_SCOPE),
            ])
            .send()
            .await
            .map_err(ProviderError::HttpRequest)?;
        let status = response.status();
        let payload: Value = response.json().await.map_err(ProviderError::HttpRequest)?;
        if !status.is_success() {
            return Err(ProviderError::Authentication(format!(
                "token grant failed with status {status}"
            )));
        }

        let access_token = payload
            .get("access_token")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                ProviderError::Authentication("token grant returned no access_token".into())
            })?
            .to_string();
        let ttl = payload
            .get("expires_in")
            .and_then(|v| v.as_f64())
            .unwrap_or(DEFAULT_TOKEN_TTL_SECS);

        tracing::debug!(ttl_secs = ttl, "refreshed eBay access token");
        *guard = Some(CachedToken {
            access_token: access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs_f64(ttl),
        });
        Ok(access_token)
    }
}

#[async_trait]
impl SourcingProvider for EbayBrowseProvider {
    fn id(&self) -> &'static str {
        "ebay_browse"
    }

    fn description(&self) -> &'static str {
        "eBay Browse API item-summary search."
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawHit>, ProviderError> {
        let token = self.access_token().await?;
        let limit = query.limit.unwrap_or(20);

        let response = self
            .client
            .get(BASE_URL)
            .query(&[("q", query.text.as_str()), ("limit", &limit.to_string())])
            .header("Authorization", format!("Bearer {token}"))
            .header("X-EBAY-C-MARKETPLACE-ID", &self.marketplace_id)
            .send()
            .await
            .map_err(ProviderError::HttpRequest)?;
        let status = response.status();
        let data: Value = response.json().await.map_err(ProviderError::HttpRequest)?;
        if !status.is_success() {
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                message: format!("eBay Browse error: {data}"),
            });
        }

        Ok(data
            .get("itemSummaries")
            .and_then(|v| v.as_array())
            .map(|items| items.iter().map(|item| RawHit(item.clone())).collect())
            .unwrap_or_default())
    }
}
