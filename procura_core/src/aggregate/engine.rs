//! Collect-all search execution engine.
//!
//! Coordinates parallel searches across the registered providers and
//! consolidates results into a single ranked response.

use super::{dedupe, score, status, stream, AggregateResponse, OutcomeStatus, ProviderOutcome};
use crate::aggregate::CanonicalResult;
use crate::error::QueryError;
use crate::filters::apply_filters;
use crate::metrics::{log_provider_result, log_search_start, SearchMetrics};
use crate::normalize::normalize;
use crate::query::SearchQuery;
use crate::{ProviderRegistry, RawHit, SourcingProvider};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use url::form_urlencoded;

/// Default per-provider time budget for collect-all searches.
pub const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 5_000;

/// Default per-provider budget for streaming searches; slow providers just
/// arrive later in the stream, so this is generous.
pub const DEFAULT_STREAMING_TIMEOUT_MS: u64 = 30_000;

/// Default base path for the outbound-click convenience URL.
pub const DEFAULT_CLICKOUT_BASE: &str = "/api/out";

/// Engine tunables. The defaults match production; `from_env` lets the
/// deployment override budgets without code changes.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub provider_timeout: Duration,
    pub streaming_timeout: Duration,
    pub clickout_base: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_millis(DEFAULT_PROVIDER_TIMEOUT_MS),
            streaming_timeout: Duration::from_millis(DEFAULT_STREAMING_TIMEOUT_MS),
            clickout_base: DEFAULT_CLICKOUT_BASE.to_string(),
        }
    }
}

impl EngineConfig {
    /// Read timeout overrides from the environment (values in seconds).
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(secs) = env_f64("SOURCING_PROVIDER_TIMEOUT_SECONDS") {
            config.provider_timeout = Duration::from_secs_f64(secs);
        }
        if let Some(secs) = env_f64("SOURCING_STREAMING_TIMEOUT_SECONDS") {
            config.streaming_timeout = Duration::from_secs_f64(secs);
        }
        config
    }
}

fn env_f64(name: &str) -> Option<f64> {
    std::env::var(name).ok()?.trim().parse::<f64>().ok()
}

/// Run one provider against its time budget and finalize its outcome.
///
/// Every failure mode is recovered locally: the returned outcome carries
/// the classification and the hit list is empty.
pub(crate) async fn run_provider(
    provider_id: &str,
    adapter: Arc<dyn SourcingProvider>,
    query: &SearchQuery,
    budget: Duration,
) -> (Vec<RawHit>, ProviderOutcome) {
    let started = Instant::now();
    tracing::debug!(provider_id, query = %query.text, "starting provider search");

    let (hits, outcome) = match timeout(budget, adapter.search(query)).await {
        Ok(Ok(hits)) => {
            let elapsed = started.elapsed().as_millis() as u64;
            let outcome = ProviderOutcome::ok(provider_id, hits.len(), elapsed);
            (hits, outcome)
        }
        Ok(Err(err)) => {
            let elapsed = started.elapsed().as_millis() as u64;
            let classified = err.outcome_status();
            tracing::debug!(
                provider_id,
                status = ?classified,
                error = %err.outcome_message(),
                "provider search failed"
            );
            // Outcome messages are caller-facing; the raw detail stays in
            // the log line above.
            let message = match classified {
                OutcomeStatus::Exhausted => "API quota exhausted",
                OutcomeStatus::RateLimited => "Rate limit exceeded",
                _ => "Search failed",
            };
            (
                Vec::new(),
                ProviderOutcome::failed(provider_id, classified, elapsed, message),
            )
        }
        Err(_) => {
            let elapsed = started.elapsed().as_millis() as u64;
            (Vec::new(), ProviderOutcome::timed_out(provider_id, elapsed))
        }
    };

    log_provider_result(&outcome);
    (hits, outcome)
}

/// Attach the outbound-click convenience URL to each result.
///
/// Built from the result's index in the final list, its source, and its
/// URL. Row-scoped callers override this with their own context.
pub fn attach_click_urls(results: &mut [CanonicalResult], base: &str) {
    for (idx, result) in results.iter_mut().enumerate() {
        if !result.click_url.is_empty() {
            continue;
        }
        let params = form_urlencoded::Serializer::new(String::new())
            .append_pair("url", &result.url)
            .append_pair("idx", &idx.to_string())
            .append_pair("source", &result.source)
            .finish();
        result.click_url = format!("{base}?{params}");
    }
}

/// Engine for executing aggregated searches across registered providers.
pub struct Aggregator<'a> {
    registry: &'a ProviderRegistry,
    config: EngineConfig,
}

impl<'a> Aggregator<'a> {
    /// Create an engine with default configuration.
    pub fn new(registry: &'a ProviderRegistry) -> Self {
        Self {
            registry,
            config: EngineConfig::default(),
        }
    }

    /// Create an engine with explicit configuration.
    pub fn with_config(registry: &'a ProviderRegistry, config: EngineConfig) -> Self {
        Self { registry, config }
    }

    /// Dispatch the query to every active provider, wait for all of them
    /// (bounded by the per-provider timeout), and return the merged,
    /// deduplicated, scored response.
    ///
    /// A single provider's failure or timeout never aborts the call; the
    /// worst case is an empty result list with a non-ok outcome recorded
    /// for every provider.
    pub async fn run(&self, query: &SearchQuery) -> Result<AggregateResponse, QueryError> {
        if query.text.trim().is_empty() {
            return Err(QueryError::Empty);
        }

        let selected = self.registry.select(&query.providers);
        log_search_start(query.text.len(), &query.providers);

        let started = Instant::now();
        let mut metrics = SearchMetrics::new(&query.text, false);

        let budget = self.config.provider_timeout;
        let futures: Vec<_> = selected
            .iter()
            .map(|(provider_id, adapter)| {
                run_provider(provider_id, Arc::clone(adapter), query, budget)
            })
            .collect();

        // join_all preserves input order, so the merge below walks providers
        // in registration order regardless of completion order.
        let completions = futures::future::join_all(futures).await;

        let mut outcomes = Vec::with_capacity(completions.len());
        let mut merged: Vec<CanonicalResult> = Vec::new();
        for ((provider_id, _), (hits, outcome)) in selected.iter().zip(completions) {
            metrics.record_provider(&outcome);
            if outcome.status.is_ok() {
                merged.extend(normalize(provider_id, &hits));
            }
            outcomes.push(outcome);
        }

        let total = merged.len();
        let unique = dedupe::dedupe(merged);
        let unique_count = unique.len();

        let (mut results, price_dropped) = apply_filters(unique, query);
        metrics.record_price_filter(query.has_price_bounds(), price_dropped);

        score::score_and_sort(&mut results, query);
        attach_click_urls(&mut results, &self.config.clickout_base);

        let (all_failed, user_message) = status::summarize(&outcomes, results.len());

        metrics.record_results(total, unique_count, results.len());
        metrics.total_latency_ms = started.elapsed().as_millis() as u64;
        metrics.log_completion();

        Ok(AggregateResponse {
            results,
            provider_outcomes: outcomes,
            all_providers_failed: all_failed,
            user_message,
            generated_at: chrono::Utc::now(),
        })
    }

    /// Streaming variant: yields one [`super::StreamBatch`] per provider in
    /// completion order instead of waiting for the full set.
    pub fn run_streaming(&self, query: SearchQuery) -> Result<stream::SearchStream, QueryError> {
        if query.text.trim().is_empty() {
            return Err(QueryError::Empty);
        }
        let selected = self.registry.select(&query.providers);
        Ok(stream::spawn_streaming(
            selected,
            query,
            self.config.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_urls_encode_index_and_source() {
        let mut results = vec![
            CanonicalResult::new("A", "https://a.example.com/x?b=1", "A", "amazon"),
            CanonicalResult::new("B", "https://b.example.com/y", "B", "ebay_browse"),
        ];
        attach_click_urls(&mut results, "/api/out");
        assert_eq!(
            results[0].click_url,
            "/api/out?url=https%3A%2F%2Fa.example.com%2Fx%3Fb%3D1&idx=0&source=amazon"
        );
        assert!(results[1].click_url.ends_with("idx=1&source=ebay_browse"));
    }

    #[test]
    fn test_click_urls_do_not_overwrite() {
        let mut results = vec![CanonicalResult::new(
            "A",
            "https://a.example.com/x",
            "A",
            "amazon",
        )];
        results[0].click_url = "/api/out?row_id=7".to_string();
        attach_click_urls(&mut results, "/api/out");
        assert_eq!(results[0].click_url, "/api/out?row_id=7");
    }

    #[test]
    fn test_config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.provider_timeout, Duration::from_millis(5_000));
        assert_eq!(config.streaming_timeout, Duration::from_millis(30_000));
        assert_eq!(config.clickout_base, "/api/out");
    }
}
