//! Search pipeline observability.
//!
//! One [`SearchMetrics`] is collected per aggregation call and emitted as a
//! single structured completion event; individual provider completions are
//! logged as they happen.

use crate::aggregate::{OutcomeStatus, ProviderOutcome};

/// Aggregated metrics for a single search operation.
#[derive(Debug, Default, Clone)]
pub struct SearchMetrics {
    pub query_length: usize,
    pub total_results: usize,
    pub unique_results: usize,
    pub filtered_results: usize,
    pub providers_called: usize,
    pub providers_succeeded: usize,
    pub providers_failed: usize,
    pub price_filter_applied: bool,
    pub price_filter_dropped: usize,
    pub total_latency_ms: u64,
    pub is_streaming: bool,
}

impl SearchMetrics {
    pub fn new(query: &str, is_streaming: bool) -> Self {
        Self {
            query_length: query.len(),
            is_streaming,
            ..Self::default()
        }
    }

    /// Record one provider outcome.
    pub fn record_provider(&mut self, outcome: &ProviderOutcome) {
        self.providers_called += 1;
        if outcome.status.is_ok() {
            self.providers_succeeded += 1;
        } else {
            self.providers_failed += 1;
        }
    }

    /// Record result counts at each pipeline stage.
    pub fn record_results(&mut self, total: usize, unique: usize, filtered: usize) {
        self.total_results = total;
        self.unique_results = unique;
        self.filtered_results = filtered;
    }

    /// Record price filter application.
    pub fn record_price_filter(&mut self, applied: bool, dropped: usize) {
        self.price_filter_applied = applied;
        self.price_filter_dropped = dropped;
    }

    /// Provider success rate in [0, 1]; 0 when nothing was called.
    pub fn success_rate(&self) -> f64 {
        if self.providers_called == 0 {
            return 0.0;
        }
        self.providers_succeeded as f64 / self.providers_called as f64
    }

    pub fn has_results(&self) -> bool {
        self.filtered_results > 0
    }

    /// Emit the completion event at a level matching the outcome.
    pub fn log_completion(&self) {
        if self.providers_failed == self.providers_called && self.providers_called > 0 {
            tracing::error!(
                query_length = self.query_length,
                is_streaming = self.is_streaming,
                providers_called = self.providers_called,
                providers_failed = self.providers_failed,
                latency_ms = self.total_latency_ms,
                "search failed - all providers failed"
            );
        } else if self.providers_failed > 0 {
            tracing::warn!(
                query_length = self.query_length,
                is_streaming = self.is_streaming,
                providers_called = self.providers_called,
                providers_succeeded = self.providers_succeeded,
                providers_failed = self.providers_failed,
                results_total = self.total_results,
                results_unique = self.unique_results,
                results_after_filter = self.filtered_results,
                latency_ms = self.total_latency_ms,
                "search completed with provider failures"
            );
        } else if !self.has_results() {
            tracing::warn!(
                query_length = self.query_length,
                is_streaming = self.is_streaming,
                providers_called = self.providers_called,
                latency_ms = self.total_latency_ms,
                "search completed but no results"
            );
        } else {
            tracing::info!(
                query_length = self.query_length,
                is_streaming = self.is_streaming,
                providers_called = self.providers_called,
                results_total = self.total_results,
                results_unique = self.unique_results,
                results_after_filter = self.filtered_results,
                success_rate = self.success_rate(),
                price_filter_applied = self.price_filter_applied,
                price_filter_dropped = self.price_filter_dropped,
                latency_ms = self.total_latency_ms,
                "search completed successfully"
            );
        }
    }
}

/// Log one provider completion.
pub fn log_provider_result(outcome: &ProviderOutcome) {
    tracing::info!(
        provider_id = %outcome.provider_id,
        status = ?outcome.status,
        result_count = outcome.result_count,
        latency_ms = outcome.latency_ms.unwrap_or(0),
        "provider completed"
    );
}

/// Log a search start.
pub fn log_search_start(query_length: usize, providers: &[String]) {
    tracing::info!(
        query_length,
        providers = ?providers,
        "search started"
    );
}
