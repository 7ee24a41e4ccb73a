//! Streaming search execution.
//!
//! Same dispatch as the collect-all engine, but each provider's processed
//! batch is yielded as soon as that provider finishes. A running dedup set
//! spans the whole stream, so a later-completing provider's duplicate of an
//! already-emitted result is suppressed; emitted results are never
//! retracted.

use super::engine::{run_provider, EngineConfig};
use super::{dedupe::DedupeSet, score, StreamBatch};
use crate::filters::apply_filters;
use crate::metrics::SearchMetrics;
use crate::normalize::normalize;
use crate::query::SearchQuery;
use crate::SourcingProvider;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;
use tokio::sync::mpsc;

/// Handle to an in-flight streaming search.
///
/// Batches arrive in provider completion order; `providers_remaining`
/// reaches 0 on the last batch. Also implements [`futures::Stream`].
pub struct SearchStream {
    receiver: mpsc::UnboundedReceiver<StreamBatch>,
}

impl SearchStream {
    /// Receive the next batch, or `None` once every provider has reported.
    pub async fn next_batch(&mut self) -> Option<StreamBatch> {
        self.receiver.recv().await
    }
}

impl futures::Stream for SearchStream {
    type Item = StreamBatch;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

/// Spawn the driver task for a streaming search and hand back the stream.
pub(crate) fn spawn_streaming(
    selected: Vec<(String, Arc<dyn SourcingProvider>)>,
    query: SearchQuery,
    config: EngineConfig,
) -> SearchStream {
    let (tx, receiver) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let started = Instant::now();
        let mut metrics = SearchMetrics::new(&query.text, true);
        let total = selected.len();

        let mut tasks = FuturesUnordered::new();
        for (registration_idx, (provider_id, adapter)) in selected.into_iter().enumerate() {
            let query = query.clone();
            let budget = config.streaming_timeout;
            tasks.push(async move {
                let (hits, outcome) =
                    run_provider(&provider_id, adapter, &query, budget).await;
                (registration_idx, provider_id, hits, outcome)
            });
        }

        let mut dedupe_set = DedupeSet::new();
        let mut completed = 0usize;
        let mut total_hits = 0usize;
        let mut unique_hits = 0usize;
        let mut emitted = 0usize;
        let mut price_dropped = 0usize;

        while completed < total {
            let Some(first) = tasks.next().await else {
                break;
            };
            // Drain any tasks that finished at the same instant and emit
            // the group in registration order.
            let mut ready = vec![first];
            while let Some(Some(next)) = tasks.next().now_or_never() {
                ready.push(next);
            }
            ready.sort_by_key(|(registration_idx, ..)| *registration_idx);

            for (_, provider_id, hits, outcome) in ready {
                completed += 1;
                metrics.record_provider(&outcome);

                let normalized = normalize(&provider_id, &hits);
                total_hits += normalized.len();

                let unique = dedupe_set.filter_batch(normalized);
                unique_hits += unique.len();

                let (mut batch_results, dropped) = apply_filters(unique, &query);
                price_dropped += dropped;

                score::score_and_sort(&mut batch_results, &query);
                emitted += batch_results.len();

                let batch = StreamBatch {
                    provider_id,
                    results: batch_results,
                    outcome,
                    providers_remaining: total - completed,
                };
                if tx.send(batch).is_err() {
                    // Receiver dropped; remaining providers are abandoned.
                    return;
                }
            }
        }

        metrics.record_results(total_hits, unique_hits, emitted);
        metrics.record_price_filter(query.has_price_bounds(), price_dropped);
        metrics.total_latency_ms = started.elapsed().as_millis() as u64;
        metrics.log_completion();
    });

    SearchStream { receiver }
}
