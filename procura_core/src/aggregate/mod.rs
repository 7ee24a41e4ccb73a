//! Fan-out/fan-in search aggregation.
//!
//! This module provides:
//! - [`Aggregator`]: dispatches one query to every active provider
//!   concurrently and merges the outcome into an [`AggregateResponse`]
//! - [`SearchStream`]: the streaming variant, yielding one batch per
//!   provider in completion order
//! - the deduplication, scoring, and status-reporting passes shared by both
//!
//! # Example
//!
//! ```ignore
//! use procura_core::aggregate::Aggregator;
//! use procura_core::{registry_from_env, SearchQuery};
//!
//! let registry = registry_from_env();
//! let query = SearchQuery::new("espresso machine")?;
//! let response = Aggregator::new(&registry).run(&query).await?;
//! ```

mod dedupe;
mod engine;
mod score;
mod status;
mod stream;
mod types;

pub use dedupe::{dedupe, dedupe_key, DedupeSet};
pub use engine::{
    attach_click_urls, Aggregator, EngineConfig, DEFAULT_CLICKOUT_BASE,
    DEFAULT_PROVIDER_TIMEOUT_MS, DEFAULT_STREAMING_TIMEOUT_MS,
};
pub use score::{
    compute_match_score, score_and_sort, HAS_IMAGE_WEIGHT, HAS_PRICE_WEIGHT, HAS_RATING_WEIGHT,
    HAS_REVIEWS_WEIGHT, STRONG_MATCH_FEATURE, STRONG_MATCH_THRESHOLD, TITLE_OVERLAP_WEIGHT,
};
pub use status::{summarize, MSG_ALL_FAILED, MSG_QUOTA_EXHAUSTED, MSG_RATE_LIMITED};
pub use stream::SearchStream;
pub use types::{
    AggregateResponse, CanonicalResult, OutcomeStatus, ProductInfo, ProviderOutcome, Provenance,
    StreamBatch,
};
