// src/error.rs
use crate::aggregate::OutcomeStatus;
use crate::util::redact::redact_secrets;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Other error: {0}")]
    Other(String),
}

impl ProviderError {
    /// HTTP status carried by this error, when one is known.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ProviderError::Upstream { status, .. } => Some(*status),
            ProviderError::HttpRequest(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Classify this failure into a provider outcome status.
    ///
    /// Quota/payment signals (402) map to `Exhausted`, throttling signals
    /// (429) to `RateLimited`, everything else to the generic `Error`.
    /// Classification falls back to scanning the error text because several
    /// upstreams wrap the status code inside an error body.
    pub fn outcome_status(&self) -> OutcomeStatus {
        match self.http_status() {
            Some(402) => return OutcomeStatus::Exhausted,
            Some(429) => return OutcomeStatus::RateLimited,
            _ => {}
        }
        let text = self.to_string();
        if text.contains("402") || text.contains("Payment Required") {
            OutcomeStatus::Exhausted
        } else if text.contains("429") || text.contains("Too Many Requests") {
            OutcomeStatus::RateLimited
        } else {
            OutcomeStatus::Error
        }
    }

    /// Redacted, truncated message suitable for outcomes and logs.
    pub fn outcome_message(&self) -> String {
        let mut message = redact_secrets(&self.to_string());
        if message.len() > 200 {
            let mut end = 200;
            while !message.is_char_boundary(end) {
                end -= 1;
            }
            message.truncate(end);
        }
        message
    }
}

/// Call-level failure raised before any provider dispatch.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Search query is empty")]
    Empty,
}
