//! Aggregate health verdict across provider outcomes.

use super::{OutcomeStatus, ProviderOutcome};

pub const MSG_QUOTA_EXHAUSTED: &str =
    "Search providers have exhausted their quota. Please try again later or contact support.";
pub const MSG_RATE_LIMITED: &str =
    "Search is temporarily rate-limited. Please wait a moment and try again.";
pub const MSG_ALL_FAILED: &str = "Unable to search at this time. Please try again later.";

/// Inspect the outcomes and produce the aggregate failure flag plus an
/// optional caller-facing message.
///
/// `all_failed` is true iff every outcome is non-ok (an empty outcome list
/// counts as failed). A message is produced only for an empty final result
/// set; partial failure with results stays silent.
pub fn summarize(
    outcomes: &[ProviderOutcome],
    final_result_count: usize,
) -> (bool, Option<String>) {
    let all_failed = if outcomes.is_empty() {
        true
    } else {
        outcomes.iter().all(|o| !o.status.is_ok())
    };

    if final_result_count > 0 {
        return (all_failed, None);
    }

    let exhausted = outcomes
        .iter()
        .filter(|o| o.status == OutcomeStatus::Exhausted)
        .count();
    let rate_limited = outcomes
        .iter()
        .filter(|o| o.status == OutcomeStatus::RateLimited)
        .count();

    let message = if !outcomes.is_empty() && exhausted == outcomes.len() {
        Some(MSG_QUOTA_EXHAUSTED.to_string())
    } else if rate_limited > 0 {
        Some(MSG_RATE_LIMITED.to_string())
    } else if all_failed {
        Some(MSG_ALL_FAILED.to_string())
    } else {
        // Some providers succeeded with zero hits: a legitimate empty result.
        None
    };

    (all_failed, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(id: &str, status: OutcomeStatus) -> ProviderOutcome {
        match status {
            OutcomeStatus::Ok => ProviderOutcome::ok(id, 0, 10),
            other => ProviderOutcome::failed(id, other, 10, "boom"),
        }
    }

    #[test]
    fn test_all_exhausted_message() {
        let outcomes = vec![
            outcome("a", OutcomeStatus::Exhausted),
            outcome("b", OutcomeStatus::Exhausted),
        ];
        let (all_failed, message) = summarize(&outcomes, 0);
        assert!(all_failed);
        assert_eq!(message.as_deref(), Some(MSG_QUOTA_EXHAUSTED));
    }

    #[test]
    fn test_any_rate_limited_message() {
        let outcomes = vec![
            outcome("a", OutcomeStatus::RateLimited),
            outcome("b", OutcomeStatus::Error),
        ];
        let (all_failed, message) = summarize(&outcomes, 0);
        assert!(all_failed);
        assert_eq!(message.as_deref(), Some(MSG_RATE_LIMITED));
    }

    #[test]
    fn test_generic_all_failed_message() {
        let outcomes = vec![
            outcome("a", OutcomeStatus::Error),
            outcome("b", OutcomeStatus::Timeout),
        ];
        let (all_failed, message) = summarize(&outcomes, 0);
        assert!(all_failed);
        assert_eq!(message.as_deref(), Some(MSG_ALL_FAILED));
    }

    #[test]
    fn test_legitimate_empty_result_is_silent() {
        let outcomes = vec![
            outcome("a", OutcomeStatus::Ok),
            outcome("b", OutcomeStatus::Error),
        ];
        let (all_failed, message) = summarize(&outcomes, 0);
        assert!(!all_failed);
        assert_eq!(message, None);
    }

    #[test]
    fn test_results_present_never_produces_message() {
        let outcomes = vec![
            outcome("a", OutcomeStatus::RateLimited),
            outcome("b", OutcomeStatus::Ok),
        ];
        let (all_failed, message) = summarize(&outcomes, 5);
        assert!(!all_failed);
        assert_eq!(message, None);
    }

    #[test]
    fn test_all_failed_independent_of_result_count() {
        // all_failed reflects outcomes even when results exist upstream of a
        // filter; the non-empty-implies-not-all-failed invariant is enforced
        // by construction in the engine, where results come from ok outcomes.
        let outcomes = vec![outcome("a", OutcomeStatus::Ok)];
        let (all_failed, _) = summarize(&outcomes, 0);
        assert!(!all_failed);
    }

    #[test]
    fn test_empty_outcome_list_counts_as_failed() {
        let (all_failed, message) = summarize(&[], 0);
        assert!(all_failed);
        assert_eq!(message.as_deref(), Some(MSG_ALL_FAILED));
    }
}
