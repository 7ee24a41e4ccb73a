//! Secret redaction for error messages and log output.

use once_cell::sync::Lazy;
use regex::Regex;

static REDACTIONS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"(?i)(api_key=)[^&\s]+").expect("valid regex"),
            "${1}[REDACTED]",
        ),
        (
            Regex::new(r"(?i)(key=)[^&\s]+").expect("valid regex"),
            "${1}[REDACTED]",
        ),
        (
            Regex::new(r"(?i)(token=)[^&\s]+").expect("valid regex"),
            "${1}[REDACTED]",
        ),
        (
            Regex::new(r"(?i)(Authorization: Bearer)\s+\S+").expect("valid regex"),
            "${1} [REDACTED]",
        ),
    ]
});

/// Redact credential-bearing query parameters and headers from text.
///
/// Provider error strings can echo full request URLs; every message that
/// ends up in a `ProviderOutcome` or a log line passes through here first.
pub fn redact_secrets(text: &str) -> String {
    let mut out = text.to_string();
    for (pattern, replacement) in REDACTIONS.iter() {
        out = pattern.replace_all(&out, *replacement).into_owned();
    }
    out
}
