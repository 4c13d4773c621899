//! Email address validation.
//!
//! The validator is a gate, not a normalizer: it never trims or rewrites its
//! input. Callers decide what to do with a rejected address.

use regex::Regex;
use std::sync::OnceLock;

/// Marker stored in contact fields when no value is known.
pub const ABSENT: &str = "NULL";

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
            .expect("valid regex")
    })
}

/// Returns true if `candidate` is a syntactically valid address.
///
/// The absence marker [`ABSENT`] is never valid.
#[must_use]
pub fn is_valid_email(candidate: &str) -> bool {
    candidate != ABSENT && email_regex().is_match(candidate)
}

/// Returns true if `value` is the absence marker.
#[must_use]
pub fn is_absent(value: &str) -> bool {
    value == ABSENT
}
