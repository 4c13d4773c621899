//! Controller error types.

use scout_core::FieldError;
use thiserror::Error;

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Reasons a user intent is refused.
///
/// Failures inside a search cycle are never reported this way; see
/// [`crate::CycleOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    /// Criteria failed validation; nothing was sent.
    #[error("invalid search criteria: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    /// Quota was exhausted earlier in this session.
    #[error("API quota exhausted; searching is halted for this session")]
    QuotaHalted,

    /// No criteria have been submitted yet.
    #[error("no search criteria set; submit a search first")]
    NoCriteria,

    /// Export could not be produced.
    #[error("export failed: {0}")]
    Export(String),
}

/// Result type alias for controller intents.
pub type Result<T> = std::result::Result<T, ControllerError>;
