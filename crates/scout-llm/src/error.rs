//! Error types for the search gateway.

use thiserror::Error;

/// Classified gateway failures.
///
/// Raw provider errors never escape the gateway; they are folded into one of
/// these kinds by [`crate::quota::classify_failure`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The provider's usage quota is exhausted
    #[error("quota exceeded for {provider}: {message}")]
    QuotaExceeded {
        /// Provider name
        provider: String,
        /// Provider message, for developer logs
        message: String,
    },

    /// Any other provider or transport failure
    #[error("provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Original error message
        message: String,
    },

    /// The request could not be built or sent as given
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl GatewayError {
    /// Whether this failure is terminal for the session.
    #[must_use]
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
