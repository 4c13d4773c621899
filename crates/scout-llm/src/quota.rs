//! Failure classification.
//!
//! Providers surface failures in many shapes: an HTTP status, an RPC status
//! string, a message, or a JSON error body. Quota exhaustion can show up in
//! any of them, so every field is inspected.

use crate::error::GatewayError;
use std::fmt;

/// Tokens emitted by the provider's quota subsystem.
const QUOTA_SUBSYSTEM_TOKENS: [&str; 2] = [
    "google.rpc.QuotaFailure",
    "generativelanguage.googleapis.com/generate_content",
];

/// Raw failure reported by a provider before classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderFailure {
    /// Error message
    pub message: String,
    /// HTTP status, if one was received
    pub status: Option<u16>,
    /// Provider status or error code (e.g. `RESOURCE_EXHAUSTED`)
    pub code: Option<String>,
    /// Everything else known about the error, e.g. the raw response body
    pub detail: String,
}

impl ProviderFailure {
    /// Failure with only a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Attach an HTTP status.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach a provider error code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach a detail dump.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    /// Returns true if any part of the failure points at quota exhaustion.
    #[must_use]
    pub fn is_quota_exhausted(&self) -> bool {
        if self.status == Some(429) {
            return true;
        }

        let haystacks = [
            self.message.as_str(),
            self.code.as_deref().unwrap_or_default(),
            self.detail.as_str(),
        ];

        haystacks.iter().any(|text| {
            text.contains("RESOURCE_EXHAUSTED")
                || text.contains("429")
                || text.to_lowercase().contains("quota")
                || QUOTA_SUBSYSTEM_TOKENS.iter().any(|token| text.contains(token))
        })
    }
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "status {status}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ProviderFailure {}

impl From<reqwest::Error> for ProviderFailure {
    fn from(err: reqwest::Error) -> Self {
        let failure = Self::new(err.to_string()).with_detail(format!("{err:?}"));
        match err.status() {
            Some(status) => failure.with_status(status.as_u16()),
            None => failure,
        }
    }
}

/// Fold a raw failure into a [`GatewayError`].
///
/// Quota exhaustion becomes [`GatewayError::QuotaExceeded`]; everything else
/// becomes [`GatewayError::Provider`] carrying the original message.
#[must_use]
pub fn classify_failure(provider: &str, failure: &ProviderFailure) -> GatewayError {
    if failure.is_quota_exhausted() {
        GatewayError::QuotaExceeded {
            provider: provider.to_string(),
            message: failure.to_string(),
        }
    } else {
        GatewayError::Provider {
            provider: provider.to_string(),
            message: failure.message.clone(),
        }
    }
}
