//! User-facing errors for refused intents.

use scout_scanner::ControllerError;
use serde::Serialize;
use std::fmt;

/// Serializable refusal shown to the user.
#[derive(Debug, Serialize)]
pub struct CommandError {
    /// Stable code for scripting (e.g. "QUOTA_HALTED")
    pub code: String,
    /// User-friendly error message
    pub message: String,
    /// Optional structured context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl CommandError {
    /// Create a new command error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Create a command error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for CommandError {}

impl From<ControllerError> for CommandError {
    fn from(err: ControllerError) -> Self {
        let message = err.to_string();
        match err {
            ControllerError::Validation(fields) => Self::with_details(
                "VALIDATION_FAILED",
                message,
                serde_json::json!({ "fields": fields }),
            ),
            ControllerError::QuotaHalted => Self::new("QUOTA_HALTED", message),
            ControllerError::NoCriteria => Self::new("NO_CRITERIA", message),
            ControllerError::Export(_) => Self::new("EXPORT_FAILED", message),
        }
    }
}
