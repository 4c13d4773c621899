//! Shared types used across Scout.
//!
//! This module defines the canonical lead record and the small newtypes and
//! enums around it.

use crate::email::{is_absent, ABSENT};
use crate::error::ScoutError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Newtype for lead identifiers.
///
/// Generated as a UUID v4 when a lead is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadId(String);

impl LeadId {
    /// Create a new random `LeadId` using UUID v4.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How much the provider trusts a lead's email address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EmailConfidence {
    /// Address was confirmed by the source
    Verified,
    /// Strong evidence for the address
    High,
    /// Weak evidence, or the address was rejected by validation
    Low,
    /// Guessed from a naming pattern
    #[default]
    Estimated,
}

impl EmailConfidence {
    /// Map a free-text confidence claim onto the fixed scale.
    ///
    /// Matching is case-insensitive by substring, checked in the order
    /// "verif", "high", "low". Anything else is `Estimated`.
    #[must_use]
    pub fn from_claim(claim: &str) -> Self {
        let claim = claim.to_lowercase();
        if claim.contains("verif") {
            Self::Verified
        } else if claim.contains("high") {
            Self::High
        } else if claim.contains("low") {
            Self::Low
        } else {
            Self::Estimated
        }
    }

    /// Display label, also used in CSV export.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Verified => "Verified",
            Self::High => "High",
            Self::Low => "Low",
            Self::Estimated => "Estimated",
        }
    }
}

impl fmt::Display for EmailConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A single discovered lead.
///
/// Leads are immutable once created. `email` and `phone` hold either a real
/// value or [`ABSENT`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    /// Unique record identifier
    pub id: LeadId,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Current role
    pub job_title: String,
    /// Employer
    pub company_name: String,
    /// Free-text location
    pub location: String,
    /// Company website, empty if unknown
    pub website: String,
    /// `LinkedIn` profile URL, empty if unknown
    pub linkedin: String,
    /// Email address or the absence marker
    pub email: String,
    /// Phone number or the absence marker
    pub phone: String,
    /// Trust level of `email`
    pub email_confidence: EmailConfidence,
    /// Where the lead came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Lead {
    /// Returns the email if one is present.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        if is_absent(&self.email) || self.email.is_empty() {
            None
        } else {
            Some(&self.email)
        }
    }

    /// Returns the phone number if one is present.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        if is_absent(&self.phone) || self.phone.is_empty() {
            None
        } else {
            Some(&self.phone)
        }
    }

    /// Identity used for deduplication: the email if present, else the
    /// `LinkedIn` URL. Leads with neither have no identity.
    #[must_use]
    pub fn identity(&self) -> Option<LeadIdentity> {
        if let Some(email) = self.email() {
            return Some(LeadIdentity::from_email(email));
        }
        if self.linkedin.is_empty() {
            None
        } else {
            Some(LeadIdentity::from_linkedin(&self.linkedin))
        }
    }
}

/// Deduplication key for a lead.
///
/// Emails compare case-insensitively, `LinkedIn` URLs exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LeadIdentity(String);

impl LeadIdentity {
    /// Identity derived from an email address.
    #[must_use]
    pub fn from_email(email: &str) -> Self {
        Self(email.to_lowercase())
    }

    /// Identity derived from a `LinkedIn` URL.
    #[must_use]
    pub fn from_linkedin(url: &str) -> Self {
        Self(url.to_string())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LeadIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wrapper around `chrono::DateTime<Utc>` for consistent timestamp handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp representing the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Get the inner `DateTime<Utc>`.
    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Parse a timestamp from an RFC3339 string.
    pub fn from_rfc3339(s: &str) -> Result<Self, ScoutError> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| ScoutError::Internal(format!("invalid timestamp: {e}")))
    }

    /// Format as RFC3339 string.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Wall-clock time of day, used for log lines.
    #[must_use]
    pub fn time_of_day(&self) -> String {
        self.0.format("%H:%M:%S").to_string()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

/// Placeholder for a contact field with no value.
#[must_use]
pub fn absent() -> String {
    ABSENT.to_string()
}
