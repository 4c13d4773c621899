//! Search provider capability and raw response types.

use crate::quota::ProviderFailure;
use crate::request::LeadRequest;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A generative-search backend that returns lead records.
///
/// Implementations report raw failures; classification happens in
/// [`crate::SearchGateway`]. Implementations should be thread-safe
/// (Send + Sync) for use in async contexts.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run one search and return the provider's records as-is.
    ///
    /// # Errors
    /// Returns the provider's failure, unclassified.
    async fn search(&self, request: &LeadRequest) -> Result<Vec<RawLead>, ProviderFailure>;

    /// Get the unique identifier for this provider.
    fn provider_id(&self) -> &str;

    /// Label stored in each lead's `source` field.
    fn source_label(&self) -> &str;
}

/// A lead record exactly as the provider returned it.
///
/// Every field is optional; numbers are accepted where strings are expected.
/// Field names mirror [`crate::request::LEAD_FIELDS`].
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawLead {
    #[serde(deserialize_with = "lenient_string")]
    pub first_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub last_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub job_title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub company_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub linkedin: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub website: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub email_confidence: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_lead_missing_fields() {
        let raw: RawLead =
            serde_json::from_str(r#"{"firstName":"Ada","jobTitle":"CTO"}"#).expect("parse");
        assert_eq!(raw.first_name.as_deref(), Some("Ada"));
        assert_eq!(raw.job_title.as_deref(), Some("CTO"));
        assert!(raw.email.is_none());
        assert!(raw.email_confidence.is_none());
    }

    #[test]
    fn test_raw_lead_lenient_values() {
        let raw: RawLead = serde_json::from_str(
            r#"{"phone":4915112345678,"email":null,"website":["a","b"],"extra":"ignored"}"#,
        )
        .expect("parse");
        assert_eq!(raw.phone.as_deref(), Some("4915112345678"));
        assert!(raw.email.is_none());
        assert!(raw.website.is_none());
    }

    #[test]
    fn test_raw_lead_array() {
        let raws: Vec<RawLead> = serde_json::from_str(
            r#"[{"firstName":"A","emailConfidence":"High"},{"lastName":"B"}]"#,
        )
        .expect("parse");
        assert_eq!(raws.len(), 2);
        assert_eq!(raws[0].email_confidence.as_deref(), Some("High"));
    }
}
