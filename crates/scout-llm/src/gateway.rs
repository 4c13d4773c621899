//! Search gateway: the single entry point the controller calls.

use crate::error::Result;
use crate::provider::{RawLead, SearchProvider};
use crate::quota::classify_failure;
use crate::request::LeadRequest;
use std::sync::Arc;
use tracing::{debug, warn};

/// Wraps a provider and classifies its failures.
///
/// No retries happen here; a failed call is reported once.
#[derive(Clone)]
pub struct SearchGateway {
    provider: Arc<dyn SearchProvider>,
}

impl SearchGateway {
    /// Create a gateway over the given provider.
    #[must_use]
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self { provider }
    }

    /// Run one search.
    ///
    /// # Errors
    /// Returns [`crate::GatewayError::QuotaExceeded`] when the provider's quota
    /// is exhausted, [`crate::GatewayError::Provider`] for anything else.
    pub async fn search(&self, request: &LeadRequest) -> Result<Vec<RawLead>> {
        let provider_id = self.provider.provider_id();
        debug!(
            provider = provider_id,
            exclusions = request.exclusions.len(),
            batch_size = request.batch_size,
            "Sending lead search"
        );

        match self.provider.search(request).await {
            Ok(leads) => {
                debug!(provider = provider_id, count = leads.len(), "Lead search returned");
                Ok(leads)
            }
            Err(failure) => {
                let err = classify_failure(provider_id, &failure);
                warn!(
                    provider = provider_id,
                    quota = err.is_quota_exceeded(),
                    "Lead search failed: {}",
                    failure
                );
                Err(err)
            }
        }
    }

    /// Label stored in each lead's `source` field.
    #[must_use]
    pub fn source_label(&self) -> &str {
        self.provider.source_label()
    }

    /// Identifier of the wrapped provider.
    #[must_use]
    pub fn provider_id(&self) -> &str {
        self.provider.provider_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;
    use crate::quota::ProviderFailure;
    use crate::request::{build_lead_request, RequestLimits};
    use async_trait::async_trait;
    use scout_core::SearchCriteria;

    struct FixedProvider {
        outcome: std::result::Result<Vec<RawLead>, ProviderFailure>,
    }

    #[async_trait]
    impl SearchProvider for FixedProvider {
        async fn search(
            &self,
            _request: &LeadRequest,
        ) -> std::result::Result<Vec<RawLead>, ProviderFailure> {
            self.outcome.clone()
        }

        fn provider_id(&self) -> &str {
            "fixed"
        }

        fn source_label(&self) -> &str {
            "Fixed Search"
        }
    }

    fn request() -> LeadRequest {
        build_lead_request(&SearchCriteria::default(), &[], RequestLimits::default())
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let raw = RawLead {
            first_name: Some("Ada".to_string()),
            ..RawLead::default()
        };
        let gateway = SearchGateway::new(Arc::new(FixedProvider {
            outcome: Ok(vec![raw.clone()]),
        }));

        let leads = gateway.search(&request()).await.expect("search");
        assert_eq!(leads, vec![raw]);
        assert_eq!(gateway.source_label(), "Fixed Search");
    }

    #[tokio::test]
    async fn test_quota_failure_classified() {
        let gateway = SearchGateway::new(Arc::new(FixedProvider {
            outcome: Err(ProviderFailure::new("429 RESOURCE_EXHAUSTED")),
        }));

        let err = gateway.search(&request()).await.expect_err("should fail");
        assert!(matches!(err, GatewayError::QuotaExceeded { .. }));
    }

    #[tokio::test]
    async fn test_other_failure_keeps_message() {
        let gateway = SearchGateway::new(Arc::new(FixedProvider {
            outcome: Err(ProviderFailure::new("socket hang up").with_status(502)),
        }));

        let err = gateway.search(&request()).await.expect_err("should fail");
        assert_eq!(
            err,
            GatewayError::Provider {
                provider: "fixed".to_string(),
                message: "socket hang up".to_string(),
            }
        );
    }
}
