//! Scout LLM - generative-search gateway for lead discovery.
//!
//! This crate turns search criteria into a provider request, calls a
//! search-grounded model for a structured lead array, and classifies provider
//! failures so callers only ever see two kinds: quota exhaustion and
//! everything else.
//!
//! # Features
//!
//! - **Request Builder**: filters, anti-fabrication rules, bounded exclusion
//!   list and a minimum batch size
//! - **Provider Abstraction**: one-method [`SearchProvider`] trait, easy to stub
//! - **Quota Classification**: status, code, message and body are all checked
//! - **Gemini Provider**: `generateContent` with Google Search grounding
//!
//! # Example
//!
//! ```rust,no_run
//! use scout_core::SearchCriteria;
//! use scout_llm::{build_lead_request, GeminiProvider, RequestLimits, SearchGateway};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = SearchGateway::new(Arc::new(GeminiProvider::new("api-key")?));
//!
//! let criteria = SearchCriteria {
//!     target_roles: "CTO".to_string(),
//!     ..SearchCriteria::default()
//! };
//! let request = build_lead_request(&criteria, &[], RequestLimits::default());
//! let raw_leads = gateway.search(&request).await?;
//!
//! println!("Provider returned {} records", raw_leads.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod gateway;
pub mod provider;
pub mod providers;
pub mod quota;
pub mod request;

// Re-export commonly used types
pub use error::{GatewayError, Result};
pub use gateway::SearchGateway;
pub use provider::{RawLead, SearchProvider};
pub use providers::GeminiProvider;
pub use quota::{classify_failure, ProviderFailure};
pub use request::{build_lead_request, lead_response_schema, LeadRequest, RequestLimits};
