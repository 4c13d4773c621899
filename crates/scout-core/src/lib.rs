//! Scout Core - Foundation crate for the Scout lead engine.
//!
//! This crate provides shared types, error handling, configuration management,
//! email validation and export renderers that all other Scout crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - The canonical [`Lead`] record and its newtypes
//! - [`criteria`] - User search criteria and their validation
//! - [`email`] - Email address validation
//! - [`export`] - CSV and clipboard renderers
//!
//! # Example
//!
//! ```rust
//! use scout_core::{is_valid_email, AppConfig};
//!
//! let config = AppConfig::default();
//! assert_eq!(config.scout.loop_interval_secs, 60);
//! assert!(is_valid_email("jane@example.com"));
//! assert!(!is_valid_email("NULL"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod criteria;
pub mod email;
pub mod error;
pub mod export;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, GeminiConfig, ScoutConfig, StorageConfig};
pub use criteria::{ResultsAmount, SearchCriteria};
pub use email::{is_absent, is_valid_email, ABSENT};
pub use error::{ConfigError, ConfigResult, FieldError, Result, ScoutError};
pub use export::{emails_for_clipboard, leads_to_csv};
pub use types::{absent, EmailConfidence, Lead, LeadId, LeadIdentity, Timestamp};
