//! Scout Scanner - search cycles, lead post-processing and the auto-loop.
//!
//! This crate ties the gateway and the store together. The
//! [`ScoutController`] accepts user intents and timer ticks, runs one search
//! cycle at a time, and keeps the lead collection, status log and quota flag
//! in a session it owns.
//!
//! # Features
//!
//! - Normalization, local email re-validation and deduplication of provider
//!   output
//! - Auto-loop with a goal check and a restartable timer
//! - Quota exhaustion halts the session and is surfaced exactly once
//! - Every collection change is persisted immediately
//!
//! # Example
//!
//! ```rust,no_run
//! use scout_core::{ScoutConfig, SearchCriteria};
//! use scout_llm::{GeminiProvider, SearchGateway};
//! use scout_scanner::ScoutController;
//! use scout_store::{LeadRepository, MemoryStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = SearchGateway::new(Arc::new(GeminiProvider::new("api-key")?));
//! let repository = LeadRepository::with_default_key(Arc::new(MemoryStore::new()));
//! let mut controller = ScoutController::new(gateway, repository, &ScoutConfig::default());
//!
//! let criteria = SearchCriteria {
//!     target_roles: "CTO".to_string(),
//!     location: "Austin".to_string(),
//!     ..SearchCriteria::default()
//! };
//! let outcome = controller.submit(criteria).await?;
//! println!("{outcome:?}, {} leads total", controller.status().total_found);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod controller;
pub mod error;
pub mod postprocess;
pub mod schedule;
pub mod status;

// Re-export commonly used types
pub use controller::{
    CycleOutcome, Notification, ScoutController, ScoutSession, SearchActivity, QUOTA_HALT_MESSAGE,
};
pub use error::{ControllerError, Result};
pub use postprocess::{normalize, process_batch, revalidate};
pub use schedule::LoopTimer;
pub use status::{LogEntry, LogRing, ScoutStatus};
