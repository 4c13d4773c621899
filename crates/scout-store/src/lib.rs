//! Scout Store - local persistence for the lead collection.
//!
//! Persistence is a plain key-value contract. The whole collection is
//! rewritten as one JSON array on every change, and anything unreadable on
//! load is treated as an empty collection.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod kv;
pub mod repository;

pub use error::{Result, StoreError};
pub use kv::{validate_key, FileStore, KeyValueStore, MemoryStore};
pub use repository::{LeadRepository, DEFAULT_LEADS_KEY};
