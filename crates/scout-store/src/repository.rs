//! Lead collection persistence.

use crate::error::Result;
use crate::kv::{validate_key, KeyValueStore};
use scout_core::Lead;
use std::sync::Arc;

/// Default key the lead collection is stored under.
pub const DEFAULT_LEADS_KEY: &str = "hasan_scout_leads";

/// Loads and saves the whole lead collection as one JSON array.
#[derive(Clone)]
pub struct LeadRepository {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl LeadRepository {
    /// Create a repository over `store` using the given key.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        validate_key(&key)?;
        Ok(Self { store, key })
    }

    /// Create a repository using [`DEFAULT_LEADS_KEY`].
    #[must_use]
    pub fn with_default_key(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key: DEFAULT_LEADS_KEY.to_string(),
        }
    }

    /// Key the collection is stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the persisted collection.
    ///
    /// Missing, unreadable or malformed data yields an empty collection.
    #[must_use]
    pub fn load(&self) -> Vec<Lead> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read stored leads: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Lead>>(&raw) {
            Ok(leads) => {
                tracing::debug!("Loaded {} stored leads", leads.len());
                leads
            }
            Err(e) => {
                tracing::warn!("Discarding malformed stored leads: {}", e);
                Vec::new()
            }
        }
    }

    /// Persist the full collection, replacing what was stored.
    pub fn save(&self, leads: &[Lead]) -> Result<()> {
        let encoded = serde_json::to_string(leads)?;
        self.store.set(&self.key, &encoded)
    }

    /// Remove the persisted collection.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(&self.key)
    }

    /// Stored value exactly as written.
    pub fn raw(&self) -> Result<Option<String>> {
        self.store.get(&self.key)
    }
}
