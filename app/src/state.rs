//! Application state: configuration, storage and controller wiring.

use anyhow::{Context, Result};
use scout_core::{AppConfig, GeminiConfig, Lead, SearchCriteria};
use scout_llm::{GeminiProvider, SearchGateway};
use scout_scanner::ScoutController;
use scout_store::{FileStore, KeyValueStore, LeadRepository};
use std::path::Path;
use std::sync::Arc;

/// Store key holding the most recently submitted criteria.
pub const CRITERIA_KEY: &str = "hasan_scout_criteria";

/// Everything a command needs, built once per invocation.
pub struct AppState {
    pub config: AppConfig,
    store: Arc<dyn KeyValueStore>,
    repository: LeadRepository,
}

impl AppState {
    /// Load configuration and open the store in the data directory.
    pub fn load() -> Result<Self> {
        let config = AppConfig::load_with_env().context("failed to load configuration")?;
        let data_dir = config.data_dir().context("failed to resolve data directory")?;
        Self::with_data_dir(config, &data_dir)
    }

    /// Build state over an explicit data directory.
    pub fn with_data_dir(config: AppConfig, data_dir: &Path) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = Arc::new(
            FileStore::open(data_dir)
                .with_context(|| format!("failed to open store at {}", data_dir.display()))?,
        );
        let repository = LeadRepository::new(store.clone(), config.storage.leads_key.clone())
            .context("invalid storage.leads_key")?;
        tracing::info!("Data directory: {}", data_dir.display());

        Ok(Self {
            config,
            store,
            repository,
        })
    }

    /// Persisted leads, newest first.
    pub fn leads(&self) -> Vec<Lead> {
        self.repository.load()
    }

    /// Remove all persisted leads.
    pub fn clear_leads(&self) -> Result<()> {
        self.repository.clear().context("failed to clear stored leads")
    }

    /// Build a controller backed by the Gemini provider.
    pub fn controller(&self) -> Result<ScoutController> {
        let api_key = GeminiConfig::api_key_from_env().context(
            "no API key found; set SCOUT_GEMINI_API_KEY or GEMINI_API_KEY",
        )?;
        let provider = GeminiProvider::from_config(&self.config.gemini, api_key)
            .context("failed to create Gemini provider")?;
        tracing::debug!("Using model {}", provider.model());

        Ok(ScoutController::new(
            SearchGateway::new(Arc::new(provider)),
            self.repository.clone(),
            &self.config.scout,
        ))
    }

    /// Remember criteria so `scout more` can reuse them.
    pub fn save_criteria(&self, criteria: &SearchCriteria) -> Result<()> {
        let encoded = serde_json::to_string(criteria)?;
        self.store
            .set(CRITERIA_KEY, &encoded)
            .context("failed to save search criteria")
    }

    /// Criteria from the last successful submission, if any.
    pub fn saved_criteria(&self) -> Option<SearchCriteria> {
        let raw = match self.store.get(CRITERIA_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read saved criteria: {}", e);
                return None;
            }
        };
        serde_json::from_str(&raw)
            .map_err(|e| tracing::warn!("Discarding malformed saved criteria: {}", e))
            .ok()
    }
}
