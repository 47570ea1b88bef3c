//! Application state container

use std::sync::Arc;

use chatdesk_api::ApiClient;
use chatdesk_session::{ActiveSession, SessionSynchronizer};
use chatdesk_storage::SettingsStore;

use crate::config::Config;
use crate::Result;

/// Everything a front end needs: configuration, the HTTP client and the
/// synchronizer that owns all chat state.
pub struct ChatDesk {
    config: Config,
    api: Arc<ApiClient>,
    synchronizer: SessionSynchronizer,
}

impl ChatDesk {
    pub fn new(config: Config) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = SettingsStore::open(&config.database_path)?;
        Self::with_settings(config, db)
    }

    pub fn with_settings(config: Config, db: SettingsStore) -> Result<Self> {
        let api = Arc::new(ApiClient::new(config.api_base.clone())?);
        let active = ActiveSession::restore(db)?;
        let synchronizer = SessionSynchronizer::new(api.clone(), active);

        Ok(Self {
            config,
            api,
            synchronizer,
        })
    }

    /// Probe the backend and load the restored session
    pub async fn initialize(&self) {
        match self.api.health().await {
            Ok(status) => {
                tracing::info!(api = %self.config.api_base, status = %status, "Backend reachable")
            }
            Err(e) => {
                tracing::warn!(api = %self.config.api_base, error = %e, "Backend health check failed")
            }
        }

        if let Some(ws_url) = self.config.ws_url() {
            tracing::debug!(url = %ws_url, "Streaming endpoint configured but not used");
        }

        self.synchronizer.initialize().await;
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn synchronizer(&self) -> &SessionSynchronizer {
        &self.synchronizer
    }
}
