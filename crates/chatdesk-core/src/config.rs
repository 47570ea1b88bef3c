//! Client configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use crate::error::CoreError;
use crate::Result;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Overrides the backend base URL
pub const API_URL_ENV: &str = "CHATDESK_API_URL";
/// Overrides the directory holding the local settings database
pub const DATA_DIR_ENV: &str = "CHATDESK_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the chat backend
    pub api_base: Url,
    /// Path to the local settings database
    pub database_path: PathBuf,
}

impl Config {
    pub fn new(data_dir: PathBuf, api_base: Url) -> Self {
        Self {
            api_base,
            database_path: data_dir.join("chatdesk.db"),
        }
    }

    /// Defaults, overridden by `CHATDESK_API_URL` and `CHATDESK_DATA_DIR`
    pub fn from_env() -> Result<Self> {
        Self::from_vars(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(DATA_DIR_ENV).ok(),
        )
    }

    fn from_vars(api_url: Option<String>, data_dir: Option<String>) -> Result<Self> {
        let api_base = parse_api_url(api_url.as_deref().unwrap_or(DEFAULT_API_URL))?;
        let data_dir = data_dir
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(Self::data_dir);

        Ok(Self::new(data_dir, api_base))
    }

    pub fn with_api_url(mut self, raw: &str) -> Result<Self> {
        self.api_base = parse_api_url(raw)?;
        Ok(self)
    }

    pub fn with_data_dir(mut self, data_dir: PathBuf) -> Self {
        self.database_path = data_dir.join("chatdesk.db");
        self
    }

    /// Streaming endpoint next to the REST API (`/ws/chat`)
    pub fn ws_url(&self) -> Option<Url> {
        let mut url = self.api_base.clone();
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        url.set_scheme(scheme).ok()?;
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend(["ws", "chat"]);
        Some(url)
    }

    /// Per-user data directory, falling back to `./.chatdesk`
    pub fn data_dir() -> PathBuf {
        platform_data_root()
            .map(|root| root.join("ChatDesk"))
            .unwrap_or_else(|| PathBuf::from(".chatdesk"))
    }
}

/// Accepts either the server root or the full chat endpoint (`.../api/chat`)
fn parse_api_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| CoreError::Config(format!("invalid API URL {raw:?}: {e}")))?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(CoreError::Config(format!(
            "API URL must be http or https: {raw:?}"
        )));
    }

    let path = url.path().trim_end_matches('/');
    if let Some(root) = path.strip_suffix("/api/chat") {
        let root = format!("{root}/");
        url.set_path(&root);
    }

    Ok(url)
}

/// `(variable, suffix)` candidates for the platform's local data root, in order
fn data_root_candidates() -> &'static [(&'static str, &'static str)] {
    if cfg!(target_os = "windows") {
        &[("LOCALAPPDATA", "")]
    } else if cfg!(target_os = "macos") {
        &[("HOME", "Library/Application Support")]
    } else {
        &[("XDG_DATA_HOME", ""), ("HOME", ".local/share")]
    }
}

fn platform_data_root() -> Option<PathBuf> {
    data_root_candidates().iter().find_map(|(var, suffix)| {
        let base = std::env::var_os(var).filter(|v| !v.is_empty())?;
        Some(PathBuf::from(base).join(suffix))
    })
}
