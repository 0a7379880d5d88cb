//! Client Configuration
//!
//! Loaded from an optional JSON file, then overridden by `TODOS_*`
//! environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend base URL, without the resource path
    pub api_url: String,
    /// Bearer token attached to every request
    pub token: Option<String>,
    pub search_debounce_ms: u64,
    /// Where the rolling logger writes; logging to file is off when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            log_dir: None,
        }
    }
}

impl ClientConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `TODOS_API_URL`, `TODOS_API_TOKEN`, `TODOS_SEARCH_DEBOUNCE_MS`, `TODOS_LOG_DIR`
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("TODOS_API_URL").filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(token) = lookup("TODOS_API_TOKEN") {
            self.token = Some(token).filter(|t| !t.is_empty());
        }
        if let Some(ms) = lookup("TODOS_SEARCH_DEBOUNCE_MS") {
            match ms.trim().parse() {
                Ok(ms) => self.search_debounce_ms = ms,
                Err(_) => log::warn!("ignoring invalid TODOS_SEARCH_DEBOUNCE_MS={:?}", ms),
            }
        }
        if let Some(dir) = lookup("TODOS_LOG_DIR").filter(|v| !v.is_empty()) {
            self.log_dir = Some(PathBuf::from(dir));
        }
        self
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}
