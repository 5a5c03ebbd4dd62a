use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::paths::get_config_dir;
use crate::error::Result;
use crate::streamduck::{ClientConfig, ClientError};

// ── Bridge Config (<config dir>/bridge.toml) ─────────────────────────────────

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Websocket address of the Streamduck daemon.
    #[serde(default = "default_daemon_url")]
    pub daemon_url: String,
    /// Upper bound on a single daemon request.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_daemon_url() -> String {
    "ws://127.0.0.1:42131".to_string()
}

fn default_request_timeout_ms() -> u64 {
    15000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            daemon_url: default_daemon_url(),
            request_timeout_ms: default_request_timeout_ms(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<AppConfig> {
        Self::load_from(&get_config_dir()?.join("bridge.toml"))
    }

    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load_from(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            return Ok(AppConfig::default());
        }
        let raw = fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    pub fn client_config(&self) -> std::result::Result<ClientConfig, ClientError> {
        ClientConfig::new(&self.daemon_url, self.request_timeout_ms)
    }
}
