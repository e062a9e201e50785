// src/config.rs
// =============================================================================
// Optional TOML configuration.
//
// Looked up at --config PATH, or else ~/.config/linkpool/config.toml.
// A missing file just means "use the defaults"; we never create one.
// Command-line flags override whatever the file says.
//
// Example:
//   workers = 8
//   timeout_secs = 20
//   accept_invalid_certs = false
// =============================================================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::checker::{ClientSettings, DEFAULT_USER_AGENT};
use crate::pool::DEFAULT_WORKERS;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Number of concurrent workers for both check and fetch
    pub workers: usize,
    /// Print one line per finished task
    pub verbose: bool,
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_redirects: usize,
    pub user_agent: String,
    /// Accept invalid TLS certificates (unverified mode)
    pub accept_invalid_certs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            verbose: true,
            timeout_secs: 10,
            connect_timeout_secs: 10,
            max_redirects: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_invalid_certs: true,
        }
    }
}

impl Config {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            max_redirects: self.max_redirects,
            accept_invalid_certs: self.accept_invalid_certs,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Default config location under the XDG config dir, if it exists
pub fn default_config_path() -> Option<PathBuf> {
    xdg::BaseDirectories::with_prefix("linkpool")
        .ok()?
        .find_config_file("config.toml")
}

// Loads the explicit path if given, else the XDG file, else defaults
pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    match explicit {
        Some(path) => Config::from_file(path),
        None => match default_config_path() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Config::from_file(&path)
            }
            None => Ok(Config::default()),
        },
    }
}
