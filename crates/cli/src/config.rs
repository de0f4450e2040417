//! Client configuration for talking to a certdesk API.
//!
//! Settings come from, in order of precedence: command-line flags, the
//! matching environment variables (both handled by clap), a TOML file,
//! and built-in defaults.
//!
//! # Example
//!
//! ```toml
//! [api]
//! base_url = "https://certs.example.org"
//! timeout_secs = 15
//! ```
//!
//! The admin password is never read from this file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Used when no base URL is configured anywhere.
pub(crate) const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Picked up from the working directory when `--config` is not given.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "certdesk.toml";

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("could not read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("timeout must be at least one second")]
    ZeroTimeout,
}

// ── File format ───────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigFile {
    #[serde(default)]
    pub api: ApiSection,
}

/// `[api]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ApiSection {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ConfigFile {
    pub(crate) fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read the explicit file if one was named, otherwise `certdesk.toml`
    /// in the working directory when it exists.
    pub(crate) fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => ConfigFile::read(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    ConfigFile::read(fallback)
                } else {
                    Ok(ConfigFile::default())
                }
            }
        }
    }
}

// ── Resolved settings ─────────────────────────────────────────────────────────

/// Values given on the command line or through the environment.
#[derive(Debug, Default, Clone)]
pub(crate) struct Overrides {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ClientConfig {
    pub api_url: String,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub(crate) fn resolve(overrides: &Overrides) -> Result<Self, ConfigError> {
        let file = ConfigFile::discover(overrides.config.as_deref())?;
        ClientConfig::merge(overrides, file)
    }

    fn merge(overrides: &Overrides, file: ConfigFile) -> Result<Self, ConfigError> {
        let api_url = overrides
            .api_url
            .clone()
            .or(file.api.base_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout = match overrides.timeout_secs.or(file.api.timeout_secs) {
            Some(0) => return Err(ConfigError::ZeroTimeout),
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        Ok(ClientConfig { api_url, timeout })
    }
}
