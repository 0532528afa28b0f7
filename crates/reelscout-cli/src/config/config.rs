//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reelscout_api::omdb::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use url::Url;

/// Environment variable that overrides `omdb.api_key`.
pub const API_KEY_ENV: &str = "OMDB_API_KEY";

/// Request timeout used when `omdb.timeout_secs` is unset.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// OMDB connection settings.
    #[serde(default)]
    pub omdb: OmdbConfig,
}

/// OMDB connection configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct OmdbConfig {
    /// API key issued by omdbapi.com.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Endpoint override, mainly for testing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Resolves the API key. A non-blank `env_value` wins over the file.
    ///
    /// # Errors
    ///
    /// Returns an error if neither source holds a non-blank key.
    pub fn api_key(&self, env_value: Option<String>) -> Result<String> {
        let key = env_value
            .filter(|v| !v.trim().is_empty())
            .or_else(|| {
                self.omdb
                    .api_key
                    .clone()
                    .filter(|v| !v.trim().is_empty())
            });
        match key {
            Some(key) => Ok(String::from(key.trim())),
            None => bail!(
                "OMDB API key is not configured: set {API_KEY_ENV} or run `reelscout config set-key <KEY>`"
            ),
        }
    }

    /// Returns the OMDB endpoint, falling back to the public one.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured URL cannot be parsed.
    pub fn base_url(&self) -> Result<Url> {
        let raw = self.omdb.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        Url::parse(raw).with_context(|| format!("invalid omdb.base_url: {raw}"))
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.omdb.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}
