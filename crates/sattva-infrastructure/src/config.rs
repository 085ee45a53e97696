//! Configuration loading for collaborator services.
//!
//! Settings live in a TOML file under the user config directory and can be
//! overridden per-key through environment variables, which is how CI and
//! container deployments inject secrets.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use sattva_core::error::{Result, SattvaError};

/// Environment override for the search API key.
pub const ENV_SEARCH_API_KEY: &str = "SATTVA_SEARCH_API_KEY";
/// Environment override for the search engine ID.
pub const ENV_SEARCH_ENGINE_ID: &str = "SATTVA_SEARCH_ENGINE_ID";
/// Environment override for the backend base URL.
pub const ENV_BACKEND_URL: &str = "SATTVA_BACKEND_URL";
/// Environment override for the backend API key.
pub const ENV_BACKEND_KEY: &str = "SATTVA_BACKEND_KEY";

/// Credentials for the web search provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    /// API key for the search service.
    #[serde(default)]
    pub api_key: String,
    /// Programmable search engine ID.
    #[serde(default)]
    pub engine_id: String,
}

/// Connection settings for the hosted backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the hosted backend (project URL).
    #[serde(default)]
    pub base_url: String,
    /// Public (anon) API key sent with every request.
    #[serde(default)]
    pub api_key: String,
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SattvaConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub backend: BackendConfig,
}

impl SattvaConfig {
    /// Returns the default config file location
    /// (`<config dir>/sattva/config.toml`).
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the platform config directory cannot be
    /// determined.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SattvaError::config("Failed to determine the user config directory"))?;
        Ok(config_dir.join("sattva").join("config.toml"))
    }

    /// Loads configuration from the default location.
    ///
    /// A missing file is not an error: defaults are used and environment
    /// overrides still apply, so a fully env-configured deployment needs no
    /// file at all.
    pub fn load() -> Result<Self> {
        Self::from_path(&Self::default_path()?)
    }

    /// Loads configuration from an explicit path, then applies environment
    /// overrides.
    pub fn from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|err| {
                SattvaError::config(format!(
                    "Failed to read config file {}: {}",
                    path.display(),
                    err
                ))
            })?;
            toml::from_str::<SattvaConfig>(&content)?
        } else {
            SattvaConfig::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Returns the search configuration, verifying both keys are set.
    pub fn require_search(&self) -> Result<&SearchConfig> {
        if self.search.api_key.is_empty() || self.search.engine_id.is_empty() {
            return Err(SattvaError::config(format!(
                "Search credentials missing: set [search] api_key/engine_id or {ENV_SEARCH_API_KEY}/{ENV_SEARCH_ENGINE_ID}"
            )));
        }
        Ok(&self.search)
    }

    /// Returns the backend configuration, verifying both keys are set.
    pub fn require_backend(&self) -> Result<&BackendConfig> {
        if self.backend.base_url.is_empty() || self.backend.api_key.is_empty() {
            return Err(SattvaError::config(format!(
                "Backend credentials missing: set [backend] base_url/api_key or {ENV_BACKEND_URL}/{ENV_BACKEND_KEY}"
            )));
        }
        Ok(&self.backend)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var(ENV_SEARCH_API_KEY) {
            self.search.api_key = value;
        }
        if let Ok(value) = env::var(ENV_SEARCH_ENGINE_ID) {
            self.search.engine_id = value;
        }
        if let Ok(value) = env::var(ENV_BACKEND_URL) {
            self.backend.base_url = value;
        }
        if let Ok(value) = env::var(ENV_BACKEND_KEY) {
            self.backend.api_key = value;
        }
    }
}
