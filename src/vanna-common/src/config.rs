//! Client configuration: `config.toml` plus environment overrides.
//!
//! Precedence, lowest to highest: built-in defaults, the config file,
//! environment variables, then whatever the caller applies on top (CLI flags).

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ModelName, Result, VannaError};

/// Default service base URL.
pub const DEFAULT_ENDPOINT: &str = "https://ask.vanna.ai";

/// Environment variable overriding the service base URL.
pub const ENDPOINT_ENV_VAR: &str = "VANNA_ENDPOINT";

/// Environment variable holding an API key.
pub const API_KEY_ENV_VAR: &str = "VANNA_API_KEY";

/// Environment variable holding the default model.
pub const MODEL_ENV_VAR: &str = "VANNA_MODEL";

/// Contents of `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VannaConfig {
    /// Service base URL; `/rpc` and `/unauthenticated_rpc` are appended.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API key obtained from a previous login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default model. Kept untyped until [`VannaConfig::model_name`] validates it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<toml::Value>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl Default for VannaConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            model: None,
        }
    }
}

impl VannaConfig {
    /// Load `config.toml` from the Vanna home directory and apply the process
    /// environment on top.
    pub fn load() -> Result<Self> {
        let config = match crate::dirs::config_file() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        Ok(config.with_env(|key| std::env::var(key).ok()))
    }

    /// Parse a config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|e| {
            VannaError::improperly_configured(format!(
                "Cannot read configuration file {}: {e}",
                path.display()
            ))
        })?;
        let config: Self = toml::from_str(&raw)?;
        debug!(path = %path.display(), endpoint = %config.endpoint, "Loaded config file");
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(endpoint) = lookup(ENDPOINT_ENV_VAR).filter(|v| !v.is_empty()) {
            self.endpoint = endpoint;
        }
        if let Some(key) = lookup(API_KEY_ENV_VAR).filter(|v| !v.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(model) = lookup(MODEL_ENV_VAR).filter(|v| !v.is_empty()) {
            self.model = Some(toml::Value::String(model));
        }
        self
    }

    /// Validated default model, if one is configured.
    pub fn model_name(&self) -> Result<Option<ModelName>> {
        self.model.as_ref().map(ModelName::from_toml).transpose()
    }

    /// Write the config file, restricting permissions since it may hold a key.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self).map_err(|e| {
            VannaError::improperly_configured(format!("Cannot serialize configuration: {e}"))
        })?;
        std::fs::write(path, raw)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    pub fn rpc_url(&self) -> String {
        rpc_url(&self.endpoint)
    }

    pub fn unauthenticated_rpc_url(&self) -> String {
        unauthenticated_rpc_url(&self.endpoint)
    }
}

/// Authenticated RPC endpoint for a base URL.
pub fn rpc_url(endpoint: &str) -> String {
    format!("{}/rpc", endpoint.trim_end_matches('/'))
}

/// Unauthenticated RPC endpoint for a base URL.
pub fn unauthenticated_rpc_url(endpoint: &str) -> String {
    format!("{}/unauthenticated_rpc", endpoint.trim_end_matches('/'))
}
