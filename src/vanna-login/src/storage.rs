//! Persisting the API key in `config.toml`.

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use vanna_common::{Result, VannaConfig};

/// Store `key` in the config file at `path`, keeping its other settings.
pub fn save_api_key(path: &Path, key: &SecretString) -> Result<()> {
    let mut config = VannaConfig::load_from(path)?;
    config.api_key = Some(key.expose_secret().to_string());
    config.save_to(path)?;
    info!(path = %path.display(), "API key saved");
    Ok(())
}
