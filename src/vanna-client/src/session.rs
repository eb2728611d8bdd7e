//! Per-client credentials and model selection.

use secrecy::{ExposeSecret, SecretString};

use vanna_common::{ModelName, Result, VannaError};

/// The API key and selected model used for every authenticated call.
#[derive(Default)]
pub struct Session {
    api_key: Option<SecretString>,
    model: Option<ModelName>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .finish()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::from(key.into())),
            model: None,
        }
    }

    pub fn api_key(&self) -> Option<&SecretString> {
        self.api_key.as_ref()
    }

    /// Replace the key. Returns whether it differs from the previous one.
    pub fn set_api_key(&mut self, key: impl Into<String>) -> bool {
        let key = key.into();
        let changed = self
            .api_key
            .as_ref()
            .is_none_or(|old| old.expose_secret() != key);
        self.api_key = Some(SecretString::from(key));
        changed
    }

    pub fn require_api_key(&self) -> Result<&SecretString> {
        self.api_key.as_ref().ok_or_else(|| {
            VannaError::improperly_configured(
                "Please set your API key with set_api_key() or the VANNA_API_KEY environment variable.",
            )
        })
    }

    pub fn model(&self) -> Option<&ModelName> {
        self.model.as_ref()
    }

    pub fn set_model(&mut self, model: ModelName) {
        self.model = Some(model);
    }

    pub fn require_model(&self) -> Result<&ModelName> {
        self.model
            .as_ref()
            .ok_or_else(|| VannaError::validation("Please set your model with set_model()."))
    }
}
