//! Model name validation.

use std::fmt;

use serde::Serialize;

use crate::{Result, VannaError};

/// Name used in documentation snippets; never a real model.
pub const PLACEHOLDER_MODEL: &str = "my-model";

/// A validated, non-empty model name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ModelName(String);

impl ModelName {
    /// Validate a model name given as a string.
    pub fn parse(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(VannaError::validation("Please provide a non-empty model name."));
        }
        Ok(Self(name.to_string()))
    }

    /// Validate a model name read from a dynamically typed source such as
    /// `config.toml`, where `model = 1234` parses fine but is not a name.
    pub fn from_toml(value: &toml::Value) -> Result<Self> {
        match value {
            toml::Value::String(name) => Self::parse(name),
            other => Err(VannaError::validation(format!(
                "Please provide model name in string format and not {}.",
                other.type_str()
            ))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_placeholder(&self) -> bool {
        self.0 == PLACEHOLDER_MODEL
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ModelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for ModelName {
    type Error = VannaError;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl TryFrom<String> for ModelName {
    type Error = VannaError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

/// Normalise a display name into the slug the service stores.
///
/// Lowercases, turns every run of non-alphanumeric characters into a single
/// `-`, and strips leading/trailing dashes: `"Test @Org_"` becomes `"test-org"`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}
