//! Error types shared by every Vanna crate.

use thiserror::Error;

/// Errors returned by the Vanna SDK.
///
/// `Validation` and `ImproperlyConfigured` are the two domain kinds: the first
/// means the caller passed semantically wrong arguments and is always raised
/// before any network call, the second means something in the environment
/// (a file, a setting, a connector option) is missing or unusable.
#[derive(Debug, Error)]
pub enum VannaError {
    /// Caller-supplied arguments are semantically wrong.
    #[error("{0}")]
    Validation(String),

    /// Environment or resource problem.
    #[error("{0}")]
    ImproperlyConfigured(String),

    /// The one-time-code login flow failed.
    #[error("OTP error: {0}")]
    Otp(String),

    /// The remote service answered with an error or without a result.
    #[error("Server returned error: {0}")]
    Server(String),

    /// Executing SQL against the connected warehouse failed.
    #[error("Couldn't run sql: {0}")]
    Execution(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VannaError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn improperly_configured(message: impl Into<String>) -> Self {
        Self::ImproperlyConfigured(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_improperly_configured(&self) -> bool {
        matches!(self, Self::ImproperlyConfigured(_))
    }
}

impl From<toml::de::Error> for VannaError {
    fn from(err: toml::de::Error) -> Self {
        Self::ImproperlyConfigured(format!("Invalid configuration file: {err}"))
    }
}

/// Result type for Vanna operations
pub type Result<T> = std::result::Result<T, VannaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_display_message_verbatim() {
        let err = VannaError::validation("Please set your model");
        assert_eq!(err.to_string(), "Please set your model");
        assert!(err.is_validation());
        assert!(!err.is_improperly_configured());

        let err = VannaError::improperly_configured("Please set your postgres host");
        assert_eq!(err.to_string(), "Please set your postgres host");
        assert!(err.is_improperly_configured());
    }

    #[test]
    fn test_toml_error_is_configuration_problem() {
        let parse_err = toml::from_str::<toml::Value>("endpoint = ").unwrap_err();
        let err = VannaError::from(parse_err);
        assert!(err.is_improperly_configured());
        assert!(err.to_string().starts_with("Invalid configuration file"));
    }
}
