//! BigQuery settings. Queries run through a caller-supplied [`crate::SqlRunner`].

use std::path::PathBuf;

use vanna_common::{Result, VannaError, validate_config_path};

/// Environment variable holding the Google Cloud project id.
pub const PROJECT_ID_ENV_VAR: &str = "PROJECT_ID";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigQuerySettings {
    pub project_id: String,
    /// Service-account key file; `None` uses application default credentials.
    pub credentials_path: Option<PathBuf>,
}

impl BigQuerySettings {
    pub fn resolve(project_id: Option<String>, cred_file_path: Option<PathBuf>) -> Result<Self> {
        Self::resolve_with(project_id, cred_file_path, |key| std::env::var(key).ok())
    }

    /// Resolve settings, reading `PROJECT_ID` through `lookup` when no project
    /// is given. A credentials file must exist, be a regular file and be
    /// readable.
    pub fn resolve_with(
        project_id: Option<String>,
        cred_file_path: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let project_id = project_id
            .or_else(|| lookup(PROJECT_ID_ENV_VAR))
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                VannaError::improperly_configured("Please set your Google Cloud Project ID.")
            })?;

        let credentials_path = cred_file_path.map(validate_config_path).transpose()?;

        Ok(Self {
            project_id,
            credentials_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_project_id_required() {
        let err = BigQuerySettings::resolve_with(None, None, |_| None).unwrap_err();
        assert!(err.is_improperly_configured());
        assert_eq!(err.to_string(), "Please set your Google Cloud Project ID.");
    }

    #[test]
    fn test_project_id_from_environment() {
        let settings =
            BigQuerySettings::resolve_with(None, None, |_| Some("env-project".to_string())).unwrap();
        assert_eq!(settings.project_id, "env-project");
        assert_eq!(settings.credentials_path, None);
    }

    #[test]
    fn test_missing_credentials_file() {
        let err = BigQuerySettings::resolve_with(
            Some("test-project".into()),
            Some("wrong/file/path.json".into()),
            |_| None,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "No such configuration file: wrong/file/path.json");
    }

    #[test]
    fn test_credentials_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = BigQuerySettings::resolve_with(
            Some("test-project".into()),
            Some(dir.path().to_path_buf()),
            |_| None,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Config should be a file: {}", dir.path().display())
        );
    }

    #[test]
    fn test_valid_credentials_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let settings = BigQuerySettings::resolve_with(
            Some("test-project".into()),
            Some(file.path().to_path_buf()),
            |_| None,
        )
        .unwrap();
        assert_eq!(settings.credentials_path.as_deref(), Some(file.path()));
    }
}
