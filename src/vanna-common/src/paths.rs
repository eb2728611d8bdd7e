//! Validation of user-supplied file paths (credentials, training files).

use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{Result, VannaError};

/// Check that `path` exists, is a regular file, and can be opened for reading.
///
/// Each failure mode is an [`VannaError::ImproperlyConfigured`] with its own
/// message naming the path as given by the caller.
pub fn validate_config_path(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let shown = path.display();

    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(VannaError::improperly_configured(format!(
                "No such configuration file: {shown}"
            )));
        }
        Err(e) => {
            return Err(VannaError::improperly_configured(format!(
                "Cannot inspect configuration file {shown}: {e}"
            )));
        }
    };

    if !metadata.is_file() {
        return Err(VannaError::improperly_configured(format!(
            "Config should be a file: {shown}"
        )));
    }

    match File::open(path) {
        Ok(_) => Ok(path.to_path_buf()),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => Err(VannaError::improperly_configured(
            format!("Cannot read the config file. Please grant read privileges: {shown}"),
        )),
        Err(e) => Err(VannaError::improperly_configured(format!(
            "Cannot open configuration file {shown}: {e}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        let err = validate_config_path("wrong/file/path.json").unwrap_err();
        assert!(err.is_improperly_configured());
        assert_eq!(err.to_string(), "No such configuration file: wrong/file/path.json");
    }

    #[test]
    fn test_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate_config_path(dir.path()).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Config should be a file: {}", dir.path().display())
        );
    }

    #[test]
    fn test_readable_file_passes() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let validated = validate_config_path(file.path()).unwrap();
        assert_eq!(validated, file.path());
    }

    #[cfg(unix)]
    #[test]
    fn test_write_only_file_is_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o200)).unwrap();

        // Privileged users can read regardless of mode bits.
        if File::open(file.path()).is_ok() {
            return;
        }

        let err = validate_config_path(file.path()).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "Cannot read the config file. Please grant read privileges: {}",
                file.path().display()
            )
        );
    }
}
