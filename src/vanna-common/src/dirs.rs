//! Home directory resolution for the Vanna CLI.
//!
//! - Linux/macOS: `~/.vanna`
//! - Windows: `%APPDATA%\vanna`
//!
//! Can be overridden with the `VANNA_HOME` environment variable.

use std::path::PathBuf;

/// Application name for directory paths
pub const APP_NAME: &str = "vanna";

/// Primary home directory name on Linux/macOS
pub const HOME_DIR_NAME: &str = ".vanna";

/// Environment variable overriding the home directory.
pub const HOME_ENV_VAR: &str = "VANNA_HOME";

/// Get the Vanna home directory, respecting `VANNA_HOME`.
///
/// Relative `VANNA_HOME` values are resolved against the current directory so
/// the config file never lands somewhere unexpected.
pub fn get_vanna_home() -> Option<PathBuf> {
    if let Ok(home) = std::env::var(HOME_ENV_VAR) {
        let home = PathBuf::from(home);
        if home.is_absolute() {
            return Some(home);
        }
        return std::env::current_dir().ok().map(|cwd| cwd.join(home));
    }

    #[cfg(target_os = "windows")]
    {
        dirs::config_dir().map(|appdata| appdata.join(APP_NAME))
    }

    #[cfg(not(target_os = "windows"))]
    {
        dirs::home_dir().map(|home| home.join(HOME_DIR_NAME))
    }
}

/// Path of `config.toml` inside the home directory.
pub fn config_file() -> Option<PathBuf> {
    get_vanna_home().map(|home| home.join("config.toml"))
}
