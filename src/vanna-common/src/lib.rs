//! Common utilities shared across the Vanna SDK crates.
//!
//! - [`error`] holds the single error enum every crate returns.
//! - [`config`] loads `config.toml` and applies environment overrides.
//! - [`dirs`] resolves the Vanna home directory.
//! - [`http_client`] builds consistently configured reqwest clients.
//! - [`model_name`] validates and slugifies model names.
//! - [`paths`] validates user-supplied file paths.

pub mod config;
pub mod dirs;
pub mod error;
pub mod http_client;
pub mod model_name;
pub mod paths;

pub use config::{
    API_KEY_ENV_VAR, DEFAULT_ENDPOINT, ENDPOINT_ENV_VAR, MODEL_ENV_VAR, VannaConfig, rpc_url,
    unauthenticated_rpc_url,
};
pub use dirs::{HOME_DIR_NAME, config_file, get_vanna_home};
pub use error::{Result, VannaError};
pub use http_client::{DEFAULT_TIMEOUT, USER_AGENT, create_client_with_timeout, create_default_client};
pub use model_name::{ModelName, PLACEHOLDER_MODEL, slugify};
pub use paths::validate_config_path;
