//! Centralized HTTP client factory.
//!
//! All clients include: User-Agent, tcp_nodelay, an idle-pool timeout so DNS is
//! re-resolved periodically, and the requested request timeout.

use reqwest::Client;
use std::time::Duration;

use crate::{Result, VannaError};

/// User-Agent string for all HTTP requests
pub const USER_AGENT: &str = concat!("vanna-rs/", env!("CARGO_PKG_VERSION"));

/// Default timeout for RPC requests (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection pool idle timeout.
pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Creates an HTTP client with default configuration (30s timeout).
pub fn create_default_client() -> Result<Client> {
    create_client_with_timeout(DEFAULT_TIMEOUT)
}

/// Creates an HTTP client with a custom timeout.
pub fn create_client_with_timeout(timeout: Duration) -> Result<Client> {
    let read_timeout = timeout.min(Duration::from_secs(60));

    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .read_timeout(read_timeout)
        .tcp_nodelay(true)
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .pool_max_idle_per_host(4)
        .build()
        .map_err(|e| VannaError::improperly_configured(format!("Failed to build HTTP client: {e}")))
}
