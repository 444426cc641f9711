//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `LOANBOOK_HOST` - Bind address (default: 127.0.0.1)
//! - `LOANBOOK_PORT` - Listen port (default: 8080)
//! - `LOANBOOK_SEED_DEMO_DATA` - Load demo accounts and loans at startup
//!   (default: true)
//! - `LOANBOOK_LOANS_CACHE_TTL_SECS` - `loans` namespace TTL (default: 300)
//! - `LOANBOOK_USERS_CACHE_TTL_SECS` - `users` namespace TTL (default: 1800)
//! - `LOANBOOK_STATISTICS_CACHE_TTL_SECS` - `statistics` namespace TTL
//!   (default: 120)
//! - `LOANBOOK_SESSIONS_CACHE_TTL_SECS` - `sessions` namespace TTL
//!   (default: 3600)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use thiserror::Error;

use crate::cache::CacheTtls;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Whether to load demo users and loans into an empty store at startup
    pub seed_demo_data: bool,
    /// Per-namespace cache TTLs
    pub cache: CacheTtls,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = CacheTtls::default();
        Ok(Self {
            host: parse_env_or("LOANBOOK_HOST", IpAddr::V4(Ipv4Addr::LOCALHOST))?,
            port: parse_env_or("LOANBOOK_PORT", 8080)?,
            seed_demo_data: parse_env_or("LOANBOOK_SEED_DEMO_DATA", true)?,
            cache: CacheTtls {
                loans: ttl_env_or("LOANBOOK_LOANS_CACHE_TTL_SECS", defaults.loans)?,
                users: ttl_env_or("LOANBOOK_USERS_CACHE_TTL_SECS", defaults.users)?,
                statistics: ttl_env_or(
                    "LOANBOOK_STATISTICS_CACHE_TTL_SECS",
                    defaults.statistics,
                )?,
                sessions: ttl_env_or("LOANBOOK_SESSIONS_CACHE_TTL_SECS", defaults.sessions)?,
            },
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
            seed_demo_data: false,
            cache: CacheTtls::default(),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Parse a TTL in whole seconds, falling back to `default` when unset.
fn ttl_env_or(key: &str, default: Duration) -> Result<Duration, ConfigError> {
    Ok(Duration::from_secs(parse_env_or(
        key,
        default.as_secs(),
    )?))
}
