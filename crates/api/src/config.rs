//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `POMELO_DATABASE_URL` - `PostgreSQL` connection string
//!
//! ## Optional
//! - `POMELO_HOST` - Bind address (default: 127.0.0.1)
//! - `POMELO_PORT` - Listen port (default: 3000)
//! - `POMELO_ACCESS_TOKEN_TTL_SECS` - Access token lifetime (default: 3600)
//! - `POMELO_REFRESH_TOKEN_TTL_SECS` - Refresh token lifetime (default: 2592000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name (e.g., production)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Access token lifetime in seconds
    pub access_token_ttl_secs: i64,
    /// Refresh token lifetime in seconds
    pub refresh_token_ttl_secs: i64,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("POMELO_DATABASE_URL")?;
        let host = get_env_or_default("POMELO_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("POMELO_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("POMELO_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("POMELO_PORT".to_string(), e.to_string()))?;
        let access_token_ttl_secs = get_ttl("POMELO_ACCESS_TOKEN_TTL_SECS", "3600")?;
        let refresh_token_ttl_secs = get_ttl("POMELO_REFRESH_TOKEN_TTL_SECS", "2592000")?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            database_url,
            host,
            port,
            access_token_ttl_secs,
            refresh_token_ttl_secs,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a positive token lifetime from the environment.
fn get_ttl(key: &str, default: &str) -> Result<i64, ConfigError> {
    let ttl = get_env_or_default(key, default)
        .parse::<i64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if ttl <= 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be positive".to_string(),
        ));
    }
    Ok(ttl)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = ApiConfig {
            database_url: SecretString::from("postgres://localhost/pomelo".to_string()),
            host: "0.0.0.0".parse().unwrap(),
            port: 8080,
            access_token_ttl_secs: 3600,
            refresh_token_ttl_secs: 2_592_000,
            sentry_dsn: None,
            sentry_environment: None,
        };
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_get_env_or_default_falls_back() {
        assert_eq!(
            get_env_or_default("POMELO_TEST_UNSET_VARIABLE", "fallback"),
            "fallback"
        );
    }
}
