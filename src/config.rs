//! Configuration management for taskboard.
//!
//! Configuration can be set via environment variables:
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `DATABASE_URL` - Optional. `memory://` or `sqlite://<path>`. Defaults to
//!   `sqlite://data/tasks.db`. Checked when the store is first used, not here.
//! - `APP_ENV` - Optional. Environment name reported by `/api/test`. Defaults to `development`.
//! - `TASKBOARD_API_URL` - Optional. Base URL clients use to reach the API.
//!   Defaults to `http://localhost:3000`.

use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/tasks.db";
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Server and client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Document store location
    pub database_url: String,

    /// Deployment environment name
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `PORT` is not a valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let environment = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Self {
            host,
            port,
            database_url,
            environment,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            database_url: database_url.into(),
            environment: "test".to_string(),
        }
    }
}

/// Base URL clients should talk to.
pub fn api_url_from_env() -> String {
    std::env::var("TASKBOARD_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}
