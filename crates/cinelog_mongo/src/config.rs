//! crates/cinelog_mongo/src/config.rs
//!
//! Defines the adapter's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The
//! `.env` file is used for local development.

use std::time::Duration;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct MongoConfig {
    /// Connection string for the shared, pooled client.
    pub uri: String,
    /// Name of the database holding the accounts, sessions and comments
    /// collections.
    pub database: String,
    /// Upper bound on how long a write waits for acknowledgment before the
    /// call itself fails.
    pub wtimeout: Duration,
    pub connect_timeout: Duration,
}

impl MongoConfig {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for
    /// development, but this is skipped in test environments to ensure
    /// tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let uri = std::env::var("MONGODB_URI")
            .map_err(|_| ConfigError::MissingVar("MONGODB_URI".to_string()))?;

        let database =
            std::env::var("MONGODB_DATABASE").unwrap_or_else(|_| "cinelog".to_string());

        let wtimeout = millis_var("MONGODB_WTIMEOUT_MS", Duration::from_millis(2500))?;
        let connect_timeout =
            millis_var("MONGODB_CONNECT_TIMEOUT_MS", Duration::from_millis(2500))?;

        Ok(Self {
            uri,
            database,
            wtimeout,
            connect_timeout,
        })
    }
}

/// Reads an optional millisecond duration from the environment, falling
/// back to `default` when the variable is unset.
fn millis_var(name: &str, default: Duration) -> Result<Duration, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => {
            let millis = raw.parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue(
                    name.to_string(),
                    format!("'{}' is not a whole number of milliseconds", raw),
                )
            })?;
            Ok(Duration::from_millis(millis))
        }
        Err(_) => Ok(default),
    }
}
