//! crates/cinelog_mongo/src/error.rs
//!
//! Defines the error type for bootstrapping the adapter.

use crate::config::ConfigError;

/// Errors that can occur while constructing the shared database handle.
///
/// Operational errors are not represented here; once connected, every
/// store operation reports through `cinelog_core::StoreError`.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error from the underlying database driver.
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
}
