//! crates/cinelog_mongo/src/client.rs
//!
//! Builds the process-wide database handle. The returned [`Database`] is
//! backed by a pooled, thread-safe client; it is constructed once at
//! startup and passed explicitly to every store (no ambient singleton).

use mongodb::options::{Acknowledgment, ClientOptions, WriteConcern};
use mongodb::{Client, Database};

use crate::config::MongoConfig;
use crate::error::SetupError;

/// Connects to the store and returns the shared database handle.
///
/// Every point write made through this handle requests acknowledgment
/// from at least one replica, bounded by the configured write-acknowledgment
/// timeout; a write that cannot be confirmed in time fails the call.
pub async fn connect(config: &MongoConfig) -> Result<Database, mongodb::error::Error> {
    let mut options = ClientOptions::parse(&config.uri).await?;
    options.write_concern = Some(
        WriteConcern::builder()
            .w(Acknowledgment::Nodes(1))
            .w_timeout(config.wtimeout)
            .build(),
    );
    options.connect_timeout = Some(config.connect_timeout);
    options.app_name = Some("cinelog".to_string());

    let client = Client::with_options(options)?;
    Ok(client.database(&config.database))
}

/// Convenience for binaries: loads [`MongoConfig`] from the environment
/// and connects.
pub async fn connect_from_env() -> Result<Database, SetupError> {
    let config = MongoConfig::from_env()?;
    let database = connect(&config).await?;
    Ok(database)
}
