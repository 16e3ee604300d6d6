//! MongoDB adapter for the cinelog data-access ports.
//!
//! Construct the shared handle once at startup, build the stores around
//! it, and create the uniqueness indexes before serving callers:
//!
//! ```ignore
//! let db = cinelog_mongo::connect_from_env().await?;
//! let catalog = cinelog_mongo::Catalog::new(&db);
//! catalog.ensure_indexes().await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod stores;

pub use client::{connect, connect_from_env};
pub use config::{ConfigError, MongoConfig};
pub use error::SetupError;
pub use stores::{
    Catalog, MongoAccountStore, MongoCommentStore, MongoReportAggregator, MongoSessionStore,
};
