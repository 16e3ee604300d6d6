//! crates/cinelog_mongo/src/stores/mod.rs
//!
//! The concrete MongoDB implementations of the core's store ports, one
//! module per component, plus the shared plumbing they all use: collection
//! names, record-id conversion, and driver-error mapping.

mod accounts;
mod comments;
mod reports;
mod sessions;

pub use accounts::MongoAccountStore;
pub use comments::MongoCommentStore;
pub use reports::MongoReportAggregator;
pub use sessions::MongoSessionStore;

use mongodb::bson::oid::ObjectId;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::Database;

use cinelog_core::{StoreError, StoreResult};

pub(crate) const ACCOUNTS_COLLECTION: &str = "accounts";
pub(crate) const SESSIONS_COLLECTION: &str = "sessions";
pub(crate) const COMMENTS_COLLECTION: &str = "comments";

/// Converts the external 24-character hex id form into the store's native
/// id representation.
pub(crate) fn object_id(id: &str) -> StoreResult<ObjectId> {
    ObjectId::parse_str(id)
        .map_err(|_| StoreError::Invalid(format!("'{}' is not a 24-character hex record id", id)))
}

pub(crate) fn read_err(err: mongodb::error::Error) -> StoreError {
    StoreError::Unexpected(err.to_string())
}

/// An unacknowledged or rejected write. Never swallowed: every mutating
/// operation reports this to the caller.
pub(crate) fn write_err(err: mongodb::error::Error) -> StoreError {
    StoreError::WriteFailure(err.to_string())
}

/// True when the server rejected an insert for violating a unique index.
pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match *err.kind {
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) => write_error.code == 11000,
        _ => false,
    }
}

/// All four stores bundled over one shared database handle.
pub struct Catalog {
    pub accounts: MongoAccountStore,
    pub sessions: MongoSessionStore,
    pub comments: MongoCommentStore,
    pub reports: MongoReportAggregator,
}

impl Catalog {
    /// Creates the stores. The handle is cloned per store; all clones share
    /// the same underlying connection pool.
    pub fn new(db: &Database) -> Self {
        Self {
            accounts: MongoAccountStore::new(db),
            sessions: MongoSessionStore::new(db),
            comments: MongoCommentStore::new(db),
            reports: MongoReportAggregator::new(db),
        }
    }

    /// Creates the unique indexes the uniqueness invariants are anchored
    /// on. Run once at startup, before serving callers.
    pub async fn ensure_indexes(&self) -> Result<(), mongodb::error::Error> {
        self.accounts.ensure_indexes().await?;
        self.sessions.ensure_indexes().await?;
        Ok(())
    }
}
