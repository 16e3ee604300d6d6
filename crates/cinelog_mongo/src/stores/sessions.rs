//! crates/cinelog_mongo/src/stores/sessions.rs
//!
//! The session store: at most one active session per user id. Replacement
//! is delete-then-insert, so the previous token is unresolvable the moment
//! the call returns. The unique index on `user_id` backs the invariant;
//! without a compare-and-swap primitive a concurrent replacement for the
//! same user can still race in the narrow window between the two writes,
//! in which case the losing insert surfaces as a write failure rather than
//! a second surviving session.

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};

use cinelog_core::ports::SessionStore;
use cinelog_core::{Session, StoreResult};

use super::{read_err, write_err, SESSIONS_COLLECTION};

/// Implements the `SessionStore` port over the `sessions` collection.
#[derive(Clone)]
pub struct MongoSessionStore {
    sessions: Collection<SessionDocument>,
}

impl MongoSessionStore {
    pub fn new(db: &Database) -> Self {
        Self {
            sessions: db.collection(SESSIONS_COLLECTION),
        }
    }

    /// Creates the unique index on `user_id`.
    pub(crate) async fn ensure_indexes(&self) -> Result<(), mongodb::error::Error> {
        let index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.sessions.create_index(index, None).await?;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionDocument {
    user_id: String,
    token: String,
}

impl SessionDocument {
    fn to_domain(self) -> Session {
        Session {
            user_id: self.user_id,
            token: self.token,
        }
    }
}

#[async_trait]
impl SessionStore for MongoSessionStore {
    async fn create_session(&self, user_id: &str, token: &str) -> StoreResult<()> {
        self.sessions
            .delete_one(doc! { "user_id": user_id }, None)
            .await
            .map_err(write_err)?;

        let document = SessionDocument {
            user_id: user_id.to_string(),
            token: token.to_string(),
        };
        self.sessions
            .insert_one(&document, None)
            .await
            .map_err(write_err)?;
        tracing::debug!(user_id, "session replaced");
        Ok(())
    }

    async fn fetch_session(&self, user_id: &str) -> StoreResult<Option<Session>> {
        let document = self
            .sessions
            .find_one(doc! { "user_id": user_id }, None)
            .await
            .map_err(read_err)?;
        Ok(document.map(SessionDocument::to_domain))
    }

    async fn delete_session(&self, user_id: &str) -> StoreResult<()> {
        // Idempotent: deleting a session that does not exist is a success.
        self.sessions
            .delete_one(doc! { "user_id": user_id }, None)
            .await
            .map_err(write_err)?;
        Ok(())
    }
}
