//! crates/cinelog_mongo/src/stores/accounts.rs
//!
//! The account store. Identity uniqueness is anchored on a unique index on
//! `email`; the pre-insert lookup is only a fast path, the index is the
//! source of truth when two creations race.

use async_trait::async_trait;
use mongodb::bson::{doc, to_bson};
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};

use cinelog_core::ports::{AccountStore, SessionStore};
use cinelog_core::{Account, Preferences, StoreError, StoreResult};

use super::sessions::MongoSessionStore;
use super::{is_duplicate_key, read_err, write_err, ACCOUNTS_COLLECTION};

/// Implements the `AccountStore` port over the `accounts` collection.
///
/// Holds its own session store so account deletion can cascade into the
/// user's session; this is the one place components call each other.
#[derive(Clone)]
pub struct MongoAccountStore {
    accounts: Collection<AccountDocument>,
    sessions: MongoSessionStore,
}

impl MongoAccountStore {
    pub fn new(db: &Database) -> Self {
        Self {
            accounts: db.collection(ACCOUNTS_COLLECTION),
            sessions: MongoSessionStore::new(db),
        }
    }

    /// Creates the unique index on `email`.
    pub(crate) async fn ensure_indexes(&self) -> Result<(), mongodb::error::Error> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.accounts.create_index(index, None).await?;
        Ok(())
    }
}

/// The stored shape of an account. Field names here are the reviewed
/// contract with the collection; keep them stable.
#[derive(Debug, Serialize, Deserialize)]
struct AccountDocument {
    email: String,
    name: String,
    password: String,
    #[serde(default)]
    preferences: Preferences,
}

impl AccountDocument {
    fn from_domain(account: &Account) -> Self {
        Self {
            email: account.email.clone(),
            name: account.name.clone(),
            password: account.hashed_password.clone(),
            preferences: account.preferences.clone(),
        }
    }

    fn to_domain(self) -> Account {
        Account {
            email: self.email,
            name: self.name,
            hashed_password: self.password,
            preferences: self.preferences,
        }
    }
}

#[async_trait]
impl AccountStore for MongoAccountStore {
    async fn create_account(&self, account: Account) -> StoreResult<Account> {
        if account.email.is_empty() {
            return Err(StoreError::Invalid("account email must not be empty".to_string()));
        }

        let existing = self
            .accounts
            .find_one(doc! { "email": &account.email }, None)
            .await
            .map_err(read_err)?;
        if existing.is_some() {
            return Err(StoreError::DuplicateEntity(account.email));
        }

        let document = AccountDocument::from_domain(&account);
        match self.accounts.insert_one(&document, None).await {
            Ok(_) => Ok(account),
            // A creation that raced us past the lookup loses to the index.
            Err(err) if is_duplicate_key(&err) => {
                tracing::warn!(email = %account.email, "rejected duplicate account creation");
                Err(StoreError::DuplicateEntity(account.email))
            }
            Err(err) => Err(write_err(err)),
        }
    }

    async fn fetch_account(&self, email: &str) -> StoreResult<Option<Account>> {
        let document = self
            .accounts
            .find_one(doc! { "email": email }, None)
            .await
            .map_err(read_err)?;
        Ok(document.map(AccountDocument::to_domain))
    }

    async fn delete_account(&self, email: &str) -> StoreResult<bool> {
        // The session goes first so no token outlives its account.
        self.sessions.delete_session(email).await?;

        let removed = self
            .accounts
            .find_one_and_delete(doc! { "email": email }, None)
            .await
            .map_err(write_err)?;
        Ok(removed.is_some())
    }

    async fn update_preferences(
        &self,
        email: &str,
        preferences: Preferences,
    ) -> StoreResult<bool> {
        let value = to_bson(&preferences)
            .map_err(|err| StoreError::Unexpected(err.to_string()))?;

        // One $set of the whole mapping: a replace, not a merge.
        let result = self
            .accounts
            .update_one(
                doc! { "email": email },
                doc! { "$set": { "preferences": value } },
                None,
            )
            .await
            .map_err(write_err)?;
        Ok(result.matched_count > 0)
    }
}
