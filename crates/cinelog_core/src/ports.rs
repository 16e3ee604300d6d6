//! crates/cinelog_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the data-access layer.
//! These traits form the boundary of the hexagonal architecture, allowing
//! the core to be independent of the concrete document store behind it.

use async_trait::async_trait;

use crate::domain::{Account, Comment, Critic, NewComment, Preferences, Session};

//=========================================================================================
// Generic Store Error and Result Types
//=========================================================================================

/// The error type for all store operations.
///
/// Absence is not an error here: lookups return `Option`, and conditional
/// mutations return `bool`. In particular, an update or delete whose
/// (id, author) filter matches nothing reports `Ok(false)` whether the
/// record is missing or owned by someone else; the two cases are
/// deliberately indistinguishable.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A record with the same identity key already exists.
    #[error("an entity with identity {0:?} already exists")]
    DuplicateEntity(String),
    /// A caller-supplied value that can never match a stored record
    /// (empty identity key, malformed record id).
    #[error("invalid argument: {0}")]
    Invalid(String),
    /// The store failed to acknowledge a write within its bounded wait.
    #[error("the store did not acknowledge the write: {0}")]
    WriteFailure(String),
    #[error("an unexpected store error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

//=========================================================================================
// Component Ports (Traits)
//=========================================================================================

/// Owns account records and enforces identity uniqueness by email.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Inserts a new account and returns the stored record.
    ///
    /// Fails with [`StoreError::DuplicateEntity`] if an account with the
    /// same email already exists; the existing record is never overwritten.
    /// An empty email is rejected with [`StoreError::Invalid`].
    async fn create_account(&self, account: Account) -> StoreResult<Account>;

    /// Exact-match lookup by email.
    async fn fetch_account(&self, email: &str) -> StoreResult<Option<Account>>;

    /// Deletes the account matching `email`, cascading into the deletion
    /// of that user's session first. Returns whether an account was
    /// actually removed; deleting a missing account is not an error.
    async fn delete_account(&self, email: &str) -> StoreResult<bool>;

    /// Replaces the account's preferences wholesale (no merging).
    /// Returns `false`, mutating nothing, when the account does not exist.
    async fn update_preferences(
        &self,
        email: &str,
        preferences: Preferences,
    ) -> StoreResult<bool>;
}

/// Owns at-most-one active session per user id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores a `{user_id, token}` pair, first deleting any session the
    /// user already has. After this returns, the previous token is
    /// unresolvable and exactly one session for `user_id` survives.
    async fn create_session(&self, user_id: &str, token: &str) -> StoreResult<()>;

    /// Exact-match lookup by user id.
    async fn fetch_session(&self, user_id: &str) -> StoreResult<Option<Session>>;

    /// Deletes any session matching `user_id`. Idempotent: succeeds
    /// whether or not one existed.
    async fn delete_session(&self, user_id: &str) -> StoreResult<()>;
}

/// Owns comment records and enforces authorship-scoped mutation: every
/// update and delete filters on the (id, author email) pair at once.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Inserts a comment unconditionally and returns the stored record
    /// including its assigned id and creation date.
    async fn add_comment(&self, comment: NewComment) -> StoreResult<Comment>;

    /// Lookup by the 24-character hex id.
    async fn fetch_comment(&self, comment_id: &str) -> StoreResult<Option<Comment>>;

    /// Updates the text (and refreshes the date) of the comment matching
    /// both `comment_id` and `author_email`. Returns `false`, mutating
    /// nothing, when no such pair exists.
    async fn update_comment(
        &self,
        comment_id: &str,
        text: &str,
        author_email: &str,
    ) -> StoreResult<bool>;

    /// Deletes the comment matching both `comment_id` and `author_email`.
    /// Returns `false` when no such pair exists.
    async fn delete_comment(&self, comment_id: &str, author_email: &str) -> StoreResult<bool>;
}

/// Computes the ranked "most active commenters" report.
#[async_trait]
pub trait ReportAggregator: Send + Sync {
    /// Counts comments per author email over the whole comment set and
    /// returns at most the top 20, ordered by count descending. Reads
    /// with majority durability so not-yet-committed writes cannot make
    /// repeated reports flap. Tie order between equal counts is
    /// unspecified.
    async fn most_active_commenters(&self) -> StoreResult<Vec<Critic>>;
}
