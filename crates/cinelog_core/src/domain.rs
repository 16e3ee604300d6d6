//! crates/cinelog_core/src/domain.rs
//!
//! Defines the pure, core data structures for the catalog's data-access
//! layer. These structs are independent of any database or serialization
//! format.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Free-form per-account preferences: string keys mapped to arbitrary
/// scalar or nested values. Always replaced as a whole, never merged.
pub type Preferences = BTreeMap<String, serde_json::Value>;

/// A registered user account. The email is the identity key: no two
/// accounts may share one.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub email: String,
    pub name: String,
    pub hashed_password: String,
    pub preferences: Preferences,
}

/// An active login session. At most one exists per user id at any time.
/// `user_id` is a back-reference to an account, not ownership.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: String,
    pub token: String,
}

/// A user-authored comment on a movie, as stored. Ids are store-assigned
/// and addressed externally as 24-character hex strings.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: String,
    pub author_email: String,
    pub movie_id: String,
    pub text: String,
    pub date: DateTime<Utc>,
}

/// A comment as submitted by its author; the layer assigns the id and the
/// creation date on insert.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub author_email: String,
    pub movie_id: String,
    pub text: String,
}

/// One row of the "most active commenters" report. Derived and transient;
/// never persisted as a first-class entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Critic {
    pub email: String,
    pub num_comments: i64,
}
