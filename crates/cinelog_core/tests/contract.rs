//! Contract tests for the store ports, run against an in-memory
//! implementation. These pin down the observable semantics every adapter
//! has to honor: identity uniqueness, single-session replacement,
//! authorship-scoped mutation, cascade deletes, and the ranked report.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use cinelog_core::{
    Account, AccountStore, Comment, CommentStore, Critic, NewComment, Preferences,
    ReportAggregator, Session, SessionStore, StoreError, StoreResult,
};

/// In-memory implementation of all four ports. Thread-safe via internal
/// mutexes; id assignment mimics the store's 24-hex representation.
#[derive(Default)]
struct InMemoryCatalog {
    accounts: Mutex<Vec<Account>>,
    sessions: Mutex<Vec<Session>>,
    comments: Mutex<Vec<Comment>>,
    next_id: AtomicU64,
}

impl InMemoryCatalog {
    fn new() -> Self {
        Self::default()
    }

    fn assign_id(&self) -> String {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        format!("{:024x}", n)
    }
}

#[async_trait]
impl AccountStore for InMemoryCatalog {
    async fn create_account(&self, account: Account) -> StoreResult<Account> {
        if account.email.is_empty() {
            return Err(StoreError::Invalid("account email must not be empty".into()));
        }
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(StoreError::DuplicateEntity(account.email));
        }
        accounts.push(account.clone());
        Ok(account)
    }

    async fn fetch_account(&self, email: &str) -> StoreResult<Option<Account>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn delete_account(&self, email: &str) -> StoreResult<bool> {
        self.delete_session(email).await?;
        let mut accounts = self.accounts.lock().unwrap();
        let before = accounts.len();
        accounts.retain(|a| a.email != email);
        Ok(accounts.len() < before)
    }

    async fn update_preferences(
        &self,
        email: &str,
        preferences: Preferences,
    ) -> StoreResult<bool> {
        let mut accounts = self.accounts.lock().unwrap();
        match accounts.iter_mut().find(|a| a.email == email) {
            Some(account) => {
                account.preferences = preferences;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl SessionStore for InMemoryCatalog {
    async fn create_session(&self, user_id: &str, token: &str) -> StoreResult<()> {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.retain(|s| s.user_id != user_id);
        sessions.push(Session {
            user_id: user_id.to_string(),
            token: token.to_string(),
        });
        Ok(())
    }

    async fn fetch_session(&self, user_id: &str) -> StoreResult<Option<Session>> {
        let sessions = self.sessions.lock().unwrap();
        Ok(sessions.iter().find(|s| s.user_id == user_id).cloned())
    }

    async fn delete_session(&self, user_id: &str) -> StoreResult<()> {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.retain(|s| s.user_id != user_id);
        Ok(())
    }
}

#[async_trait]
impl CommentStore for InMemoryCatalog {
    async fn add_comment(&self, comment: NewComment) -> StoreResult<Comment> {
        let stored = Comment {
            id: self.assign_id(),
            author_email: comment.author_email,
            movie_id: comment.movie_id,
            text: comment.text,
            date: Utc::now(),
        };
        self.comments.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn fetch_comment(&self, comment_id: &str) -> StoreResult<Option<Comment>> {
        let comments = self.comments.lock().unwrap();
        Ok(comments.iter().find(|c| c.id == comment_id).cloned())
    }

    async fn update_comment(
        &self,
        comment_id: &str,
        text: &str,
        author_email: &str,
    ) -> StoreResult<bool> {
        let mut comments = self.comments.lock().unwrap();
        match comments
            .iter_mut()
            .find(|c| c.id == comment_id && c.author_email == author_email)
        {
            Some(comment) => {
                comment.text = text.to_string();
                comment.date = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_comment(&self, comment_id: &str, author_email: &str) -> StoreResult<bool> {
        let mut comments = self.comments.lock().unwrap();
        let before = comments.len();
        comments.retain(|c| !(c.id == comment_id && c.author_email == author_email));
        Ok(comments.len() < before)
    }
}

#[async_trait]
impl ReportAggregator for InMemoryCatalog {
    async fn most_active_commenters(&self) -> StoreResult<Vec<Critic>> {
        let comments = self.comments.lock().unwrap();
        let mut counts: BTreeMap<String, i64> = BTreeMap::new();
        for comment in comments.iter() {
            *counts.entry(comment.author_email.clone()).or_default() += 1;
        }
        let mut critics: Vec<Critic> = counts
            .into_iter()
            .map(|(email, num_comments)| Critic { email, num_comments })
            .collect();
        critics.sort_by(|a, b| b.num_comments.cmp(&a.num_comments));
        critics.truncate(20);
        Ok(critics)
    }
}

fn account(email: &str) -> Account {
    Account {
        email: email.to_string(),
        name: "Test User".to_string(),
        hashed_password: "$2a$10$hash".to_string(),
        preferences: Preferences::new(),
    }
}

fn comment_by(email: &str) -> NewComment {
    NewComment {
        author_email: email.to_string(),
        movie_id: "573a1390f29313caabcd4135".to_string(),
        text: "a comment".to_string(),
    }
}

#[tokio::test]
async fn duplicate_account_creation_is_rejected() {
    let catalog = InMemoryCatalog::new();
    catalog.create_account(account("u@x.com")).await.unwrap();

    let err = catalog.create_account(account("u@x.com")).await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicateEntity(email) if email == "u@x.com"));

    // Exactly one record survives.
    assert!(catalog.fetch_account("u@x.com").await.unwrap().is_some());
    assert_eq!(catalog.accounts.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn empty_email_is_rejected() {
    let catalog = InMemoryCatalog::new();
    let err = catalog.create_account(account("")).await.unwrap_err();
    assert!(matches!(err, StoreError::Invalid(_)));
}

#[tokio::test]
async fn new_session_supersedes_the_old_one() {
    let catalog = InMemoryCatalog::new();
    catalog.create_session("u@x.com", "token-1").await.unwrap();
    catalog.create_session("u@x.com", "token-2").await.unwrap();
    catalog.create_session("u@x.com", "token-3").await.unwrap();

    let session = catalog.fetch_session("u@x.com").await.unwrap().unwrap();
    assert_eq!(session.token, "token-3");
    assert_eq!(catalog.sessions.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn only_the_author_can_mutate_a_comment() {
    let catalog = InMemoryCatalog::new();
    let stored = catalog.add_comment(comment_by("a@x.com")).await.unwrap();

    // A different author matches nothing and mutates nothing.
    assert!(!catalog.update_comment(&stored.id, "hijacked", "b@x.com").await.unwrap());
    assert!(!catalog.delete_comment(&stored.id, "b@x.com").await.unwrap());
    let unchanged = catalog.fetch_comment(&stored.id).await.unwrap().unwrap();
    assert_eq!(unchanged.text, "a comment");

    // The owner succeeds.
    assert!(catalog.update_comment(&stored.id, "edited", "a@x.com").await.unwrap());
    let edited = catalog.fetch_comment(&stored.id).await.unwrap().unwrap();
    assert_eq!(edited.text, "edited");
    assert!(catalog.delete_comment(&stored.id, "a@x.com").await.unwrap());
    assert!(catalog.fetch_comment(&stored.id).await.unwrap().is_none());
}

#[tokio::test]
async fn account_deletion_is_idempotent_and_cascades_into_the_session() {
    let catalog = InMemoryCatalog::new();
    catalog.create_account(account("u@x.com")).await.unwrap();
    catalog.create_session("u@x.com", "token-1").await.unwrap();

    assert!(catalog.delete_account("u@x.com").await.unwrap());
    assert!(catalog.fetch_session("u@x.com").await.unwrap().is_none());

    // Second delete reports "nothing removed" without error.
    assert!(!catalog.delete_account("u@x.com").await.unwrap());
}

#[tokio::test]
async fn preferences_are_replaced_wholesale() {
    let catalog = InMemoryCatalog::new();
    catalog.create_account(account("u@x.com")).await.unwrap();

    let mut first = Preferences::new();
    first.insert("lang".to_string(), serde_json::json!("en"));
    assert!(catalog.update_preferences("u@x.com", first).await.unwrap());

    let mut second = Preferences::new();
    second.insert("theme".to_string(), serde_json::json!("dark"));
    assert!(catalog.update_preferences("u@x.com", second).await.unwrap());

    let stored = catalog.fetch_account("u@x.com").await.unwrap().unwrap();
    assert_eq!(stored.preferences.get("theme"), Some(&serde_json::json!("dark")));
    assert!(stored.preferences.get("lang").is_none(), "old keys must not be merged in");

    // A missing account reports failure with no mutation.
    assert!(!catalog.update_preferences("ghost@x.com", Preferences::new()).await.unwrap());
}

#[tokio::test]
async fn report_ranks_authors_by_comment_count() {
    let catalog = InMemoryCatalog::new();
    for _ in 0..5 {
        catalog.add_comment(comment_by("a@x.com")).await.unwrap();
    }
    for _ in 0..3 {
        catalog.add_comment(comment_by("b@x.com")).await.unwrap();
    }
    for _ in 0..3 {
        catalog.add_comment(comment_by("c@x.com")).await.unwrap();
    }

    let critics = catalog.most_active_commenters().await.unwrap();
    assert_eq!(critics.len(), 3);
    assert_eq!(critics[0], Critic { email: "a@x.com".to_string(), num_comments: 5 });

    // b and c tie at 3; their relative order is unspecified.
    let tied: Vec<&str> = critics[1..].iter().map(|c| c.email.as_str()).collect();
    assert!(tied.contains(&"b@x.com") && tied.contains(&"c@x.com"));
    assert!(critics[1..].iter().all(|c| c.num_comments == 3));
}

#[tokio::test]
async fn report_is_capped_and_counts_are_non_increasing() {
    let catalog = InMemoryCatalog::new();
    let total = 25 * 2 + 10; // 25 authors with 2 comments, one with 10
    for i in 0..25 {
        let email = format!("user{}@x.com", i);
        for _ in 0..2 {
            catalog.add_comment(comment_by(&email)).await.unwrap();
        }
    }
    for _ in 0..10 {
        catalog.add_comment(comment_by("busy@x.com")).await.unwrap();
    }

    let critics = catalog.most_active_commenters().await.unwrap();
    assert_eq!(critics.len(), 20);
    assert_eq!(critics[0].email, "busy@x.com");
    assert!(critics.windows(2).all(|w| w[0].num_comments >= w[1].num_comments));
    assert!(critics.iter().map(|c| c.num_comments).sum::<i64>() <= total);
}
