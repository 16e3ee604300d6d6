pub mod domain;
pub mod ports;

pub use domain::{Account, Comment, Critic, NewComment, Preferences, Session};
pub use ports::{
    AccountStore, CommentStore, ReportAggregator, SessionStore, StoreError, StoreResult,
};
