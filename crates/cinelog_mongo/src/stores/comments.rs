//! crates/cinelog_mongo/src/stores/comments.rs
//!
//! The comment store. Every mutation filters on the (id, author email)
//! pair at once, so a caller cannot tell a missing comment from somebody
//! else's comment: both come back as `Ok(false)`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, doc};
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

use cinelog_core::ports::CommentStore;
use cinelog_core::{Comment, NewComment, StoreResult};

use super::{object_id, read_err, write_err, COMMENTS_COLLECTION};

/// Implements the `CommentStore` port over the `comments` collection.
#[derive(Clone)]
pub struct MongoCommentStore {
    comments: Collection<CommentDocument>,
}

impl MongoCommentStore {
    pub fn new(db: &Database) -> Self {
        Self {
            comments: db.collection(COMMENTS_COLLECTION),
        }
    }
}

/// The stored shape of a comment. Field names here are the reviewed
/// contract with the collection; keep them stable.
#[derive(Debug, Serialize, Deserialize)]
struct CommentDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    email: String,
    movie_id: ObjectId,
    text: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    date: DateTime<Utc>,
}

impl CommentDocument {
    fn to_domain(self) -> Comment {
        Comment {
            id: self.id.to_hex(),
            author_email: self.email,
            movie_id: self.movie_id.to_hex(),
            text: self.text,
            date: self.date,
        }
    }
}

#[async_trait]
impl CommentStore for MongoCommentStore {
    async fn add_comment(&self, comment: NewComment) -> StoreResult<Comment> {
        let document = CommentDocument {
            id: ObjectId::new(),
            email: comment.author_email,
            movie_id: object_id(&comment.movie_id)?,
            text: comment.text,
            date: Utc::now(),
        };
        self.comments
            .insert_one(&document, None)
            .await
            .map_err(write_err)?;
        Ok(document.to_domain())
    }

    async fn fetch_comment(&self, comment_id: &str) -> StoreResult<Option<Comment>> {
        let document = self
            .comments
            .find_one(doc! { "_id": object_id(comment_id)? }, None)
            .await
            .map_err(read_err)?;
        Ok(document.map(CommentDocument::to_domain))
    }

    async fn update_comment(
        &self,
        comment_id: &str,
        text: &str,
        author_email: &str,
    ) -> StoreResult<bool> {
        let filter = doc! { "_id": object_id(comment_id)?, "email": author_email };
        let update = doc! { "$set": { "text": text, "date": bson::DateTime::now() } };

        let result = self
            .comments
            .update_one(filter, update, None)
            .await
            .map_err(write_err)?;
        Ok(result.matched_count > 0)
    }

    async fn delete_comment(&self, comment_id: &str, author_email: &str) -> StoreResult<bool> {
        let filter = doc! { "_id": object_id(comment_id)?, "email": author_email };

        let result = self
            .comments
            .delete_one(filter, None)
            .await
            .map_err(write_err)?;
        Ok(result.deleted_count > 0)
    }
}
