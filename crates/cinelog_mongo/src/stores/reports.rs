//! crates/cinelog_mongo/src/stores/reports.rs
//!
//! The "most active commenters" report: a grouping pipeline over the whole
//! comment set, read with majority durability so recent unacknowledged
//! writes cannot make repeated reports flap or undercount.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, Document};
use mongodb::options::{AggregateOptions, ReadConcern};
use mongodb::{Collection, Database};
use serde::Deserialize;

use cinelog_core::ports::ReportAggregator;
use cinelog_core::{Critic, StoreError, StoreResult};

use super::{read_err, COMMENTS_COLLECTION};

/// Size cap of the report: the top commenters become critics.
const CRITICS_LIMIT: i64 = 20;

/// Implements the `ReportAggregator` port over the `comments` collection.
#[derive(Clone)]
pub struct MongoReportAggregator {
    comments: Collection<Document>,
}

impl MongoReportAggregator {
    pub fn new(db: &Database) -> Self {
        Self {
            comments: db.collection(COMMENTS_COLLECTION),
        }
    }
}

/// One grouped row as the server returns it: the group key is the author
/// email, the accumulator is the comment count.
#[derive(Debug, Deserialize)]
struct CriticRow {
    #[serde(rename = "_id")]
    email: String,
    count: i64,
}

impl CriticRow {
    fn to_domain(self) -> Critic {
        Critic {
            email: self.email,
            num_comments: self.count,
        }
    }
}

/// Group by author email, sum one per comment, rank descending, cap the
/// list. No secondary sort key: tie order between equal counts is
/// whatever the server produces.
fn most_active_pipeline(limit: i64) -> Vec<Document> {
    vec![
        doc! { "$group": { "_id": "$email", "count": { "$sum": 1_i64 } } },
        doc! { "$sort": { "count": -1 } },
        doc! { "$limit": limit },
    ]
}

#[async_trait]
impl ReportAggregator for MongoReportAggregator {
    async fn most_active_commenters(&self) -> StoreResult<Vec<Critic>> {
        let options = AggregateOptions::builder()
            .read_concern(ReadConcern::majority())
            .build();

        let mut cursor = self
            .comments
            .aggregate(most_active_pipeline(CRITICS_LIMIT), options)
            .await
            .map_err(read_err)?;

        let mut critics = Vec::new();
        while let Some(row) = cursor.try_next().await.map_err(read_err)? {
            let row: CriticRow = bson::from_document(row)
                .map_err(|err| StoreError::Unexpected(err.to_string()))?;
            critics.push(row.to_domain());
        }
        tracing::debug!(critics = critics.len(), "most-active-commenters report computed");
        Ok(critics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_groups_sorts_and_caps() {
        let pipeline = most_active_pipeline(CRITICS_LIMIT);
        assert_eq!(pipeline.len(), 3);

        let group = pipeline[0].get_document("$group").unwrap();
        assert_eq!(group.get_str("_id").unwrap(), "$email");
        assert_eq!(
            group.get_document("count").unwrap().get_i64("$sum").unwrap(),
            1
        );

        let sort = pipeline[1].get_document("$sort").unwrap();
        assert_eq!(sort.get_i32("count").unwrap(), -1);

        assert_eq!(pipeline[2].get_i64("$limit").unwrap(), 20);
    }

    #[test]
    fn grouped_rows_decode_into_critics() {
        let row: CriticRow =
            bson::from_document(doc! { "_id": "a@x.com", "count": 5_i64 }).unwrap();
        let critic = row.to_domain();
        assert_eq!(critic.email, "a@x.com");
        assert_eq!(critic.num_comments, 5);
    }
}
