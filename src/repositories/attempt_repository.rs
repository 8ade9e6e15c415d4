use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Attempt,
};

/// Append-only log of graded attempts.
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// Every attempt by `user_id` on `assessment_id`, ordered by attempt number.
    async fn list_attempts(&self, user_id: &str, assessment_id: &str) -> AppResult<Vec<Attempt>>;

    /// Stores the attempt whole or not at all. A second attempt with the same
    /// `(user_id, assessment_id, attempt_number)` fails with `Conflict`.
    async fn append_attempt(&self, attempt: Attempt) -> AppResult<Attempt>;

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Attempt>>;

    /// Newest first, with the total count before paging.
    async fn list_user_attempts(
        &self,
        user_id: &str,
        assessment_id: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Attempt>, i64)>;
}

pub struct MongoAttemptRepository {
    collection: Collection<Attempt>,
}

impl MongoAttemptRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.get_collection(collection_name);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for attempts collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let attempt_number_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "assessment_id": 1, "attempt_number": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_assessment_attempt_unique".to_string())
                    .build(),
            )
            .build();

        let user_recent_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "completed_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("user_completed_at".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(attempt_number_index).await?;
        self.collection.create_index(user_recent_index).await?;

        log::info!("Successfully created indexes for attempts collection");
        Ok(())
    }
}

#[async_trait]
impl AttemptRepository for MongoAttemptRepository {
    async fn list_attempts(&self, user_id: &str, assessment_id: &str) -> AppResult<Vec<Attempt>> {
        let attempts = self
            .collection
            .find(doc! {
                "user_id": user_id,
                "assessment_id": assessment_id
            })
            .sort(doc! { "attempt_number": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(attempts)
    }

    async fn append_attempt(&self, attempt: Attempt) -> AppResult<Attempt> {
        match self.collection.insert_one(&attempt).await {
            Ok(_) => Ok(attempt),
            Err(err) if AppError::is_duplicate_key(&err) => Err(AppError::Conflict(format!(
                "Attempt {} for assessment '{}' was already recorded",
                attempt.attempt_number, attempt.assessment_id
            ))),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Attempt>> {
        let attempt = self.collection.find_one(doc! { "id": id }).await?;
        Ok(attempt)
    }

    async fn list_user_attempts(
        &self,
        user_id: &str,
        assessment_id: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Attempt>, i64)> {
        let mut filter = doc! { "user_id": user_id };

        if let Some(aid) = assessment_id {
            filter.insert("assessment_id", aid);
        }

        let total = self.collection.count_documents(filter.clone()).await?;

        let attempts = self
            .collection
            .find(filter)
            .skip(offset.max(0) as u64)
            .limit(limit)
            .sort(doc! { "completed_at": -1, "attempt_number": -1 })
            .await?
            .try_collect()
            .await?;

        Ok((attempts, total as i64))
    }
}
