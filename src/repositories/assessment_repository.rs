use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::Assessment};

#[async_trait]
pub trait AssessmentRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Assessment>>;
    async fn upsert(&self, assessment: Assessment) -> AppResult<Assessment>;
}

pub struct MongoAssessmentRepository {
    collection: Collection<Assessment>,
}

impl MongoAssessmentRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.get_collection(collection_name);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for assessments collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let course_index = IndexModel::builder()
            .keys(doc! { "course_id": 1 })
            .options(IndexOptions::builder().name("course_id".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(course_index).await?;

        log::info!("Successfully created indexes for assessments collection");
        Ok(())
    }
}

#[async_trait]
impl AssessmentRepository for MongoAssessmentRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Assessment>> {
        let assessment = self.collection.find_one(doc! { "id": id }).await?;
        Ok(assessment)
    }

    async fn upsert(&self, assessment: Assessment) -> AppResult<Assessment> {
        self.collection
            .replace_one(doc! { "id": &assessment.id }, &assessment)
            .upsert(true)
            .await?;
        Ok(assessment)
    }
}
