use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_document},
    options::{IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Certificate,
};

#[async_trait]
pub trait CertificateRepository: Send + Sync {
    async fn get_certificate(
        &self,
        user_id: &str,
        assessment_id: &str,
    ) -> AppResult<Option<Certificate>>;

    /// Insert-if-absent keyed on `(user_id, assessment_id)`. Returns the stored
    /// certificate and whether this call created it.
    async fn put_certificate(&self, certificate: Certificate) -> AppResult<(Certificate, bool)>;

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Certificate>>;

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<Certificate>>;
}

pub struct MongoCertificateRepository {
    collection: Collection<Certificate>,
}

impl MongoCertificateRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.get_collection(collection_name);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for certificates collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let user_assessment_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "assessment_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_assessment_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(user_assessment_index).await?;

        log::info!("Successfully created indexes for certificates collection");
        Ok(())
    }
}

#[async_trait]
impl CertificateRepository for MongoCertificateRepository {
    async fn get_certificate(
        &self,
        user_id: &str,
        assessment_id: &str,
    ) -> AppResult<Option<Certificate>> {
        let certificate = self
            .collection
            .find_one(doc! {
                "user_id": user_id,
                "assessment_id": assessment_id
            })
            .await?;
        Ok(certificate)
    }

    async fn put_certificate(&self, certificate: Certificate) -> AppResult<(Certificate, bool)> {
        let filter = doc! {
            "user_id": &certificate.user_id,
            "assessment_id": &certificate.assessment_id
        };
        let update = doc! { "$setOnInsert": to_document(&certificate)? };

        let stored = match self
            .collection
            .find_one_and_update(filter.clone(), update)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
        {
            Ok(stored) => stored,
            // Two upserts raced on the unique index; the winner's document is there now.
            Err(err) if AppError::is_duplicate_key(&err) => {
                self.collection.find_one(filter).await?
            }
            Err(err) => return Err(err.into()),
        };

        let stored = stored.ok_or_else(|| {
            AppError::InternalError(format!(
                "Certificate for assessment '{}' missing after upsert",
                certificate.assessment_id
            ))
        })?;

        let created = stored == certificate;
        Ok((stored, created))
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Certificate>> {
        let certificate = self.collection.find_one(doc! { "id": id }).await?;
        Ok(certificate)
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<Certificate>> {
        let certificates = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "issued_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(certificates)
    }
}
