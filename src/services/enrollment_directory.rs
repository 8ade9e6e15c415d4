use std::collections::HashSet;

use async_trait::async_trait;
use mongodb::{
    bson::{doc, Document},
    Collection,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::{
    db::Database,
    errors::{AppError, AppResult},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnrollmentStatus {
    Enrolled,
    NotEnrolled,
    CourseNotFound,
}

/// Answers whether a user may take assessments in a course.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentDirectory: Send + Sync {
    async fn enrollment_status(&self, user_id: &str, course_id: &str) -> AppResult<EnrollmentStatus>;
}

#[derive(Debug, Deserialize)]
struct EnrollmentLookup {
    course_exists: bool,
    enrolled: bool,
}

/// Asks the course service over HTTP:
/// `GET {base}/courses/{course_id}/enrollments/{user_id}`.
pub struct HttpEnrollmentDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpEnrollmentDirectory {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Ids are pushed as percent-encoded path segments, so a `/` or `?`
    /// inside an id cannot reshape the request.
    fn lookup_url(&self, user_id: &str, course_id: &str) -> AppResult<reqwest::Url> {
        let invalid_base = || {
            AppError::InternalError(format!(
                "Invalid enrollment directory url: {}",
                self.base_url
            ))
        };

        let mut url = reqwest::Url::parse(&self.base_url).map_err(|_| invalid_base())?;
        url.path_segments_mut()
            .map_err(|_| invalid_base())?
            .pop_if_empty()
            .extend(["courses", course_id, "enrollments", user_id]);
        Ok(url)
    }
}

#[async_trait]
impl EnrollmentDirectory for HttpEnrollmentDirectory {
    async fn enrollment_status(&self, user_id: &str, course_id: &str) -> AppResult<EnrollmentStatus> {
        let url = self.lookup_url(user_id, course_id)?;

        let response = self
            .client
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                log::error!("Enrollment directory request failed: {}", e);
                AppError::InternalError(format!("Enrollment lookup failed: {}", e))
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(EnrollmentStatus::CourseNotFound);
        }
        if !response.status().is_success() {
            return Err(AppError::InternalError(format!(
                "Enrollment directory returned status {}",
                response.status()
            )));
        }

        let lookup: EnrollmentLookup = response.json().await.map_err(|e| {
            log::error!("Failed to parse enrollment directory response: {}", e);
            AppError::InternalError(format!("Invalid enrollment lookup response: {}", e))
        })?;

        Ok(match (lookup.course_exists, lookup.enrolled) {
            (false, _) => EnrollmentStatus::CourseNotFound,
            (true, true) => EnrollmentStatus::Enrolled,
            (true, false) => EnrollmentStatus::NotEnrolled,
        })
    }
}

/// Reads the shared `courses` and `enrollments` collections.
pub struct MongoEnrollmentDirectory {
    courses: Collection<Document>,
    enrollments: Collection<Document>,
}

impl MongoEnrollmentDirectory {
    pub fn new(db: &Database, courses_collection: &str, enrollments_collection: &str) -> Self {
        Self {
            courses: db.get_collection(courses_collection),
            enrollments: db.get_collection(enrollments_collection),
        }
    }

    pub async fn enroll(&self, user_id: &str, course_id: &str) -> AppResult<()> {
        self.courses
            .update_one(
                doc! { "id": course_id },
                doc! { "$setOnInsert": { "id": course_id } },
            )
            .upsert(true)
            .await?;
        self.enrollments
            .update_one(
                doc! { "user_id": user_id, "course_id": course_id },
                doc! { "$setOnInsert": { "user_id": user_id, "course_id": course_id } },
            )
            .upsert(true)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl EnrollmentDirectory for MongoEnrollmentDirectory {
    async fn enrollment_status(&self, user_id: &str, course_id: &str) -> AppResult<EnrollmentStatus> {
        if self.courses.find_one(doc! { "id": course_id }).await?.is_none() {
            return Ok(EnrollmentStatus::CourseNotFound);
        }

        let enrolled = self
            .enrollments
            .find_one(doc! { "user_id": user_id, "course_id": course_id })
            .await?
            .is_some();

        Ok(if enrolled {
            EnrollmentStatus::Enrolled
        } else {
            EnrollmentStatus::NotEnrolled
        })
    }
}

#[derive(Default)]
pub struct InMemoryEnrollmentDirectory {
    courses: RwLock<HashSet<String>>,
    enrollments: RwLock<HashSet<(String, String)>>,
}

impl InMemoryEnrollmentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_course(&self, course_id: &str) {
        self.courses.write().await.insert(course_id.to_string());
    }

    pub async fn enroll(&self, user_id: &str, course_id: &str) {
        self.add_course(course_id).await;
        self.enrollments
            .write()
            .await
            .insert((user_id.to_string(), course_id.to_string()));
    }
}

#[async_trait]
impl EnrollmentDirectory for InMemoryEnrollmentDirectory {
    async fn enrollment_status(&self, user_id: &str, course_id: &str) -> AppResult<EnrollmentStatus> {
        if !self.courses.read().await.contains(course_id) {
            return Ok(EnrollmentStatus::CourseNotFound);
        }

        let key = (user_id.to_string(), course_id.to_string());
        Ok(if self.enrollments.read().await.contains(&key) {
            EnrollmentStatus::Enrolled
        } else {
            EnrollmentStatus::NotEnrolled
        })
    }
}
