//! Process-local repositories over `tokio::sync::RwLock<HashMap<..>>`.
//! They enforce the same uniqueness rules as the MongoDB indexes.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Assessment, Attempt, Certificate},
    repositories::{AssessmentRepository, AttemptRepository, CertificateRepository},
};

#[derive(Default)]
pub struct InMemoryAssessmentRepository {
    assessments: Arc<RwLock<HashMap<String, Assessment>>>,
}

impl InMemoryAssessmentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssessmentRepository for InMemoryAssessmentRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Assessment>> {
        let assessments = self.assessments.read().await;
        Ok(assessments.get(id).cloned())
    }

    async fn upsert(&self, assessment: Assessment) -> AppResult<Assessment> {
        let mut assessments = self.assessments.write().await;
        assessments.insert(assessment.id.clone(), assessment.clone());
        Ok(assessment)
    }
}

#[derive(Default)]
pub struct InMemoryAttemptRepository {
    attempts: Arc<RwLock<HashMap<String, Attempt>>>,
}

impl InMemoryAttemptRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttemptRepository for InMemoryAttemptRepository {
    async fn list_attempts(&self, user_id: &str, assessment_id: &str) -> AppResult<Vec<Attempt>> {
        let attempts = self.attempts.read().await;
        let mut items: Vec<Attempt> = attempts
            .values()
            .filter(|a| a.user_id == user_id && a.assessment_id == assessment_id)
            .cloned()
            .collect();
        items.sort_by_key(|a| a.attempt_number);
        Ok(items)
    }

    async fn append_attempt(&self, attempt: Attempt) -> AppResult<Attempt> {
        let mut attempts = self.attempts.write().await;

        if attempts.contains_key(&attempt.id) {
            return Err(AppError::Conflict(format!(
                "Attempt '{}' already exists",
                attempt.id
            )));
        }

        let taken = attempts.values().any(|existing| {
            existing.user_id == attempt.user_id
                && existing.assessment_id == attempt.assessment_id
                && existing.attempt_number == attempt.attempt_number
        });
        if taken {
            return Err(AppError::Conflict(format!(
                "Attempt {} for assessment '{}' was already recorded",
                attempt.attempt_number, attempt.assessment_id
            )));
        }

        attempts.insert(attempt.id.clone(), attempt.clone());
        Ok(attempt)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Attempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts.get(id).cloned())
    }

    async fn list_user_attempts(
        &self,
        user_id: &str,
        assessment_id: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Attempt>, i64)> {
        let attempts = self.attempts.read().await;
        let mut items: Vec<Attempt> = attempts
            .values()
            .filter(|a| a.user_id == user_id)
            .filter(|a| assessment_id.map_or(true, |aid| a.assessment_id == aid))
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            b.completed_at
                .cmp(&a.completed_at)
                .then(b.attempt_number.cmp(&a.attempt_number))
        });

        let total = items.len() as i64;
        let page = items
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();

        Ok((page, total))
    }
}

#[derive(Default)]
pub struct InMemoryCertificateRepository {
    certificates: Arc<RwLock<HashMap<String, Certificate>>>,
}

impl InMemoryCertificateRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CertificateRepository for InMemoryCertificateRepository {
    async fn get_certificate(
        &self,
        user_id: &str,
        assessment_id: &str,
    ) -> AppResult<Option<Certificate>> {
        let certificates = self.certificates.read().await;
        Ok(certificates
            .values()
            .find(|c| c.user_id == user_id && c.assessment_id == assessment_id)
            .cloned())
    }

    async fn put_certificate(&self, certificate: Certificate) -> AppResult<(Certificate, bool)> {
        let mut certificates = self.certificates.write().await;

        let existing = certificates
            .values()
            .find(|c| {
                c.user_id == certificate.user_id && c.assessment_id == certificate.assessment_id
            })
            .cloned();
        if let Some(existing) = existing {
            return Ok((existing, false));
        }

        if certificates.contains_key(&certificate.id) {
            return Err(AppError::Conflict(format!(
                "Certificate '{}' already exists",
                certificate.id
            )));
        }

        certificates.insert(certificate.id.clone(), certificate.clone());
        Ok((certificate, true))
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Certificate>> {
        let certificates = self.certificates.read().await;
        Ok(certificates.get(id).cloned())
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<Certificate>> {
        let certificates = self.certificates.read().await;
        let mut items: Vec<Certificate> = certificates
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        Ok(items)
    }
}
