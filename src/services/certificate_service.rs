use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    auth::require_owner_or_admin,
    errors::{AppError, AppResult, FieldError},
    models::{
        domain::{Assessment, Attempt, Caller, Certificate},
        dto::request::IssueCertificateRequest,
    },
    repositories::{AttemptRepository, CertificateRepository},
    services::{keyed_lock::KeyedLocks, question_bank::QuestionBank},
};

pub struct CertificateService {
    question_bank: Arc<QuestionBank>,
    attempts: Arc<dyn AttemptRepository>,
    certificates: Arc<dyn CertificateRepository>,
    locks: KeyedLocks,
}

impl CertificateService {
    pub fn new(
        question_bank: Arc<QuestionBank>,
        attempts: Arc<dyn AttemptRepository>,
        certificates: Arc<dyn CertificateRepository>,
    ) -> Self {
        Self {
            question_bank,
            attempts,
            certificates,
            locks: KeyedLocks::new(),
        }
    }

    /// Idempotent per (user, assessment): an existing certificate is returned
    /// unchanged, whatever name or attempt this call carries.
    pub async fn issue_certificate(
        &self,
        user_id: &str,
        assessment: &Assessment,
        attempt: &Attempt,
        student_name: &str,
    ) -> AppResult<Certificate> {
        if !attempt.passed {
            return Err(AppError::Forbidden(
                "A certificate requires a passing attempt".to_string(),
            ));
        }
        if attempt.user_id != user_id || attempt.assessment_id != assessment.id {
            return Err(AppError::Forbidden(
                "Attempt does not belong to this user and assessment".to_string(),
            ));
        }

        let student_name = student_name.trim();
        if student_name.is_empty() {
            return Err(AppError::InvalidFields(vec![FieldError::new(
                "student_name",
                "student_name must not be empty",
            )]));
        }

        let _guard = self
            .locks
            .lock(&Attempt::lock_key(user_id, &assessment.id))
            .await;

        if let Some(existing) = self
            .certificates
            .get_certificate(user_id, &assessment.id)
            .await?
        {
            log::info!(
                "Returning existing certificate {} for user {} on assessment {}",
                existing.id,
                user_id,
                assessment.id
            );
            return Ok(existing);
        }

        let certificate = Certificate {
            id: Certificate::deterministic_id(user_id, &assessment.id),
            user_id: user_id.to_string(),
            course_id: assessment.course_id.clone(),
            assessment_id: assessment.id.clone(),
            assessment_title: assessment.title.clone(),
            attempt_id: attempt.id.clone(),
            score: attempt.score,
            student_name: student_name.to_string(),
            issued_at: Utc::now(),
        };

        let (stored, created) = self.certificates.put_certificate(certificate).await?;
        if created {
            log::info!(
                "Issued certificate {} to user {} for assessment {} (score {}%)",
                stored.id,
                user_id,
                assessment.id,
                stored.score
            );
        } else {
            log::info!(
                "Certificate {} for user {} on assessment {} already existed",
                stored.id,
                user_id,
                assessment.id
            );
        }

        Ok(stored)
    }

    /// Issues from the caller's own passing attempt.
    pub async fn issue_for_caller(
        &self,
        caller: &Caller,
        assessment_id: &str,
        request: &IssueCertificateRequest,
    ) -> AppResult<Certificate> {
        let request = IssueCertificateRequest {
            student_name: request.student_name.trim().to_string(),
        };
        request.validate()?;

        let assessment = self.question_bank.for_grading(assessment_id).await?;

        let passing = self
            .attempts
            .list_attempts(&caller.user_id, &assessment.id)
            .await?
            .into_iter()
            .find(|a| a.passed)
            .ok_or_else(|| {
                AppError::Forbidden(format!(
                    "No passing attempt for assessment '{}'",
                    assessment.id
                ))
            })?;

        self.issue_certificate(&caller.user_id, &assessment, &passing, &request.student_name)
            .await
    }

    pub async fn get_certificate(&self, caller: &Caller, id: &str) -> AppResult<Certificate> {
        let certificate = self
            .certificates
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Certificate '{}' not found", id)))?;

        require_owner_or_admin(caller, &certificate.user_id)?;
        Ok(certificate)
    }

    pub async fn list_for_caller(&self, caller: &Caller) -> AppResult<Vec<Certificate>> {
        self.certificates.list_by_user(&caller.user_id).await
    }
}
