use std::{collections::HashSet, sync::Arc};

use chrono::Utc;
use uuid::Uuid;

use crate::{
    auth::require_owner_or_admin,
    errors::{AppError, AppResult, FieldError},
    models::{
        domain::{Assessment, Attempt, Caller},
        dto::{
            assessment_dto::PublicAssessment,
            request::{PaginationParams, SubmitAssessmentRequest},
            response::{
                AttemptSummary, EligibilityResponse, PaginatedAttempts, PaginationMetadata,
                SubmissionResponse,
            },
        },
    },
    repositories::AttemptRepository,
    services::{
        attempt_tracker::{AttemptTracker, Eligibility},
        enrollment_directory::{EnrollmentDirectory, EnrollmentStatus},
        keyed_lock::KeyedLocks,
        question_bank::QuestionBank,
        scoring::ScoringEngine,
    },
};

/// Runs the submission workflow: eligibility, grading, scoring and the
/// attempt write, with check-then-append serialized per (user, assessment).
pub struct AssessmentService {
    question_bank: Arc<QuestionBank>,
    tracker: AttemptTracker,
    attempts: Arc<dyn AttemptRepository>,
    directory: Arc<dyn EnrollmentDirectory>,
    locks: KeyedLocks,
}

impl AssessmentService {
    pub fn new(
        question_bank: Arc<QuestionBank>,
        attempts: Arc<dyn AttemptRepository>,
        directory: Arc<dyn EnrollmentDirectory>,
    ) -> Self {
        Self {
            question_bank,
            tracker: AttemptTracker::new(attempts.clone()),
            attempts,
            directory,
            locks: KeyedLocks::new(),
        }
    }

    /// Admins skip the directory entirely.
    pub async fn ensure_access(&self, caller: &Caller, course_id: &str) -> AppResult<()> {
        if caller.is_admin() {
            return Ok(());
        }

        match self
            .directory
            .enrollment_status(&caller.user_id, course_id)
            .await?
        {
            EnrollmentStatus::Enrolled => Ok(()),
            EnrollmentStatus::NotEnrolled => Err(AppError::Forbidden(format!(
                "Not enrolled in course '{}'",
                course_id
            ))),
            EnrollmentStatus::CourseNotFound => Err(AppError::NotFound(format!(
                "Course '{}' not found",
                course_id
            ))),
        }
    }

    pub async fn get_public_assessment(
        &self,
        caller: &Caller,
        assessment_id: &str,
    ) -> AppResult<PublicAssessment> {
        let assessment = self.question_bank.for_display(assessment_id).await?;
        self.ensure_access(caller, &assessment.course_id).await?;
        Ok(assessment)
    }

    pub async fn check_eligibility(
        &self,
        caller: &Caller,
        assessment_id: &str,
    ) -> AppResult<EligibilityResponse> {
        let assessment = self.question_bank.for_grading(assessment_id).await?;
        self.ensure_access(caller, &assessment.course_id).await?;

        let prior = self
            .tracker
            .prior_attempts(&caller.user_id, &assessment.id)
            .await?;
        let eligibility = AttemptTracker::evaluate(&prior, assessment.max_attempts);

        let (reason, attempt_number) = match eligibility {
            Eligibility::Allowed { attempt_number } => (None, Some(attempt_number)),
            Eligibility::Denied(reason) => (Some(reason.message().to_string()), None),
        };

        Ok(EligibilityResponse {
            assessment_id: assessment.id.clone(),
            allowed: eligibility.is_allowed(),
            reason,
            state: AttemptTracker::state(&prior, assessment.max_attempts),
            attempt_number,
            attempts_used: prior.len() as i16,
            max_attempts: assessment.max_attempts,
        })
    }

    pub async fn submit(
        &self,
        caller: &Caller,
        request: &SubmitAssessmentRequest,
    ) -> AppResult<SubmissionResponse> {
        request.check()?;

        let assessment = self
            .question_bank
            .for_grading(request.assessment_id.trim())
            .await?;
        self.ensure_access(caller, &assessment.course_id).await?;
        reject_unknown_questions(&assessment, request)?;

        let answers = request.submitted_answers();

        let _guard = self
            .locks
            .lock(&Attempt::lock_key(&caller.user_id, &assessment.id))
            .await;

        let eligibility = self.tracker.can_attempt(&caller.user_id, &assessment).await?;
        let attempt_number = eligibility
            .into_attempt_number(&assessment)
            .inspect_err(|err| {
                log::warn!(
                    "Rejected submission by user {} for assessment {}: {}",
                    caller.user_id,
                    assessment.id,
                    err
                );
            })?;

        let report = ScoringEngine::score(&assessment, &answers)?;

        let attempt = Attempt {
            id: Uuid::new_v4().to_string(),
            user_id: caller.user_id.clone(),
            assessment_id: assessment.id.clone(),
            course_id: assessment.course_id.clone(),
            attempt_number,
            answers,
            results: report.outcomes(),
            score: report.percentage,
            earned_points: report.earned_points,
            total_points: report.total_points,
            passed: report.passed,
            completed_at: Utc::now(),
        };

        let attempt = self.attempts.append_attempt(attempt).await.map_err(|err| match err {
            AppError::Conflict(detail) => {
                log::warn!(
                    "Concurrent submission by user {} for assessment {}: {}",
                    caller.user_id,
                    assessment.id,
                    detail
                );
                AppError::Conflict(
                    "Another submission for this assessment was recorded first, please retry"
                        .to_string(),
                )
            }
            other => other,
        })?;

        log::info!(
            "User {} attempt {}/{} on assessment {}: score {}% ({})",
            attempt.user_id,
            attempt.attempt_number,
            assessment.max_attempts,
            assessment.id,
            attempt.score,
            if attempt.passed { "passed" } else { "failed" }
        );

        Ok(SubmissionResponse {
            attempt_id: attempt.id,
            score: report.percentage,
            passed: report.passed,
            passing_score: assessment.passing_score,
            correct_answers: report.correct_count,
            total_questions: assessment.questions.len() as i32,
            earned_points: report.earned_points,
            total_points: report.total_points,
            attempt_number: attempt.attempt_number,
            max_attempts: assessment.max_attempts,
            can_retake: !report.passed && attempt.attempt_number < assessment.max_attempts,
            detailed_results: report.results,
        })
    }

    /// The caller's own history unless `user_id` names someone else, which
    /// only admins may do.
    pub async fn attempt_history(
        &self,
        caller: &Caller,
        assessment_id: &str,
        user_id: Option<&str>,
        pagination: &PaginationParams,
    ) -> AppResult<PaginatedAttempts> {
        let subject = user_id.unwrap_or(&caller.user_id);
        require_owner_or_admin(caller, subject)?;

        let assessment = self.question_bank.for_grading(assessment_id).await?;

        let offset = pagination.offset();
        let limit = pagination.limit();
        let (attempts, total) = self
            .attempts
            .list_user_attempts(subject, Some(&assessment.id), offset, limit)
            .await?;

        Ok(PaginatedAttempts {
            items: attempts.into_iter().map(AttemptSummary::from).collect(),
            pagination: PaginationMetadata::new(offset, limit, total),
        })
    }
}

fn reject_unknown_questions(
    assessment: &Assessment,
    request: &SubmitAssessmentRequest,
) -> AppResult<()> {
    let known: HashSet<&str> = assessment.questions.iter().map(|q| q.id.as_str()).collect();

    let fields: Vec<FieldError> = request
        .answers
        .iter()
        .enumerate()
        .filter(|(_, entry)| !known.contains(entry.question_id.trim()))
        .map(|(index, entry)| {
            FieldError::new(
                format!("answers[{index}].question_id"),
                format!(
                    "question '{}' is not part of this assessment",
                    entry.question_id.trim()
                ),
            )
        })
        .collect();

    if fields.is_empty() {
        Ok(())
    } else {
        Err(AppError::InvalidFields(fields))
    }
}
