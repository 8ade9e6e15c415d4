use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Assessment, AssessmentState, Attempt},
    repositories::AttemptRepository,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DenialReason {
    AlreadyPassed,
    MaxAttemptsReached,
}

impl DenialReason {
    pub fn message(&self) -> &'static str {
        match self {
            DenialReason::AlreadyPassed => "already passed",
            DenialReason::MaxAttemptsReached => "max attempts reached",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Eligibility {
    /// Carries the 1-based number of the attempt about to be made.
    Allowed { attempt_number: i16 },
    Denied(DenialReason),
}

impl Eligibility {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Eligibility::Allowed { .. })
    }

    /// Turn a denial into the error a submission is rejected with.
    pub fn into_attempt_number(self, assessment: &Assessment) -> AppResult<i16> {
        match self {
            Eligibility::Allowed { attempt_number } => Ok(attempt_number),
            Eligibility::Denied(DenialReason::AlreadyPassed) => Err(AppError::AlreadyPassed(
                format!("Assessment '{}' has already been passed", assessment.id),
            )),
            Eligibility::Denied(DenialReason::MaxAttemptsReached) => {
                Err(AppError::AttemptsExhausted(format!(
                    "All {} attempts for assessment '{}' have been used",
                    assessment.max_attempts, assessment.id
                )))
            }
        }
    }
}

pub struct AttemptTracker {
    attempts: Arc<dyn AttemptRepository>,
}

impl AttemptTracker {
    pub fn new(attempts: Arc<dyn AttemptRepository>) -> Self {
        Self { attempts }
    }

    /// A pass short-circuits everything; otherwise the attempt count decides.
    pub fn evaluate(prior: &[Attempt], max_attempts: i16) -> Eligibility {
        if prior.iter().any(|a| a.passed) {
            return Eligibility::Denied(DenialReason::AlreadyPassed);
        }

        let used = prior.len() as i16;
        if used >= max_attempts {
            return Eligibility::Denied(DenialReason::MaxAttemptsReached);
        }

        Eligibility::Allowed {
            attempt_number: used + 1,
        }
    }

    pub fn state(prior: &[Attempt], max_attempts: i16) -> AssessmentState {
        if prior.is_empty() {
            AssessmentState::NotAttempted
        } else if prior.iter().any(|a| a.passed) {
            AssessmentState::Passed
        } else if (prior.len() as i16) < max_attempts {
            AssessmentState::FailedRetriable
        } else {
            AssessmentState::FailedExhausted
        }
    }

    pub async fn prior_attempts(
        &self,
        user_id: &str,
        assessment_id: &str,
    ) -> AppResult<Vec<Attempt>> {
        self.attempts.list_attempts(user_id, assessment_id).await
    }

    /// Callers that go on to append an attempt must hold the per-user,
    /// per-assessment lock across this check and the write.
    pub async fn can_attempt(&self, user_id: &str, assessment: &Assessment) -> AppResult<Eligibility> {
        let prior = self.prior_attempts(user_id, &assessment.id).await?;
        Ok(Self::evaluate(&prior, assessment.max_attempts))
    }
}
