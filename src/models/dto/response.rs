use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{AssessmentState, Attempt, QuestionResult};

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct EligibilityResponse {
    pub assessment_id: String,
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub state: AssessmentState,
    /// Number the next attempt would receive, present only when allowed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt_number: Option<i16>,
    pub attempts_used: i16,
    pub max_attempts: i16,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct SubmissionResponse {
    pub attempt_id: String,
    pub score: i16,
    pub passed: bool,
    pub passing_score: i16,
    pub correct_answers: i32,
    pub total_questions: i32,
    pub earned_points: i32,
    pub total_points: i32,
    pub attempt_number: i16,
    pub max_attempts: i16,
    pub detailed_results: Vec<QuestionResult>,
    pub can_retake: bool,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct AttemptSummary {
    pub id: String,
    pub assessment_id: String,
    pub attempt_number: i16,
    pub score: i16,
    pub earned_points: i32,
    pub total_points: i32,
    pub passed: bool,
    pub completed_at: DateTime<Utc>,
}

impl From<Attempt> for AttemptSummary {
    fn from(attempt: Attempt) -> Self {
        AttemptSummary {
            id: attempt.id,
            assessment_id: attempt.assessment_id,
            attempt_number: attempt.attempt_number,
            score: attempt.score,
            earned_points: attempt.earned_points,
            total_points: attempt.total_points,
            passed: attempt.passed,
            completed_at: attempt.completed_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct PaginationMetadata {
    pub offset: i64,
    pub limit: i64,
    pub total: i64,
    pub has_more: bool,
}

impl PaginationMetadata {
    pub fn new(offset: i64, limit: i64, total: i64) -> Self {
        Self {
            offset,
            limit,
            total,
            has_more: offset + limit < total,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct PaginatedAttempts {
    pub items: Vec<AttemptSummary>,
    pub pagination: PaginationMetadata,
}
