use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::question::QuestionType;

/// One graded submission. Written once, never updated or deleted.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Attempt {
    pub id: String,
    pub user_id: String,
    pub assessment_id: String,
    pub course_id: String,
    /// 1-based, unique per (user_id, assessment_id).
    pub attempt_number: i16,
    pub answers: Vec<SubmittedAnswer>,
    pub results: Vec<QuestionOutcome>,
    /// Rounded percentage, 0-100.
    pub score: i16,
    pub earned_points: i32,
    pub total_points: i32,
    pub passed: bool,
    pub completed_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubmittedAnswer {
    pub question_id: String,
    pub answer: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionOutcome {
    pub question_id: String,
    pub is_correct: bool,
    pub points_awarded: i32,
}

/// Post-submission breakdown for one question, including the answer key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, SimpleObject)]
pub struct QuestionResult {
    pub question_id: String,
    pub question_type: QuestionType,
    pub prompt: String,
    pub submitted_answer: Option<String>,
    pub is_correct: bool,
    pub points_awarded: i32,
    pub points_possible: i32,
    pub correct_answer: Option<String>,
    pub explanation: Option<String>,
}

/// Where a user stands on one assessment. `InProgress` only exists while a
/// submission is being graded and is never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Enum)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentState {
    NotAttempted,
    Passed,
    FailedRetriable,
    FailedExhausted,
}

impl Attempt {
    pub fn lock_key(user_id: &str, assessment_id: &str) -> String {
        format!("{user_id}\u{1f}{assessment_id}")
    }
}
