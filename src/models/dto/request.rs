use std::collections::HashSet;

use async_graphql::InputObject;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::grading::MAX_STUDENT_NAME_CHARS;
use crate::errors::{AppError, AppResult, FieldError};
use crate::models::domain::SubmittedAnswer;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, InputObject)]
pub struct AnswerInput {
    pub question_id: String,
    /// Option id or 0-based option index for multiple choice, free text otherwise.
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, InputObject)]
pub struct SubmitAssessmentRequest {
    #[validate(length(min = 1, message = "assessment_id must not be empty"))]
    pub assessment_id: String,

    #[validate(length(min = 1, message = "at least one answer is required"))]
    pub answers: Vec<AnswerInput>,
}

impl SubmitAssessmentRequest {
    /// Shape checks that need no assessment: required fields, non-empty
    /// entries, no question answered twice. Every problem is reported at once.
    pub fn check(&self) -> AppResult<()> {
        let mut fields = match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => match AppError::from(errors) {
                AppError::InvalidFields(fields) => fields,
                other => return Err(other),
            },
        };

        let mut seen = HashSet::new();
        for (index, entry) in self.answers.iter().enumerate() {
            let question_id = entry.question_id.trim();
            if question_id.is_empty() {
                fields.push(FieldError::new(
                    format!("answers[{index}].question_id"),
                    "question_id must not be empty",
                ));
            } else if !seen.insert(question_id) {
                fields.push(FieldError::new(
                    format!("answers[{index}].question_id"),
                    format!("question '{question_id}' is answered more than once"),
                ));
            }
            if entry.answer.trim().is_empty() {
                fields.push(FieldError::new(
                    format!("answers[{index}].answer"),
                    "answer must not be empty",
                ));
            }
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(AppError::InvalidFields(fields))
        }
    }

    pub fn submitted_answers(&self) -> Vec<SubmittedAnswer> {
        self.answers
            .iter()
            .map(|entry| SubmittedAnswer {
                question_id: entry.question_id.trim().to_string(),
                answer: entry.answer.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, InputObject)]
pub struct IssueCertificateRequest {
    #[validate(length(
        min = 1,
        max = MAX_STUDENT_NAME_CHARS,
        message = "student_name must be 1-100 characters"
    ))]
    pub student_name: String,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct PaginationParams {
    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            offset: Some(0),
            limit: Some(20),
        }
    }
}

impl PaginationParams {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}
