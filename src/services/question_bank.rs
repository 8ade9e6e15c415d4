use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::Assessment,
        dto::assessment_dto::{PublicAssessment, PublicQuestion},
    },
    repositories::AssessmentRepository,
};

/// Read-only access to authored assessments. The display path only ever
/// hands out redacted views; the full answer key stays on the grading path.
pub struct QuestionBank {
    repository: Arc<dyn AssessmentRepository>,
}

impl QuestionBank {
    pub fn new(repository: Arc<dyn AssessmentRepository>) -> Self {
        Self { repository }
    }

    /// Full assessment including answer keys. Grading only.
    pub async fn for_grading(&self, assessment_id: &str) -> AppResult<Assessment> {
        self.repository
            .find_by_id(assessment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Assessment '{}' not found", assessment_id)))
    }

    pub async fn for_display(&self, assessment_id: &str) -> AppResult<PublicAssessment> {
        let assessment = self.for_grading(assessment_id).await?;
        Ok(PublicAssessment::from(&assessment))
    }

    /// Questions in authored order, redacted.
    pub async fn get_questions(&self, assessment_id: &str) -> AppResult<Vec<PublicQuestion>> {
        Ok(self.for_display(assessment_id).await?.questions)
    }
}
