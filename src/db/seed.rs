use serde::Deserialize;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::Assessment,
    repositories::AssessmentRepository,
};

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SeedEnrollment {
    pub user_id: String,
    pub course_id: String,
}

/// Contents of `SEED_FILE`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub assessments: Vec<Assessment>,
    #[serde(default)]
    pub enrollments: Vec<SeedEnrollment>,
}

impl SeedData {
    pub async fn load(path: &str) -> AppResult<Self> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::InternalError(format!("Failed to read seed file {}: {}", path, e))
        })?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> AppResult<Self> {
        let seed: SeedData = serde_json::from_str(raw)
            .map_err(|e| AppError::ValidationError(format!("Invalid seed file: {}", e)))?;
        seed.validate()?;
        Ok(seed)
    }

    /// Every assessment must pass the authoring rules before anything is written.
    pub fn validate(&self) -> AppResult<()> {
        for assessment in &self.assessments {
            assessment.validate().map_err(|errors| {
                AppError::ValidationError(format!(
                    "Seed assessment '{}' is invalid: {}",
                    assessment.id,
                    AppError::from(errors)
                ))
            })?;
        }
        Ok(())
    }

    /// Course ids referenced by assessments or enrollments, deduplicated.
    pub fn course_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .assessments
            .iter()
            .map(|a| a.course_id.clone())
            .chain(self.enrollments.iter().map(|e| e.course_id.clone()))
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    pub async fn apply_assessments(&self, repository: &dyn AssessmentRepository) -> AppResult<usize> {
        for assessment in &self.assessments {
            repository.upsert(assessment.clone()).await?;
        }
        log::info!("Seeded {} assessments", self.assessments.len());
        Ok(self.assessments.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::memory::InMemoryAssessmentRepository;

    const SEED: &str = r#"{
        "assessments": [{
            "id": "rust-101-final",
            "title": "Rust 101 Final",
            "course_id": "rust-101",
            "time_limit": 30,
            "passing_score": 80,
            "max_attempts": 3,
            "questions": [
                {"id": "q1", "type": "true_false", "prompt": "Rust has a GC", "correct_answer": "false"},
                {"id": "q2", "type": "multiple_choice", "prompt": "Pick", "points": 2,
                 "options": [{"text": "a", "is_correct": false}, {"text": "b", "is_correct": true}]}
            ]
        }],
        "enrollments": [{"user_id": "user-1", "course_id": "rust-101"}]
    }"#;

    #[test]
    fn parses_assessments_and_enrollments() {
        let seed = SeedData::parse(SEED).expect("seed should parse");

        assert_eq!(seed.assessments.len(), 1);
        assert_eq!(seed.assessments[0].total_points(), 3);
        assert_eq!(seed.enrollments[0].user_id, "user-1");
        assert_eq!(seed.course_ids(), vec!["rust-101".to_string()]);
    }

    #[test]
    fn rejects_out_of_range_settings() {
        let invalid = SEED.replace("\"max_attempts\": 3", "\"max_attempts\": 0");

        let result = SeedData::parse(&invalid);
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            SeedData::parse("{ not json"),
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn applies_assessments_to_repository() {
        let seed = SeedData::parse(SEED).unwrap();
        let repo = InMemoryAssessmentRepository::new();

        let count = seed.apply_assessments(&repo).await.unwrap();

        assert_eq!(count, 1);
        assert!(repo.find_by_id("rust-101-final").await.unwrap().is_some());
    }
}
