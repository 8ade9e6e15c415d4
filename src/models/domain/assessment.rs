use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::constants::grading::{
    MAX_ATTEMPTS_CEILING, MAX_PASSING_SCORE, MAX_QUESTIONS, MAX_QUESTION_POINTS,
    MAX_TIME_LIMIT_MINUTES, MIN_ATTEMPTS, MIN_PASSING_SCORE, MIN_TIME_LIMIT_MINUTES,
};
use crate::models::domain::question::{Question, QuestionKind};

/// An assessment version. Immutable once published; authoring happens elsewhere.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct Assessment {
    #[validate(length(min = 1, message = "id must not be empty"))]
    pub id: String,
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "course_id must not be empty"))]
    pub course_id: String,
    /// Minutes.
    #[validate(range(
        min = MIN_TIME_LIMIT_MINUTES,
        max = MAX_TIME_LIMIT_MINUTES,
        message = "time_limit must be between 5 and 180 minutes"
    ))]
    pub time_limit: i16,
    /// Percentage of total points, not an absolute point value.
    #[validate(range(
        min = MIN_PASSING_SCORE,
        max = MAX_PASSING_SCORE,
        message = "passing_score must be between 0 and 100"
    ))]
    pub passing_score: i16,
    #[validate(range(
        min = MIN_ATTEMPTS,
        max = MAX_ATTEMPTS_CEILING,
        message = "max_attempts must be between 1 and 10"
    ))]
    pub max_attempts: i16,
    #[validate(custom(function = validate_questions))]
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn validate_questions(questions: &[Question]) -> Result<(), ValidationError> {
    if questions.len() > MAX_QUESTIONS {
        return Err(ValidationError::new("too_many_questions"));
    }

    let mut seen = HashSet::new();
    for question in questions {
        if question.id.trim().is_empty() {
            return Err(ValidationError::new("question_id_empty"));
        }
        if !seen.insert(question.id.as_str()) {
            return Err(ValidationError::new("question_id_duplicate"));
        }
        if question.points < 1 {
            return Err(ValidationError::new("question_points_not_positive"));
        }
        if question.points > MAX_QUESTION_POINTS {
            return Err(ValidationError::new("question_points_too_large"));
        }
        if let QuestionKind::MultipleChoice { options } = &question.kind {
            if options.is_empty() {
                return Err(ValidationError::new("multiple_choice_without_options"));
            }
        }
    }
    Ok(())
}

impl Assessment {
    /// Sum of all question weights, answered or not. Saturates instead of
    /// wrapping for assessments that never went through validation.
    pub fn total_points(&self) -> i32 {
        self.questions
            .iter()
            .fold(0i32, |total, q| total.saturating_add(q.points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::question::QuestionOption;

    fn question(id: &str, points: i32) -> Question {
        Question {
            id: id.to_string(),
            prompt: format!("Prompt {id}"),
            kind: QuestionKind::TrueFalse { correct_answer: "true".to_string() },
            points,
            explanation: None,
        }
    }

    fn assessment(questions: Vec<Question>) -> Assessment {
        Assessment {
            id: "a1".to_string(),
            title: "Basics".to_string(),
            course_id: "c1".to_string(),
            time_limit: 30,
            passing_score: 80,
            max_attempts: 3,
            questions,
            created_at: None,
        }
    }

    #[test]
    fn total_points_sums_weights() {
        let a = assessment(vec![question("q1", 1), question("q2", 3)]);
        assert_eq!(a.total_points(), 4);
    }

    #[test]
    fn valid_assessment_passes_validation() {
        assert!(assessment(vec![question("q1", 1)]).validate().is_ok());
    }

    #[test]
    fn out_of_range_settings_are_rejected() {
        let mut a = assessment(vec![question("q1", 1)]);
        a.max_attempts = 0;
        assert!(a.validate().is_err());

        let mut a = assessment(vec![question("q1", 1)]);
        a.passing_score = 101;
        assert!(a.validate().is_err());

        let mut a = assessment(vec![question("q1", 1)]);
        a.time_limit = 4;
        assert!(a.validate().is_err());
    }

    #[test]
    fn duplicate_question_ids_are_rejected() {
        let a = assessment(vec![question("q1", 1), question("q1", 1)]);
        assert!(a.validate().is_err());
    }

    #[test]
    fn non_positive_points_are_rejected() {
        let a = assessment(vec![question("q1", 0)]);
        assert!(a.validate().is_err());
    }

    #[test]
    fn oversized_points_are_rejected() {
        assert!(assessment(vec![question("q1", MAX_QUESTION_POINTS)]).validate().is_ok());

        let a = assessment(vec![
            question("q1", 1_500_000_000),
            question("q2", 1_500_000_000),
        ]);
        assert!(a.validate().is_err());
    }

    #[test]
    fn total_points_saturates_on_unvalidated_weights() {
        let a = assessment(vec![question("q1", i32::MAX), question("q2", i32::MAX)]);
        assert_eq!(a.total_points(), i32::MAX);
    }

    #[test]
    fn multiple_choice_requires_options() {
        let mut q = question("q1", 1);
        q.kind = QuestionKind::MultipleChoice { options: vec![] };
        assert!(assessment(vec![q.clone()]).validate().is_err());

        q.kind = QuestionKind::MultipleChoice {
            options: vec![QuestionOption { id: None, text: "A".to_string(), is_correct: true }],
        };
        assert!(assessment(vec![q]).validate().is_ok());
    }
}
