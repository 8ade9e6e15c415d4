#[cfg(test)]
pub mod fixtures {
    use chrono::Utc;

    use crate::models::domain::{
        Assessment, Attempt, Question, QuestionKind, QuestionOption, QuestionOutcome,
        SubmittedAnswer,
    };

    /// Assessment "assessment-1" in "course-1", 30 minutes, 3 attempts.
    pub fn assessment_with(passing_score: i16, questions: Vec<Question>) -> Assessment {
        Assessment {
            id: "assessment-1".to_string(),
            title: "Rust Fundamentals".to_string(),
            course_id: "course-1".to_string(),
            time_limit: 30,
            passing_score,
            max_attempts: 3,
            questions,
            created_at: None,
        }
    }

    pub fn true_false(id: &str, correct: &str) -> Question {
        Question {
            id: id.to_string(),
            prompt: format!("Statement {id}"),
            kind: QuestionKind::TrueFalse {
                correct_answer: correct.to_string(),
            },
            points: 1,
            explanation: None,
        }
    }

    /// One question of each type, in the order mc, tf, sa, essay.
    pub fn mixed_assessment() -> Assessment {
        assessment_with(
            70,
            vec![
                Question {
                    id: "mc".to_string(),
                    prompt: "Capital of the United Kingdom?".to_string(),
                    kind: QuestionKind::MultipleChoice {
                        options: vec![
                            QuestionOption {
                                id: Some("paris".to_string()),
                                text: "Paris".to_string(),
                                is_correct: false,
                            },
                            QuestionOption {
                                id: Some("london".to_string()),
                                text: "London".to_string(),
                                is_correct: true,
                            },
                        ],
                    },
                    points: 2,
                    explanation: Some("London is the capital.".to_string()),
                },
                Question {
                    id: "tf".to_string(),
                    prompt: "Rust has a garbage collector.".to_string(),
                    kind: QuestionKind::TrueFalse {
                        correct_answer: "false".to_string(),
                    },
                    points: 1,
                    explanation: None,
                },
                Question {
                    id: "sa".to_string(),
                    prompt: "Keyword to declare an immutable binding?".to_string(),
                    kind: QuestionKind::ShortAnswer {
                        correct_answer: "let".to_string(),
                    },
                    points: 1,
                    explanation: None,
                },
                Question {
                    id: "essay".to_string(),
                    prompt: "Explain REST.".to_string(),
                    kind: QuestionKind::Essay {
                        keywords: vec!["stateless".to_string(), "resource".to_string()],
                    },
                    points: 3,
                    explanation: Some("Look for statelessness.".to_string()),
                },
            ],
        )
    }

    pub fn answers(pairs: &[(&str, &str)]) -> Vec<SubmittedAnswer> {
        pairs
            .iter()
            .map(|(question_id, answer)| SubmittedAnswer {
                question_id: question_id.to_string(),
                answer: answer.to_string(),
            })
            .collect()
    }

    pub fn attempt(user_id: &str, assessment_id: &str, attempt_number: i16, passed: bool) -> Attempt {
        Attempt {
            id: format!("attempt-{user_id}-{assessment_id}-{attempt_number}"),
            user_id: user_id.to_string(),
            assessment_id: assessment_id.to_string(),
            course_id: "course-1".to_string(),
            attempt_number,
            answers: answers(&[("q1", if passed { "true" } else { "false" })]),
            results: vec![QuestionOutcome {
                question_id: "q1".to_string(),
                is_correct: passed,
                points_awarded: i32::from(passed),
            }],
            score: if passed { 100 } else { 0 },
            earned_points: i32::from(passed),
            total_points: 1,
            passed,
            completed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
pub mod test_helpers {
    use std::sync::Arc;

    use actix_web::http::StatusCode;

    use crate::{
        app_state::AppState,
        auth::JwtService,
        config::Config,
        repositories::{
            AssessmentRepository, InMemoryAssessmentRepository, InMemoryAttemptRepository,
            InMemoryCertificateRepository,
        },
        services::enrollment_directory::InMemoryEnrollmentDirectory,
    };

    use super::fixtures::mixed_assessment;

    /// In-memory state holding `mixed_assessment()` with "user-1" enrolled in
    /// its course, plus a JWT service for minting bearer tokens.
    pub async fn seeded_state() -> (AppState, JwtService) {
        let config = Config::test_config();
        let jwt = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);

        let assessments = Arc::new(InMemoryAssessmentRepository::new());
        let assessment = mixed_assessment();
        let directory = InMemoryEnrollmentDirectory::new();
        directory.enroll("user-1", &assessment.course_id).await;
        assessments
            .upsert(assessment)
            .await
            .expect("seeding the in-memory store should work");

        let state = AppState::from_repositories(
            config,
            None,
            assessments,
            Arc::new(InMemoryAttemptRepository::new()),
            Arc::new(InMemoryCertificateRepository::new()),
            Arc::new(directory),
        );
        (state, jwt)
    }

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use validator::Validate;

    #[test]
    fn mixed_assessment_is_valid() {
        assert!(mixed_assessment().validate().is_ok());
    }

    #[test]
    fn attempt_fixture_matches_verdict() {
        let passed = attempt("u", "a", 1, true);
        assert!(passed.passed);
        assert_eq!(passed.score, 100);

        let failed = attempt("u", "a", 2, false);
        assert!(!failed.passed);
        assert_eq!(failed.earned_points, 0);
    }
}
