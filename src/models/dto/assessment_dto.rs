use async_graphql::SimpleObject;
use serde::Serialize;

use crate::models::domain::{Assessment, Question, QuestionKind, QuestionType};

/// Option as shown while taking an assessment. No correctness flag.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct PublicOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub index: i32,
    pub text: String,
}

/// Question as shown while taking an assessment. Carries no answer key:
/// there is no field here that could hold `is_correct`, `correct_answer`
/// or `keywords`.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct PublicQuestion {
    pub id: String,
    pub question_type: QuestionType,
    pub prompt: String,
    pub points: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<PublicOption>>,
}

impl From<&Question> for PublicQuestion {
    fn from(question: &Question) -> Self {
        let options = match &question.kind {
            QuestionKind::MultipleChoice { options } => Some(
                options
                    .iter()
                    .enumerate()
                    .map(|(index, option)| PublicOption {
                        id: option.id.clone(),
                        index: index as i32,
                        text: option.text.clone(),
                    })
                    .collect(),
            ),
            QuestionKind::TrueFalse { .. }
            | QuestionKind::ShortAnswer { .. }
            | QuestionKind::Essay { .. } => None,
        };

        PublicQuestion {
            id: question.id.clone(),
            question_type: question.question_type(),
            prompt: question.prompt.clone(),
            points: question.points,
            options,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct PublicAssessment {
    pub id: String,
    pub title: String,
    pub course_id: String,
    pub time_limit: i16,
    pub passing_score: i16,
    pub max_attempts: i16,
    pub total_points: i32,
    pub question_count: i32,
    pub questions: Vec<PublicQuestion>,
}

impl From<&Assessment> for PublicAssessment {
    fn from(assessment: &Assessment) -> Self {
        PublicAssessment {
            id: assessment.id.clone(),
            title: assessment.title.clone(),
            course_id: assessment.course_id.clone(),
            time_limit: assessment.time_limit,
            passing_score: assessment.passing_score,
            max_attempts: assessment.max_attempts,
            total_points: assessment.total_points(),
            question_count: assessment.questions.len() as i32,
            questions: assessment.questions.iter().map(PublicQuestion::from).collect(),
        }
    }
}
