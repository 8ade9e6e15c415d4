use async_graphql::Enum;
use serde::{Deserialize, Serialize};

use crate::constants::grading::DEFAULT_QUESTION_POINTS;

fn default_points() -> i32 {
    DEFAULT_QUESTION_POINTS
}

/// A graded item. The answer key lives in `kind` and never leaves the grading path.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
    #[serde(default = "default_points")]
    pub points: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// One variant per question type, each carrying only the data its scoring rule needs.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice {
        options: Vec<QuestionOption>,
    },
    TrueFalse {
        correct_answer: String,
    },
    ShortAnswer {
        correct_answer: String,
    },
    Essay {
        #[serde(default)]
        keywords: Vec<String>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    pub is_correct: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Enum)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
    Essay,
}

impl QuestionKind {
    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionKind::MultipleChoice { .. } => QuestionType::MultipleChoice,
            QuestionKind::TrueFalse { .. } => QuestionType::TrueFalse,
            QuestionKind::ShortAnswer { .. } => QuestionType::ShortAnswer,
            QuestionKind::Essay { .. } => QuestionType::Essay,
        }
    }
}

impl Question {
    pub fn question_type(&self) -> QuestionType {
        self.kind.question_type()
    }

    /// Human-readable answer key, shown only after a submission has been graded.
    pub fn answer_key(&self) -> Option<String> {
        match &self.kind {
            QuestionKind::MultipleChoice { options } => {
                let correct: Vec<&str> = options
                    .iter()
                    .filter(|o| o.is_correct)
                    .map(|o| o.text.as_str())
                    .collect();
                if correct.is_empty() {
                    None
                } else {
                    Some(correct.join(", "))
                }
            }
            QuestionKind::TrueFalse { correct_answer }
            | QuestionKind::ShortAnswer { correct_answer } => Some(correct_answer.clone()),
            QuestionKind::Essay { .. } => None,
        }
    }
}
