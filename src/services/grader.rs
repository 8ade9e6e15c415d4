//! Per-question grading. Pure functions: same question and answer, same verdict.

use crate::constants::grading::{ESSAY_MIN_CHARS, ESSAY_MIN_WORDS};
use crate::models::domain::{Question, QuestionKind, QuestionOption};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grade {
    pub is_correct: bool,
    pub points_awarded: i32,
}

impl Grade {
    fn incorrect() -> Self {
        Grade {
            is_correct: false,
            points_awarded: 0,
        }
    }

    fn verdict(is_correct: bool, points: i32) -> Self {
        if is_correct {
            Grade {
                is_correct: true,
                points_awarded: points,
            }
        } else {
            Self::incorrect()
        }
    }
}

/// Grade one answer. Missing or blank answers are always incorrect.
pub fn grade(question: &Question, answer: Option<&str>) -> Grade {
    let Some(answer) = answer.filter(|a| !a.trim().is_empty()) else {
        return Grade::incorrect();
    };

    let is_correct = match &question.kind {
        QuestionKind::MultipleChoice { options } => grade_multiple_choice(options, answer),
        QuestionKind::TrueFalse { correct_answer } => grade_true_false(correct_answer, answer),
        QuestionKind::ShortAnswer { correct_answer } => {
            grade_short_answer(correct_answer, answer)
        }
        // Keywords are stored with the question but not consulted.
        QuestionKind::Essay { .. } => grade_essay(answer),
    };

    Grade::verdict(is_correct, question.points)
}

/// Resolve the selected option by id first, then by 0-based index.
pub fn select_option<'a>(options: &'a [QuestionOption], answer: &str) -> Option<&'a QuestionOption> {
    let answer = answer.trim();

    options
        .iter()
        .find(|option| option.id.as_deref() == Some(answer))
        .or_else(|| {
            answer
                .parse::<usize>()
                .ok()
                .and_then(|index| options.get(index))
        })
}

fn grade_multiple_choice(options: &[QuestionOption], answer: &str) -> bool {
    select_option(options, answer).is_some_and(|option| option.is_correct)
}

fn grade_true_false(correct_answer: &str, answer: &str) -> bool {
    answer.to_lowercase() == correct_answer.to_lowercase()
}

fn grade_short_answer(correct_answer: &str, answer: &str) -> bool {
    answer.trim().to_lowercase() == correct_answer.trim().to_lowercase()
}

fn grade_essay(answer: &str) -> bool {
    let trimmed = answer.trim();
    trimmed.chars().count() >= ESSAY_MIN_CHARS
        && trimmed.split_whitespace().count() >= ESSAY_MIN_WORDS
}
