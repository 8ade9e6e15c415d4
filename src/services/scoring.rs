//! Aggregates per-question grades into a percentage and a pass/fail verdict.

use std::collections::HashMap;

use crate::errors::{AppError, AppResult};
use crate::models::domain::{Assessment, QuestionOutcome, QuestionResult, SubmittedAnswer};
use crate::services::grader;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreReport {
    /// Rounded, always within 0..=100.
    pub percentage: i16,
    pub earned_points: i32,
    pub total_points: i32,
    pub passed: bool,
    pub correct_count: i32,
    pub results: Vec<QuestionResult>,
}

impl ScoreReport {
    pub fn outcomes(&self) -> Vec<QuestionOutcome> {
        self.results
            .iter()
            .map(|r| QuestionOutcome {
                question_id: r.question_id.clone(),
                is_correct: r.is_correct,
                points_awarded: r.points_awarded,
            })
            .collect()
    }
}

pub struct ScoringEngine;

impl ScoringEngine {
    /// Grade every question in assessment order. Unanswered questions still
    /// count toward `total_points`. Point totals that no longer fit in `i32`
    /// are reported as an internal error.
    pub fn score(assessment: &Assessment, answers: &[SubmittedAnswer]) -> AppResult<ScoreReport> {
        let by_question: HashMap<&str, &str> = answers
            .iter()
            .map(|a| (a.question_id.as_str(), a.answer.as_str()))
            .collect();

        let mut earned_points: i32 = 0;
        let mut total_points: i32 = 0;
        let mut correct_count = 0;
        let mut results = Vec::with_capacity(assessment.questions.len());

        for question in &assessment.questions {
            let submitted = by_question.get(question.id.as_str()).copied();
            let grade = grader::grade(question, submitted);

            total_points = total_points
                .checked_add(question.points)
                .ok_or_else(|| point_overflow(&assessment.id))?;
            earned_points = earned_points
                .checked_add(grade.points_awarded)
                .ok_or_else(|| point_overflow(&assessment.id))?;
            if grade.is_correct {
                correct_count += 1;
            }

            results.push(QuestionResult {
                question_id: question.id.clone(),
                question_type: question.question_type(),
                prompt: question.prompt.clone(),
                submitted_answer: submitted.map(str::to_string),
                is_correct: grade.is_correct,
                points_awarded: grade.points_awarded,
                points_possible: question.points,
                correct_answer: question.answer_key(),
                explanation: question.explanation.clone(),
            });
        }

        let percentage = percentage(earned_points, total_points);

        Ok(ScoreReport {
            percentage,
            earned_points,
            total_points,
            passed: total_points > 0 && percentage >= assessment.passing_score,
            correct_count,
            results,
        })
    }
}

fn point_overflow(assessment_id: &str) -> AppError {
    AppError::InternalError(format!(
        "Point total for assessment {} exceeds the supported range",
        assessment_id
    ))
}

/// `round(earned / total * 100)`, 0 when there is nothing to earn.
pub fn percentage(earned_points: i32, total_points: i32) -> i16 {
    if total_points <= 0 {
        return 0;
    }
    let raw = (f64::from(earned_points) / f64::from(total_points) * 100.0).round();
    raw.clamp(0.0, 100.0) as i16
}
