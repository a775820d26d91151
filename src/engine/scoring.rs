// src/engine/scoring.rs

use std::collections::HashSet;

use serde::Serialize;

use crate::{
    error::AppError,
    models::{quiz::QuizWithQuestions, submission::AnswerMap},
};

/// How to treat submitted keys that are not questions of the quiz.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionPolicy {
    /// Skip them; they contribute nothing.
    #[default]
    Ignore,
    /// Reject the whole submission with `BadRequest`.
    Strict,
}

/// Outcome of scoring one submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreCard {
    pub score: i64,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub ignored_questions: usize,
}

/// Scores `answers` against the authoritative quiz tree.
///
/// Every question of the quiz is visited. A question counts as correct when the
/// chosen answer id belongs to that question and is flagged correct; unanswered
/// questions and ids that match no answer of the question score nothing.
/// Questions with several correct answers accept any one of them.
pub fn score_submission(
    quiz: &QuizWithQuestions,
    answers: &AnswerMap,
    policy: SubmissionPolicy,
) -> Result<ScoreCard, AppError> {
    let known: HashSet<i64> = quiz.questions.iter().map(|q| q.question.id).collect();
    let unknown: Vec<i64> = answers
        .keys()
        .filter(|id| !known.contains(id))
        .copied()
        .collect();

    if policy == SubmissionPolicy::Strict && !unknown.is_empty() {
        return Err(AppError::BadRequest(format!(
            "Answers reference questions outside this quiz: {:?}",
            unknown
        )));
    }

    let mut card = ScoreCard {
        total_questions: quiz.questions.len() as i32,
        ignored_questions: unknown.len(),
        ..ScoreCard::default()
    };

    for entry in &quiz.questions {
        let Some(chosen) = answers.get(&entry.question.id) else {
            continue;
        };

        let correct = entry
            .answers
            .iter()
            .find(|a| a.id == *chosen)
            .is_some_and(|a| a.is_correct);

        if correct {
            card.correct_answers += 1;
            card.score += i64::from(entry.question.points);
        }
    }

    Ok(card)
}
