// src/models/submission.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use validator::Validate;

/// Map of question id to the chosen answer id.
pub type AnswerMap = BTreeMap<i64, i64>;

/// Represents the 'submissions' table in the database.
/// Rows are append-only; they reference quiz and questions by id only.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub user_id: i64,
    pub quiz_id: i64,
    pub score: i64,
    pub total_questions: i32,
    pub correct_answers: i32,
    /// Seconds spent on the attempt, as reported by the client.
    pub time_spent: Option<i32>,
    pub answers: Json<AnswerMap>,
    pub completed_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A scored attempt ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub user_id: i64,
    pub quiz_id: i64,
    pub score: i64,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub time_spent: Option<i32>,
    pub answers: AnswerMap,
}

/// DTO for submitting a quiz attempt.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitQuizRequest {
    /// User's answers map.
    /// Key: Question ID
    /// Value: Selected Answer ID
    #[serde(default)]
    pub answers: AnswerMap,

    #[validate(range(min = 0, message = "Time spent cannot be negative"))]
    pub time_spent: Option<i32>,
}

/// Result of a submission: the score breakdown plus the stored record.
#[derive(Debug, Serialize)]
pub struct SubmitQuizResponse {
    pub score: i64,
    pub total_questions: i32,
    pub correct_answers: i32,
    /// Submitted keys that did not name a question of the quiz.
    pub ignored_questions: usize,
    pub submission: Submission,
}
