// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub quiz_id: i64,

    /// The text content of the question.
    pub text: String,

    /// Author-supplied ordering hint within the quiz.
    /// Mapped from the database column 'sort_order' since `order` is a reserved SQL keyword.
    #[sqlx(rename = "sort_order")]
    pub order: i32,

    /// Points awarded for a correct answer (at least 1).
    pub points: i32,

    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for adding a question to a quiz.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 5, message = "Question text must be at least 5 characters long"))]
    pub text: String,
    #[validate(range(min = 1, message = "Order must be at least 1"))]
    pub order: i32,
    #[validate(range(min = 1, message = "Points must be at least 1"))]
    pub points: Option<i32>,
}

impl CreateQuestionRequest {
    pub fn points_or_default(&self) -> i32 {
        self.points.unwrap_or(1)
    }
}
