// src/models/quiz.rs

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::{answer::Answer, question::Question};

/// Represents the 'quizzes' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Reference (usually a URL) to a cover image.
    pub cover_image: Option<String>,
    /// The user who created the quiz. Only this user may mutate it.
    pub owner_id: i64,
    pub is_published: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// A question together with all of its candidate answers.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionWithAnswers {
    #[serde(flatten)]
    pub question: Question,
    pub answers: Vec<Answer>,
}

/// The full quiz tree: quiz, its questions in author order, and their answers.
#[derive(Debug, Clone, Serialize)]
pub struct QuizWithQuestions {
    #[serde(flatten)]
    pub quiz: Quiz,
    pub questions: Vec<QuestionWithAnswers>,
}

/// DTO for creating a new quiz.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(
        min = 3,
        max = 255,
        message = "Title length must be between 3 and 255 characters."
    ))]
    pub title: String,

    #[validate(length(max = 1000, message = "Description must not exceed 1000 characters."))]
    pub description: Option<String>,

    #[validate(length(max = 500, message = "Cover image URL must not exceed 500 characters."))]
    pub cover_image: Option<String>,
}

/// DTO for updating a quiz. Absent fields are left untouched; an explicit
/// `null` clears `description` or `cover_image`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateQuizRequest {
    #[validate(length(min = 3, max = 255))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "present")]
    #[validate(length(max = 1000))]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    #[validate(length(max = 500))]
    pub cover_image: Option<Option<String>>,

    pub is_published: Option<bool>,
}

/// Maps a field that is present in the payload (even as `null`) to `Some`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Query parameters for listing quizzes.
#[derive(Debug, Deserialize)]
pub struct QuizListParams {
    /// Only return quizzes with this publication state.
    pub published: Option<bool>,
}
