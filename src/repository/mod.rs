// src/repository/mod.rs

//! Data-access contracts used by the quiz engine.
//!
//! Every method is a single atomic interaction with the store. Cascading
//! deletes (quiz -> questions -> answers, quiz -> submissions) are the
//! store's responsibility.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{
        answer::{Answer, CreateAnswerRequest},
        leaderboard::{GlobalLeaderboardEntry, QuizLeaderboardEntry},
        question::{CreateQuestionRequest, Question},
        quiz::{CreateQuizRequest, Quiz, UpdateQuizRequest},
        submission::{NewSubmission, Submission},
        user::User,
    },
};

pub use memory::InMemoryRepository;
pub use postgres::PgRepository;

#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn create_quiz(&self, fields: CreateQuizRequest, owner_id: i64) -> AppResult<Quiz>;
    async fn get_quiz(&self, id: i64) -> AppResult<Option<Quiz>>;
    /// Newest first. `None` returns quizzes in either publication state.
    async fn list_quizzes(&self, published: Option<bool>) -> AppResult<Vec<Quiz>>;
    /// Applies the present fields and refreshes `updated_at`.
    async fn update_quiz(&self, id: i64, changes: UpdateQuizRequest) -> AppResult<Quiz>;
    async fn delete_quiz(&self, id: i64) -> AppResult<()>;

    async fn add_question(&self, quiz_id: i64, fields: CreateQuestionRequest) -> AppResult<Question>;
    async fn get_question(&self, id: i64) -> AppResult<Option<Question>>;
    /// Ascending by the author-supplied order.
    async fn list_questions(&self, quiz_id: i64) -> AppResult<Vec<Question>>;

    async fn add_answer(&self, question_id: i64, fields: CreateAnswerRequest) -> AppResult<Answer>;
    async fn list_answers(&self, question_id: i64) -> AppResult<Vec<Answer>>;

    async fn create_submission(&self, submission: NewSubmission) -> AppResult<Submission>;
    /// Inserts the submission and credits its score to the user in one transaction.
    async fn record_submission(&self, submission: NewSubmission) -> AppResult<Submission>;
    /// Most recently completed first.
    async fn list_submissions_by_user(&self, user_id: i64) -> AppResult<Vec<Submission>>;

    /// Submissions of one quiz, best score first, at most `limit` rows.
    async fn quiz_leaderboard(&self, quiz_id: i64, limit: i64) -> AppResult<Vec<QuizLeaderboardEntry>>;
    /// Users by cumulative score, at most `limit` rows.
    async fn global_leaderboard(&self, limit: i64) -> AppResult<Vec<GlobalLeaderboardEntry>>;

    async fn get_user(&self, id: i64) -> AppResult<Option<User>>;
    async fn increment_user_score(&self, user_id: i64, delta: i64) -> AppResult<User>;
}

/// Account storage used by the identity endpoints.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn create_user(&self, email: &str, password_hash: &str, role: &str) -> AppResult<User>;
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_user_by_id(&self, id: i64) -> AppResult<Option<User>>;
}
