// src/engine/mod.rs

//! Quiz domain engine.
//!
//! Composes the repository, the ownership guard, the scoring rules and the
//! leaderboard ranker into the operations exposed to the HTTP layer. The
//! engine holds no mutable state of its own; every call runs independently.

pub mod guard;
pub mod ranking;
pub mod scoring;

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{
        answer::{Answer, CreateAnswerRequest},
        leaderboard::{GlobalLeaderboardEntry, QuizLeaderboardEntry},
        question::{CreateQuestionRequest, Question},
        quiz::{CreateQuizRequest, QuestionWithAnswers, Quiz, QuizWithQuestions, UpdateQuizRequest},
        submission::{NewSubmission, SubmitQuizRequest, SubmitQuizResponse, Submission},
    },
    repository::QuizRepository,
};

pub use guard::{Actor, OwnershipGuard};
pub use ranking::{Ranked, clamp_limit};
pub use scoring::{ScoreCard, SubmissionPolicy, score_submission};

pub struct QuizEngine {
    repository: Arc<dyn QuizRepository>,
    guard: OwnershipGuard,
    policy: SubmissionPolicy,
}

impl QuizEngine {
    pub fn new(repository: Arc<dyn QuizRepository>, guard: OwnershipGuard, policy: SubmissionPolicy) -> Self {
        Self {
            repository,
            guard,
            policy,
        }
    }

    pub async fn create_quiz(&self, fields: CreateQuizRequest, actor: &Actor) -> AppResult<Quiz> {
        let quiz = self.repository.create_quiz(fields, actor.user_id).await?;
        tracing::info!("Quiz {} created by user {}", quiz.id, actor.user_id);
        Ok(quiz)
    }

    pub async fn get_quiz(&self, id: i64) -> AppResult<Quiz> {
        self.repository
            .get_quiz(id)
            .await?
            .ok_or(AppError::NotFound("Quiz not found".to_string()))
    }

    pub async fn list_quizzes(&self, published: Option<bool>) -> AppResult<Vec<Quiz>> {
        self.repository.list_quizzes(published).await
    }

    /// Loads the quiz, its questions in author order, then the answers of each question.
    pub async fn get_quiz_with_questions(&self, id: i64) -> AppResult<QuizWithQuestions> {
        let quiz = self.get_quiz(id).await?;

        let mut questions = Vec::new();
        for question in self.repository.list_questions(id).await? {
            let answers = self.repository.list_answers(question.id).await?;
            questions.push(QuestionWithAnswers { question, answers });
        }

        Ok(QuizWithQuestions { quiz, questions })
    }

    pub async fn update_quiz(&self, id: i64, changes: UpdateQuizRequest, actor: &Actor) -> AppResult<Quiz> {
        let quiz = self.get_quiz(id).await?;
        self.guard.authorize(actor, quiz.owner_id, "update")?;

        self.repository.update_quiz(id, changes).await
    }

    /// Removes the quiz; questions, answers and submissions go with it.
    pub async fn delete_quiz(&self, id: i64, actor: &Actor) -> AppResult<()> {
        let quiz = self.get_quiz(id).await?;
        self.guard.authorize(actor, quiz.owner_id, "delete")?;

        self.repository.delete_quiz(id).await?;
        tracing::info!("Quiz {} deleted by user {}", id, actor.user_id);
        Ok(())
    }

    pub async fn add_question(
        &self,
        quiz_id: i64,
        fields: CreateQuestionRequest,
        actor: &Actor,
    ) -> AppResult<Question> {
        let quiz = self.get_quiz(quiz_id).await?;
        self.guard.authorize(actor, quiz.owner_id, "add questions to")?;

        self.repository.add_question(quiz_id, fields).await
    }

    pub async fn add_answer(
        &self,
        question_id: i64,
        fields: CreateAnswerRequest,
        actor: &Actor,
    ) -> AppResult<Answer> {
        let question = self
            .repository
            .get_question(question_id)
            .await?
            .ok_or(AppError::NotFound("Question not found".to_string()))?;
        let quiz = self.get_quiz(question.quiz_id).await?;
        self.guard.authorize(actor, quiz.owner_id, "add answers to")?;

        self.repository.add_answer(question_id, fields).await
    }

    /// Scores an attempt, stores it and credits the score to the acting user.
    ///
    /// The submission row and the score credit are written in one repository
    /// transaction, so a failure leaves neither behind.
    pub async fn submit_quiz(
        &self,
        quiz_id: i64,
        request: SubmitQuizRequest,
        actor: &Actor,
    ) -> AppResult<SubmitQuizResponse> {
        let quiz = self.get_quiz_with_questions(quiz_id).await?;

        if !quiz.quiz.is_published {
            return Err(AppError::BadRequest("Quiz is not published yet".to_string()));
        }

        let card = score_submission(&quiz, &request.answers, self.policy)?;

        self.repository
            .get_user(actor.user_id)
            .await?
            .ok_or(AppError::NotFound("User not found".to_string()))?;

        let submission = self
            .repository
            .record_submission(NewSubmission {
                user_id: actor.user_id,
                quiz_id,
                score: card.score,
                total_questions: card.total_questions,
                correct_answers: card.correct_answers,
                time_spent: request.time_spent,
                answers: request.answers,
            })
            .await?;

        tracing::info!(
            "User {} scored {} on quiz {} ({}/{})",
            actor.user_id,
            card.score,
            quiz_id,
            card.correct_answers,
            card.total_questions
        );

        Ok(SubmitQuizResponse {
            score: card.score,
            total_questions: card.total_questions,
            correct_answers: card.correct_answers,
            ignored_questions: card.ignored_questions,
            submission,
        })
    }

    pub async fn get_user_submissions(&self, user_id: i64) -> AppResult<Vec<Submission>> {
        self.repository.list_submissions_by_user(user_id).await
    }

    pub async fn get_quiz_leaderboard(
        &self,
        quiz_id: i64,
        limit: Option<i64>,
    ) -> AppResult<Vec<Ranked<QuizLeaderboardEntry>>> {
        let limit = clamp_limit(limit);
        let entries = self.repository.quiz_leaderboard(quiz_id, limit).await?;
        Ok(ranking::rank_quiz_entries(entries, limit))
    }

    pub async fn get_global_leaderboard(
        &self,
        limit: Option<i64>,
    ) -> AppResult<Vec<Ranked<GlobalLeaderboardEntry>>> {
        let limit = clamp_limit(limit);
        let entries = self.repository.global_leaderboard(limit).await?;
        Ok(ranking::rank_global_entries(entries, limit))
    }
}
