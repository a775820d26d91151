// src/repository/memory.rs

use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{
        answer::{Answer, CreateAnswerRequest},
        leaderboard::{GlobalLeaderboardEntry, QuizLeaderboardEntry},
        question::{CreateQuestionRequest, Question},
        quiz::{CreateQuizRequest, Quiz, UpdateQuizRequest},
        submission::{NewSubmission, Submission},
        user::User,
    },
    repository::{QuizRepository, UserRepository},
};

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: BTreeMap<i64, User>,
    quizzes: BTreeMap<i64, Quiz>,
    questions: BTreeMap<i64, Question>,
    answers: BTreeMap<i64, Answer>,
    submissions: BTreeMap<i64, Submission>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn insert_submission(&mut self, submission: NewSubmission) -> Submission {
        let now = Utc::now();
        let stored = Submission {
            id: self.next_id(),
            user_id: submission.user_id,
            quiz_id: submission.quiz_id,
            score: submission.score,
            total_questions: submission.total_questions,
            correct_answers: submission.correct_answers,
            time_spent: submission.time_spent,
            answers: Json(submission.answers),
            completed_at: now,
            created_at: now,
        };
        self.submissions.insert(stored.id, stored.clone());
        stored
    }
}

/// Process-local repository with the same semantics as the Postgres one,
/// including cascading deletes. Used for tests and local demos.
///
/// `fail_score_credits` simulates the store failing on the user score update.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<RwLock<Tables>>,
    fail_score_credits: Arc<AtomicBool>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent score credit fail with an infrastructure error.
    pub fn fail_score_credits(&self, fail: bool) {
        self.fail_score_credits.store(fail, Ordering::SeqCst);
    }

    pub async fn question_count(&self, quiz_id: i64) -> usize {
        let tables = self.tables.read().await;
        tables.questions.values().filter(|q| q.quiz_id == quiz_id).count()
    }

    pub async fn answer_count(&self) -> usize {
        self.tables.read().await.answers.len()
    }

    pub async fn submission_count(&self, quiz_id: i64) -> usize {
        let tables = self.tables.read().await;
        tables.submissions.values().filter(|s| s.quiz_id == quiz_id).count()
    }

    fn credit_failure(&self) -> Option<AppError> {
        self.fail_score_credits
            .load(Ordering::SeqCst)
            .then(|| AppError::InternalServerError("simulated store failure".to_string()))
    }
}

#[async_trait]
impl QuizRepository for InMemoryRepository {
    async fn create_quiz(&self, fields: CreateQuizRequest, owner_id: i64) -> AppResult<Quiz> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&owner_id) {
            return Err(AppError::InternalServerError(
                "foreign key violation: quizzes.owner_id".to_string(),
            ));
        }

        let now = Utc::now();
        let quiz = Quiz {
            id: tables.next_id(),
            title: fields.title,
            description: fields.description,
            cover_image: fields.cover_image,
            owner_id,
            is_published: false,
            created_at: now,
            updated_at: now,
        };
        tables.quizzes.insert(quiz.id, quiz.clone());
        Ok(quiz)
    }

    async fn get_quiz(&self, id: i64) -> AppResult<Option<Quiz>> {
        Ok(self.tables.read().await.quizzes.get(&id).cloned())
    }

    async fn list_quizzes(&self, published: Option<bool>) -> AppResult<Vec<Quiz>> {
        let tables = self.tables.read().await;
        let mut quizzes: Vec<Quiz> = tables
            .quizzes
            .values()
            .filter(|q| published.is_none_or(|p| q.is_published == p))
            .cloned()
            .collect();
        quizzes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(quizzes)
    }

    async fn update_quiz(&self, id: i64, changes: UpdateQuizRequest) -> AppResult<Quiz> {
        let mut tables = self.tables.write().await;
        let quiz = tables
            .quizzes
            .get_mut(&id)
            .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

        if let Some(title) = changes.title {
            quiz.title = title;
        }
        if let Some(description) = changes.description {
            quiz.description = description;
        }
        if let Some(cover_image) = changes.cover_image {
            quiz.cover_image = cover_image;
        }
        if let Some(is_published) = changes.is_published {
            quiz.is_published = is_published;
        }
        quiz.updated_at = Utc::now();

        Ok(quiz.clone())
    }

    async fn delete_quiz(&self, id: i64) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables.quizzes.remove(&id).is_none() {
            return Err(AppError::NotFound("Quiz not found".to_string()));
        }

        let question_ids: Vec<i64> = tables
            .questions
            .values()
            .filter(|q| q.quiz_id == id)
            .map(|q| q.id)
            .collect();
        tables.questions.retain(|_, q| q.quiz_id != id);
        tables.answers.retain(|_, a| !question_ids.contains(&a.question_id));
        tables.submissions.retain(|_, s| s.quiz_id != id);

        Ok(())
    }

    async fn add_question(&self, quiz_id: i64, fields: CreateQuestionRequest) -> AppResult<Question> {
        let mut tables = self.tables.write().await;
        if !tables.quizzes.contains_key(&quiz_id) {
            return Err(AppError::NotFound("Quiz not found".to_string()));
        }

        let now = Utc::now();
        let question = Question {
            id: tables.next_id(),
            quiz_id,
            points: fields.points_or_default(),
            text: fields.text,
            order: fields.order,
            created_at: now,
            updated_at: now,
        };
        tables.questions.insert(question.id, question.clone());
        Ok(question)
    }

    async fn get_question(&self, id: i64) -> AppResult<Option<Question>> {
        Ok(self.tables.read().await.questions.get(&id).cloned())
    }

    async fn list_questions(&self, quiz_id: i64) -> AppResult<Vec<Question>> {
        let tables = self.tables.read().await;
        let mut questions: Vec<Question> = tables
            .questions
            .values()
            .filter(|q| q.quiz_id == quiz_id)
            .cloned()
            .collect();
        questions.sort_by(|a, b| a.order.cmp(&b.order).then(a.id.cmp(&b.id)));
        Ok(questions)
    }

    async fn add_answer(&self, question_id: i64, fields: CreateAnswerRequest) -> AppResult<Answer> {
        let mut tables = self.tables.write().await;
        if !tables.questions.contains_key(&question_id) {
            return Err(AppError::NotFound("Question not found".to_string()));
        }

        let now = Utc::now();
        let answer = Answer {
            id: tables.next_id(),
            question_id,
            text: fields.text,
            is_correct: fields.is_correct,
            explanation: fields.explanation,
            created_at: now,
            updated_at: now,
        };
        tables.answers.insert(answer.id, answer.clone());
        Ok(answer)
    }

    async fn list_answers(&self, question_id: i64) -> AppResult<Vec<Answer>> {
        let tables = self.tables.read().await;
        Ok(tables
            .answers
            .values()
            .filter(|a| a.question_id == question_id)
            .cloned()
            .collect())
    }

    async fn create_submission(&self, submission: NewSubmission) -> AppResult<Submission> {
        let mut tables = self.tables.write().await;
        Ok(tables.insert_submission(submission))
    }

    async fn record_submission(&self, submission: NewSubmission) -> AppResult<Submission> {
        // Same shape as the Postgres transaction: insert, credit, undo the
        // insert if the credit fails. The write lock hides the interim row.
        let mut tables = self.tables.write().await;
        let (user_id, score) = (submission.user_id, submission.score);
        let stored = tables.insert_submission(submission);

        let credited = match self.credit_failure() {
            Some(err) => Err(err),
            None => tables
                .users
                .get_mut(&user_id)
                .map(|user| {
                    user.score += score;
                    user.updated_at = Utc::now();
                })
                .ok_or(AppError::NotFound("User not found".to_string())),
        };

        if let Err(err) = credited {
            tables.submissions.remove(&stored.id);
            return Err(err);
        }

        Ok(stored)
    }

    async fn list_submissions_by_user(&self, user_id: i64) -> AppResult<Vec<Submission>> {
        let tables = self.tables.read().await;
        let mut submissions: Vec<Submission> = tables
            .submissions
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        submissions.sort_by(|a, b| b.completed_at.cmp(&a.completed_at).then(b.id.cmp(&a.id)));
        Ok(submissions)
    }

    async fn quiz_leaderboard(&self, quiz_id: i64, limit: i64) -> AppResult<Vec<QuizLeaderboardEntry>> {
        let tables = self.tables.read().await;
        let mut entries: Vec<QuizLeaderboardEntry> = tables
            .submissions
            .values()
            .filter(|s| s.quiz_id == quiz_id)
            .map(|s| QuizLeaderboardEntry {
                submission_id: s.id,
                user_id: s.user_id,
                user_email: tables.users.get(&s.user_id).map(|u| u.email.clone()),
                score: s.score,
                completed_at: s.completed_at,
            })
            .collect();
        entries.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(a.completed_at.cmp(&b.completed_at))
                .then(a.submission_id.cmp(&b.submission_id))
        });
        entries.truncate(limit.max(0) as usize);
        Ok(entries)
    }

    async fn global_leaderboard(&self, limit: i64) -> AppResult<Vec<GlobalLeaderboardEntry>> {
        let tables = self.tables.read().await;
        let mut entries: Vec<GlobalLeaderboardEntry> = tables
            .users
            .values()
            .map(|u| GlobalLeaderboardEntry {
                user_id: u.id,
                email: u.email.clone(),
                total_score: u.score,
            })
            .collect();
        entries.sort_by(|a, b| b.total_score.cmp(&a.total_score).then(a.user_id.cmp(&b.user_id)));
        entries.truncate(limit.max(0) as usize);
        Ok(entries)
    }

    async fn get_user(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn increment_user_score(&self, user_id: i64, delta: i64) -> AppResult<User> {
        if let Some(err) = self.credit_failure() {
            return Err(err);
        }

        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or(AppError::NotFound("User not found".to_string()))?;
        user.score += delta;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn create_user(&self, email: &str, password_hash: &str, role: &str) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == email) {
            return Err(AppError::Conflict(format!(
                "User with email '{}' already exists",
                email
            )));
        }

        let now = Utc::now();
        let user = User {
            id: tables.next_id(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role: role.to_string(),
            score: 0,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> AppResult<Option<User>> {
        self.get_user(id).await
    }
}
