// src/repository/postgres.rs

use async_trait::async_trait;
use sqlx::{PgPool, types::Json};

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

/// Postgres-backed repository. Foreign keys carry `ON DELETE CASCADE`,
/// see `migrations/`.
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

#[async_trait]
impl QuizRepository for PgRepository {
    async fn create_quiz(&self, fields: CreateQuizRequest, owner_id: i64) -> AppResult<Quiz> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            INSERT INTO quizzes (title, description, cover_image, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, cover_image, owner_id, is_published, created_at, updated_at
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.cover_image)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create quiz: {:?}", e);
            AppError::from(e)
        })?;

        Ok(quiz)
    }

    async fn get_quiz(&self, id: i64) -> AppResult<Option<Quiz>> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            SELECT id, title, description, cover_image, owner_id, is_published, created_at, updated_at
            FROM quizzes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quiz)
    }

    async fn list_quizzes(&self, published: Option<bool>) -> AppResult<Vec<Quiz>> {
        let quizzes = sqlx::query_as::<_, Quiz>(
            r#"
            SELECT id, title, description, cover_image, owner_id, is_published, created_at, updated_at
            FROM quizzes
            WHERE ($1::BOOLEAN IS NULL OR is_published = $1)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(published)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list quizzes: {:?}", e);
            AppError::from(e)
        })?;

        Ok(quizzes)
    }

    async fn update_quiz(&self, id: i64, changes: UpdateQuizRequest) -> AppResult<Quiz> {
        sqlx::query_as::<_, Quiz>(
            r#"
            UPDATE quizzes SET
                title = COALESCE($2, title),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                cover_image = CASE WHEN $5 THEN $6 ELSE cover_image END,
                is_published = COALESCE($7, is_published),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, cover_image, owner_id, is_published, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(changes.description.is_some())
        .bind(changes.description.flatten())
        .bind(changes.cover_image.is_some())
        .bind(changes.cover_image.flatten())
        .bind(changes.is_published)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))
    }

    async fn delete_quiz(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete quiz: {:?}", e);
                AppError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Quiz not found".to_string()));
        }

        Ok(())
    }

    async fn add_question(&self, quiz_id: i64, fields: CreateQuestionRequest) -> AppResult<Question> {
        let question = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (quiz_id, text, sort_order, points)
            VALUES ($1, $2, $3, $4)
            RETURNING id, quiz_id, text, sort_order, points, created_at, updated_at
            "#,
        )
        .bind(quiz_id)
        .bind(&fields.text)
        .bind(fields.order)
        .bind(fields.points_or_default())
        .fetch_one(&self.pool)
        .await?;

        Ok(question)
    }

    async fn get_question(&self, id: i64) -> AppResult<Option<Question>> {
        let question = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, quiz_id, text, sort_order, points, created_at, updated_at
            FROM questions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(question)
    }

    async fn list_questions(&self, quiz_id: i64) -> AppResult<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, quiz_id, text, sort_order, points, created_at, updated_at
            FROM questions
            WHERE quiz_id = $1
            ORDER BY sort_order ASC, id ASC
            "#,
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    async fn add_answer(&self, question_id: i64, fields: CreateAnswerRequest) -> AppResult<Answer> {
        let answer = sqlx::query_as::<_, Answer>(
            r#"
            INSERT INTO answers (question_id, text, is_correct, explanation)
            VALUES ($1, $2, $3, $4)
            RETURNING id, question_id, text, is_correct, explanation, created_at, updated_at
            "#,
        )
        .bind(question_id)
        .bind(&fields.text)
        .bind(fields.is_correct)
        .bind(&fields.explanation)
        .fetch_one(&self.pool)
        .await?;

        Ok(answer)
    }

    async fn list_answers(&self, question_id: i64) -> AppResult<Vec<Answer>> {
        let answers = sqlx::query_as::<_, Answer>(
            r#"
            SELECT id, question_id, text, is_correct, explanation, created_at, updated_at
            FROM answers
            WHERE question_id = $1
            "#,
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(answers)
    }

    async fn create_submission(&self, submission: NewSubmission) -> AppResult<Submission> {
        let stored = sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO submissions
                (user_id, quiz_id, score, total_questions, correct_answers, time_spent, answers)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, quiz_id, score, total_questions, correct_answers,
                      time_spent, answers, completed_at, created_at
            "#,
        )
        .bind(submission.user_id)
        .bind(submission.quiz_id)
        .bind(submission.score)
        .bind(submission.total_questions)
        .bind(submission.correct_answers)
        .bind(submission.time_spent)
        .bind(Json(&submission.answers))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert submission: {:?}", e);
            AppError::from(e)
        })?;

        Ok(stored)
    }

    async fn record_submission(&self, submission: NewSubmission) -> AppResult<Submission> {
        let mut tx = self.pool.begin().await?;

        let stored = sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO submissions
                (user_id, quiz_id, score, total_questions, correct_answers, time_spent, answers)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, quiz_id, score, total_questions, correct_answers,
                      time_spent, answers, completed_at, created_at
            "#,
        )
        .bind(submission.user_id)
        .bind(submission.quiz_id)
        .bind(submission.score)
        .bind(submission.total_questions)
        .bind(submission.correct_answers)
        .bind(submission.time_spent)
        .bind(Json(&submission.answers))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert submission: {:?}", e);
            AppError::from(e)
        })?;

        let credited = sqlx::query(
            "UPDATE users SET score = score + $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(submission.user_id)
        .bind(submission.score)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to credit user score: {:?}", e);
            AppError::from(e)
        })?;

        // Dropping the transaction without commit rolls the insert back.
        if credited.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        tx.commit().await?;

        Ok(stored)
    }

    async fn list_submissions_by_user(&self, user_id: i64) -> AppResult<Vec<Submission>> {
        let submissions = sqlx::query_as::<_, Submission>(
            r#"
            SELECT id, user_id, quiz_id, score, total_questions, correct_answers,
                   time_spent, answers, completed_at, created_at
            FROM submissions
            WHERE user_id = $1
            ORDER BY completed_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(submissions)
    }

    async fn quiz_leaderboard(&self, quiz_id: i64, limit: i64) -> AppResult<Vec<QuizLeaderboardEntry>> {
        let entries = sqlx::query_as::<_, QuizLeaderboardEntry>(
            r#"
            SELECT
                s.id AS submission_id,
                s.user_id,
                u.email AS user_email,
                s.score,
                s.completed_at
            FROM submissions s
            LEFT JOIN users u ON s.user_id = u.id
            WHERE s.quiz_id = $1
            ORDER BY s.score DESC, s.completed_at ASC, s.id ASC
            LIMIT $2
            "#,
        )
        .bind(quiz_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch quiz leaderboard: {:?}", e);
            AppError::from(e)
        })?;

        Ok(entries)
    }

    async fn global_leaderboard(&self, limit: i64) -> AppResult<Vec<GlobalLeaderboardEntry>> {
        let entries = sqlx::query_as::<_, GlobalLeaderboardEntry>(
            r#"
            SELECT id AS user_id, email, score AS total_score
            FROM users
            ORDER BY score DESC, id ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch global leaderboard: {:?}", e);
            AppError::from(e)
        })?;

        Ok(entries)
    }

    async fn get_user(&self, id: i64) -> AppResult<Option<User>> {
        self.find_user_by_id(id).await
    }

    async fn increment_user_score(&self, user_id: i64, delta: i64) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET score = score + $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, password_hash, role, score, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(delta)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))
    }
}

#[async_trait]
impl UserRepository for PgRepository {
    async fn create_user(&self, email: &str, password_hash: &str, role: &str) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, role, score, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("User with email '{}' already exists", email))
            } else {
                tracing::error!("Failed to create user: {:?}", e);
                AppError::from(e)
            }
        })
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, role, score, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, role, score, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
