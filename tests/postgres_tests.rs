// tests/postgres_tests.rs
//
// Runs against a real database. Each test returns early when DATABASE_URL
// is not set.

use std::collections::BTreeMap;

use quiz_backend::{
    error::AppError,
    models::{quiz::CreateQuizRequest, submission::NewSubmission, user::ROLE_USER},
    repository::{PgRepository, QuizRepository, UserRepository},
};
use sqlx::{PgPool, postgres::PgPoolOptions};

async fn connect() -> Option<PgPool> {
    let database_url = std::env::var("DATABASE_URL").ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    Some(pool)
}

fn unique_email() -> String {
    format!("pg_{}@quiz.test", &uuid::Uuid::new_v4().to_string()[..8])
}

fn new_submission(user_id: i64, quiz_id: i64, score: i64) -> NewSubmission {
    NewSubmission {
        user_id,
        quiz_id,
        score,
        total_questions: 1,
        correct_answers: 1,
        time_spent: Some(12),
        answers: BTreeMap::from([(1, 1)]),
    }
}

async fn submissions_for_quiz(pool: &PgPool, quiz_id: i64) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM submissions WHERE quiz_id = $1")
        .bind(quiz_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn record_submission_commits_row_and_score() {
    let Some(pool) = connect().await else { return };
    let repo = PgRepository::new(pool.clone());

    let user = repo.create_user(&unique_email(), "hash", ROLE_USER).await.unwrap();
    let quiz = repo
        .create_quiz(
            CreateQuizRequest {
                title: "Postgres quiz".to_string(),
                description: None,
                cover_image: None,
            },
            user.id,
        )
        .await
        .unwrap();

    let stored = repo.record_submission(new_submission(user.id, quiz.id, 3)).await.unwrap();

    assert_eq!(stored.score, 3);
    assert_eq!(stored.answers.0.get(&1), Some(&1));
    assert_eq!(submissions_for_quiz(&pool, quiz.id).await, 1);
    let user = repo.get_user(user.id).await.unwrap().unwrap();
    assert_eq!(user.score, 3);
}

#[tokio::test]
async fn record_submission_for_unknown_user_leaves_nothing() {
    let Some(pool) = connect().await else { return };
    let repo = PgRepository::new(pool.clone());

    let owner = repo.create_user(&unique_email(), "hash", ROLE_USER).await.unwrap();
    let quiz = repo
        .create_quiz(
            CreateQuizRequest {
                title: "Ghost attempts".to_string(),
                description: None,
                cover_image: None,
            },
            owner.id,
        )
        .await
        .unwrap();

    let result = repo.record_submission(new_submission(i64::MAX, quiz.id, 5)).await;

    assert!(result.is_err());
    assert_eq!(submissions_for_quiz(&pool, quiz.id).await, 0);
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let Some(pool) = connect().await else { return };
    let repo = PgRepository::new(pool);
    let email = unique_email();

    repo.create_user(&email, "hash", ROLE_USER).await.unwrap();
    let result = repo.create_user(&email, "hash", ROLE_USER).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}
