// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    engine::QuizEngine,
    error::AppError,
    handlers::actor_from,
    models::{
        answer::CreateAnswerRequest,
        question::CreateQuestionRequest,
        quiz::{CreateQuizRequest, QuizListParams, UpdateQuizRequest},
        submission::SubmitQuizRequest,
    },
    utils::{html::Sanitize, jwt::Claims},
};

/// Creates a draft quiz owned by the caller.
pub async fn create_quiz(
    State(engine): State<Arc<QuizEngine>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let actor = actor_from(&claims)?;
    let quiz = engine.create_quiz(payload.sanitized(), &actor).await?;

    Ok((StatusCode::CREATED, Json(quiz)))
}

/// Lists quizzes, newest first. `?published=true|false` filters by state.
pub async fn list_quizzes(
    State(engine): State<Arc<QuizEngine>>,
    Query(params): Query<QuizListParams>,
) -> Result<impl IntoResponse, AppError> {
    let quizzes = engine.list_quizzes(params.published).await?;
    Ok(Json(quizzes))
}

pub async fn get_quiz(
    State(engine): State<Arc<QuizEngine>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(engine.get_quiz(id).await?))
}

/// Quiz with its questions and every candidate answer (correct flags included).
pub async fn get_quiz_full(
    State(engine): State<Arc<QuizEngine>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(engine.get_quiz_with_questions(id).await?))
}

/// Partially updates a quiz. Owner only.
pub async fn update_quiz(
    State(engine): State<Arc<QuizEngine>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let actor = actor_from(&claims)?;
    let quiz = engine.update_quiz(id, payload.sanitized(), &actor).await?;

    Ok(Json(quiz))
}

/// Deletes a quiz with its questions, answers and submissions. Owner only.
pub async fn delete_quiz(
    State(engine): State<Arc<QuizEngine>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let actor = actor_from(&claims)?;
    engine.delete_quiz(id, &actor).await?;

    Ok(Json(json!({ "message": "Quiz deleted successfully" })))
}

pub async fn add_question(
    State(engine): State<Arc<QuizEngine>>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<i64>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let actor = actor_from(&claims)?;
    let question = engine.add_question(quiz_id, payload.sanitized(), &actor).await?;

    Ok((StatusCode::CREATED, Json(question)))
}

pub async fn add_answer(
    State(engine): State<Arc<QuizEngine>>,
    Extension(claims): Extension<Claims>,
    Path(question_id): Path<i64>,
    Json(payload): Json<CreateAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let actor = actor_from(&claims)?;
    let answer = engine.add_answer(question_id, payload.sanitized(), &actor).await?;

    Ok((StatusCode::CREATED, Json(answer)))
}

/// Submits the caller's answers and returns the score breakdown.
pub async fn submit_quiz(
    State(engine): State<Arc<QuizEngine>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let actor = actor_from(&claims)?;
    let result = engine.submit_quiz(id, payload, &actor).await?;

    Ok(Json(result))
}
