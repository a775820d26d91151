// src/handlers/leaderboard.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::{
    engine::QuizEngine,
    error::AppError,
    handlers::actor_from,
    models::leaderboard::LeaderboardParams,
    utils::jwt::Claims,
};

/// The caller's submission history, most recent first.
pub async fn get_user_submissions(
    State(engine): State<Arc<QuizEngine>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let actor = actor_from(&claims)?;
    Ok(Json(engine.get_user_submissions(actor.user_id).await?))
}

/// Best submissions for one quiz (default 10, max 100).
pub async fn get_quiz_leaderboard(
    State(engine): State<Arc<QuizEngine>>,
    Path(id): Path<i64>,
    Query(params): Query<LeaderboardParams>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(engine.get_quiz_leaderboard(id, params.limit).await?))
}

/// Users ranked by cumulative score (default 10, max 100).
pub async fn get_global_leaderboard(
    State(engine): State<Arc<QuizEngine>>,
    Query(params): Query<LeaderboardParams>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(engine.get_global_leaderboard(params.limit).await?))
}
