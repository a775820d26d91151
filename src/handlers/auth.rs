// src/handlers/auth.rs

use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    handlers::actor_from,
    models::user::{AuthResponse, LoginRequest, ROLE_USER, RegisterRequest, User, UserSummary},
    repository::UserRepository,
    utils::{
        hash::{hash_password, verify_password},
        jwt::{Claims, sign_jwt},
    },
};

fn issue_tokens(user: &User, config: &Config) -> Result<AuthResponse, AppError> {
    Ok(AuthResponse {
        user: UserSummary::from(user),
        access_token: sign_jwt(user, &config.jwt_secret, config.jwt_expiration)?,
        refresh_token: sign_jwt(user, &config.jwt_secret, config.jwt_refresh_expiration)?,
    })
}

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created with the user summary and a token pair.
pub async fn register(
    State(users): State<Arc<dyn UserRepository>>,
    State(config): State<Config>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let email = payload.email.trim().to_lowercase();
    let hashed_password = hash_password(&payload.password)?;

    let user = users.create_user(&email, &hashed_password, ROLE_USER).await?;
    tracing::info!("Registered user {}", user.id);

    Ok((StatusCode::CREATED, Json(issue_tokens(&user, &config)?)))
}

/// Authenticates a user and returns a token pair.
///
/// Unknown emails and wrong passwords produce the same error.
pub async fn login(
    State(users): State<Arc<dyn UserRepository>>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let invalid = || AppError::AuthError("Invalid email or password".to_string());

    let user = users
        .find_user_by_email(&payload.email.trim().to_lowercase())
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(invalid());
    }

    Ok(Json(issue_tokens(&user, &config)?))
}

/// Returns the caller's account, including the cumulative score.
pub async fn me(
    State(users): State<Arc<dyn UserRepository>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let actor = actor_from(&claims)?;

    let user = users
        .find_user_by_id(actor.user_id)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Confirms the presented token is valid and echoes its identity.
pub async fn verify(Extension(claims): Extension<Claims>) -> Result<impl IntoResponse, AppError> {
    let actor = actor_from(&claims)?;

    Ok(Json(json!({
        "valid": true,
        "user": {
            "id": actor.user_id,
            "email": claims.email,
            "role": actor.role,
        }
    })))
}
