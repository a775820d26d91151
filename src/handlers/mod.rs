// src/handlers/mod.rs

pub mod auth;
pub mod health;
pub mod leaderboard;
pub mod quiz;

use crate::{engine::Actor, error::AppError, utils::jwt::Claims};

/// Resolves the authenticated caller injected by `auth_middleware`.
pub(crate) fn actor_from(claims: &Claims) -> Result<Actor, AppError> {
    Actor::try_from(claims)
}
