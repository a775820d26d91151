// src/models/leaderboard.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of a per-quiz leaderboard.
/// Joined from `submissions` and `users`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct QuizLeaderboardEntry {
    pub submission_id: i64,
    pub user_id: i64,
    pub user_email: Option<String>,
    pub score: i64,
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

/// One row of the global leaderboard, read from the users' running totals.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct GlobalLeaderboardEntry {
    pub user_id: i64,
    pub email: String,
    pub total_score: i64,
}

/// Query parameters for leaderboard endpoints.
#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    /// Number of entries to return (default: 10, max: 100).
    pub limit: Option<i64>,
}
