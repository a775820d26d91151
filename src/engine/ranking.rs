// src/engine/ranking.rs

use std::cmp::Ordering;

use serde::Serialize;

use crate::{
    config::{DEFAULT_LEADERBOARD_LIMIT, MAX_LEADERBOARD_LIMIT},
    models::leaderboard::{GlobalLeaderboardEntry, QuizLeaderboardEntry},
};

/// A leaderboard row with its 1-based position.
/// Equal scores share a position ("1, 2, 2, 4").
#[derive(Debug, Clone, Serialize)]
pub struct Ranked<T> {
    pub rank: usize,
    #[serde(flatten)]
    pub entry: T,
}

/// Resolves a caller-supplied limit: default when absent, clamped to `1..=MAX`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
        .clamp(1, MAX_LEADERBOARD_LIMIT)
}

/// Highest score first; ties go to the earlier completion, then the lower id.
fn quiz_order(a: &QuizLeaderboardEntry, b: &QuizLeaderboardEntry) -> Ordering {
    b.score
        .cmp(&a.score)
        .then(a.completed_at.cmp(&b.completed_at))
        .then(a.submission_id.cmp(&b.submission_id))
}

/// Highest running total first; ties go to the lower user id.
fn global_order(a: &GlobalLeaderboardEntry, b: &GlobalLeaderboardEntry) -> Ordering {
    b.total_score
        .cmp(&a.total_score)
        .then(a.user_id.cmp(&b.user_id))
}

fn rank_by<T>(
    mut entries: Vec<T>,
    limit: i64,
    order: fn(&T, &T) -> Ordering,
    score: fn(&T) -> i64,
) -> Vec<Ranked<T>> {
    entries.sort_by(order);
    entries.truncate(limit.max(0) as usize);

    let mut ranked: Vec<Ranked<T>> = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let rank = match ranked.last() {
            Some(prev) if score(&prev.entry) == score(&entry) => prev.rank,
            _ => index + 1,
        };
        ranked.push(Ranked { rank, entry });
    }
    ranked
}

pub fn rank_quiz_entries(entries: Vec<QuizLeaderboardEntry>, limit: i64) -> Vec<Ranked<QuizLeaderboardEntry>> {
    rank_by(entries, limit, quiz_order, |e| e.score)
}

pub fn rank_global_entries(
    entries: Vec<GlobalLeaderboardEntry>,
    limit: i64,
) -> Vec<Ranked<GlobalLeaderboardEntry>> {
    rank_by(entries, limit, global_order, |e| e.total_score)
}
