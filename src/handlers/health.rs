// src/handlers/health.rs

use axum::{Json, response::IntoResponse};
use serde_json::json;

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "message": "Quiz backend is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
