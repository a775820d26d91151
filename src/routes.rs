// src/routes.rs

use axum::{
    Router,
    http::{Method, header},
    middleware,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{auth, health, leaderboard, quiz},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Public reads (quiz listing, leaderboards) need no token.
/// * Every mutation and submission goes through `auth_middleware`.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let require_auth = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .merge(
            Router::new()
                .route("/me", get(auth::me))
                .route("/verify", get(auth::verify))
                .route_layer(require_auth.clone()),
        );

    let public_quiz_routes = Router::new()
        .route("/", get(quiz::list_quizzes))
        .route("/{id}", get(quiz::get_quiz))
        .route("/{id}/full", get(quiz::get_quiz_full))
        .route("/{id}/leaderboard", get(leaderboard::get_quiz_leaderboard))
        .route("/leaderboard/global", get(leaderboard::get_global_leaderboard));

    let protected_quiz_routes = Router::new()
        .route("/", post(quiz::create_quiz))
        .route(
            "/{id}",
            axum::routing::patch(quiz::update_quiz).delete(quiz::delete_quiz),
        )
        .route("/{id}/questions", post(quiz::add_question))
        .route("/questions/{question_id}/answers", post(quiz::add_answer))
        .route("/{id}/submit", post(quiz::submit_quiz))
        .route("/user/submissions", get(leaderboard::get_user_submissions))
        .route_layer(require_auth);

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api/quiz", public_quiz_routes.merge(protected_quiz_routes))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
