use std::sync::Arc;

use crate::config::Config;
use crate::engine::{OwnershipGuard, QuizEngine};
use crate::repository::{QuizRepository, UserRepository};
use axum::extract::FromRef;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<QuizEngine>,
    pub users: Arc<dyn UserRepository>,
    pub config: Config,
}

impl AppState {
    /// Wires the engine and the identity endpoints to one repository.
    pub fn new<R>(repository: Arc<R>, config: Config) -> Self
    where
        R: QuizRepository + UserRepository + 'static,
    {
        let engine = QuizEngine::new(
            repository.clone(),
            OwnershipGuard::new(config.admin_override),
            config.submission_policy(),
        );

        Self {
            engine: Arc::new(engine),
            users: repository,
            config,
        }
    }
}

impl FromRef<AppState> for Arc<QuizEngine> {
    fn from_ref(state: &AppState) -> Self {
        state.engine.clone()
    }
}

impl FromRef<AppState> for Arc<dyn UserRepository> {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
