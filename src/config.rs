// src/config.rs

use std::env;
use dotenvy::dotenv;

use crate::engine::SubmissionPolicy;

/// Number of leaderboard rows returned when the caller gives no limit.
pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;

/// Upper bound for any caller-supplied leaderboard limit.
pub const MAX_LEADERBOARD_LIMIT: i64 = 100;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Access token lifetime in seconds.
    pub jwt_expiration: u64,
    /// Refresh token lifetime in seconds.
    pub jwt_refresh_expiration: u64,
    pub rust_log: String,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    /// Lets users with the `admin` role mutate quizzes they do not own.
    pub admin_override: bool,
    /// Reject submissions that reference questions outside the quiz.
    pub strict_submissions: bool,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86_400);

        let jwt_refresh_expiration = env::var("JWT_REFRESH_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(604_800);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let admin_override = env::var("ADMIN_OVERRIDE")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        let strict_submissions = env::var("STRICT_SUBMISSIONS")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            jwt_refresh_expiration,
            rust_log,
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
            admin_override,
            strict_submissions,
            server_port,
        }
    }

    pub fn submission_policy(&self) -> SubmissionPolicy {
        if self.strict_submissions {
            SubmissionPolicy::Strict
        } else {
            SubmissionPolicy::Ignore
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
