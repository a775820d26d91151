// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::Arc;

use quiz_backend::{config::Config, repository::InMemoryRepository, routes, state::AppState};
use serde_json::{Value, json};

pub struct TestApp {
    pub address: String,
    pub repository: InMemoryRepository,
    pub client: reqwest::Client,
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        jwt_refresh_expiration: 3600,
        rust_log: "error".to_string(),
        admin_email: None,
        admin_password: None,
        admin_override: false,
        strict_submissions: false,
        server_port: 0,
    }
}

/// Spawns the app on a random port, backed by an in-memory repository.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(test_config()).await
}

pub async fn spawn_app_with(config: Config) -> TestApp {
    let repository = InMemoryRepository::new();
    let state = AppState::new(Arc::new(repository.clone()), config);
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        repository,
        client: reqwest::Client::new(),
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Registers a fresh user and returns (user id, access token).
    pub async fn register(&self) -> (i64, String) {
        let email = format!("u_{}@quiz.test", &uuid::Uuid::new_v4().to_string()[..8]);
        let body: Value = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({ "email": email, "password": "password123" }))
            .send()
            .await
            .expect("Register failed")
            .json()
            .await
            .expect("Failed to parse register json");

        (
            body["user"]["id"].as_i64().expect("user id"),
            body["access_token"].as_str().expect("access token").to_string(),
        )
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Creates a quiz with two questions (2 points and 1 point), each with one
    /// correct and one wrong answer. Returns (quiz id, [[right, wrong]; 2], question ids).
    pub async fn seed_quiz(&self, token: &str, publish: bool) -> (i64, [[i64; 2]; 2], [i64; 2]) {
        let quiz: Value = self
            .post("/api/quiz", token, json!({ "title": "World capitals" }))
            .await
            .json()
            .await
            .unwrap();
        let quiz_id = quiz["id"].as_i64().unwrap();

        let mut question_ids = [0; 2];
        let mut answer_ids = [[0; 2]; 2];
        for (i, points) in [2, 1].into_iter().enumerate() {
            let question: Value = self
                .post(
                    &format!("/api/quiz/{}/questions", quiz_id),
                    token,
                    json!({ "text": format!("Question number {}", i + 1), "order": i + 1, "points": points }),
                )
                .await
                .json()
                .await
                .unwrap();
            question_ids[i] = question["id"].as_i64().unwrap();

            for (j, correct) in [true, false].into_iter().enumerate() {
                let answer: Value = self
                    .post(
                        &format!("/api/quiz/questions/{}/answers", question_ids[i]),
                        token,
                        json!({ "text": format!("Option {}", j), "is_correct": correct }),
                    )
                    .await
                    .json()
                    .await
                    .unwrap();
                answer_ids[i][j] = answer["id"].as_i64().unwrap();
            }
        }

        if publish {
            self.client
                .patch(self.url(&format!("/api/quiz/{}", quiz_id)))
                .bearer_auth(token)
                .json(&json!({ "is_published": true }))
                .send()
                .await
                .unwrap();
        }

        (quiz_id, answer_ids, question_ids)
    }
}
