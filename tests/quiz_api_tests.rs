// tests/quiz_api_tests.rs

mod common;

use common::{spawn_app, spawn_app_with, test_config};
use quiz_backend::repository::QuizRepository;
use serde_json::{Value, json};

#[tokio::test]
async fn create_quiz_validates_title() {
    let app = spawn_app().await;
    let (_, token) = app.register().await;

    let too_short = app.post("/api/quiz", &token, json!({ "title": "ab" })).await;
    let created = app
        .post("/api/quiz", &token, json!({ "title": "Astronomy", "description": "Stars" }))
        .await;

    assert_eq!(too_short.status().as_u16(), 400);
    assert_eq!(created.status().as_u16(), 201);
    let quiz: Value = created.json().await.unwrap();
    assert_eq!(quiz["is_published"], false);
}

#[tokio::test]
async fn full_quiz_contains_questions_and_answers() {
    let app = spawn_app().await;
    let (_, token) = app.register().await;
    let (quiz_id, _, question_ids) = app.seed_quiz(&token, false).await;

    let full: Value = app.get(&format!("/api/quiz/{}/full", quiz_id)).await.json().await.unwrap();

    let questions = full["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0]["id"], question_ids[0]);
    assert_eq!(questions[0]["points"], 2);
    assert_eq!(questions[1]["answers"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn only_owner_can_mutate() {
    let app = spawn_app().await;
    let (_, owner) = app.register().await;
    let (_, intruder) = app.register().await;
    let (quiz_id, _, question_ids) = app.seed_quiz(&owner, false).await;

    let patch = app
        .client
        .patch(app.url(&format!("/api/quiz/{}", quiz_id)))
        .bearer_auth(&intruder)
        .json(&json!({ "is_published": true }))
        .send()
        .await
        .unwrap();
    let delete = app
        .client
        .delete(app.url(&format!("/api/quiz/{}", quiz_id)))
        .bearer_auth(&intruder)
        .send()
        .await
        .unwrap();
    let question = app
        .post(
            &format!("/api/quiz/{}/questions", quiz_id),
            &intruder,
            json!({ "text": "Sneaky question", "order": 3 }),
        )
        .await;
    let answer = app
        .post(
            &format!("/api/quiz/questions/{}/answers", question_ids[0]),
            &intruder,
            json!({ "text": "Sneaky", "is_correct": true }),
        )
        .await;

    for response in [patch, delete, question, answer] {
        assert_eq!(response.status().as_u16(), 403);
    }
}

#[tokio::test]
async fn missing_quiz_is_404() {
    let app = spawn_app().await;
    let (_, token) = app.register().await;

    assert_eq!(app.get("/api/quiz/987654").await.status().as_u16(), 404);
    let submit = app
        .post("/api/quiz/987654/submit", &token, json!({ "answers": {} }))
        .await;
    assert_eq!(submit.status().as_u16(), 404);
}

#[tokio::test]
async fn submit_scores_and_updates_global_leaderboard() {
    let app = spawn_app().await;
    let (_, owner) = app.register().await;
    let (player_id, player) = app.register().await;
    let (quiz_id, answers, questions) = app.seed_quiz(&owner, true).await;

    let response = app
        .post(
            &format!("/api/quiz/{}/submit", quiz_id),
            &player,
            json!({
                "answers": {
                    questions[0].to_string(): answers[0][0],
                    questions[1].to_string(): answers[1][1],
                    "999999": 1
                },
                "time_spent": 30
            }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let result: Value = response.json().await.unwrap();
    assert_eq!(result["score"], 2);
    assert_eq!(result["correct_answers"], 1);
    assert_eq!(result["total_questions"], 2);
    assert_eq!(result["ignored_questions"], 1);
    assert_eq!(result["submission"]["time_spent"], 30);

    let global: Value = app.get("/api/quiz/leaderboard/global?limit=1").await.json().await.unwrap();
    let rows = global.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["user_id"], player_id);
    assert_eq!(rows[0]["total_score"], 2);
    assert_eq!(rows[0]["rank"], 1);
}

#[tokio::test]
async fn unpublished_quiz_rejects_submission() {
    let app = spawn_app().await;
    let (_, owner) = app.register().await;
    let (_, player) = app.register().await;
    let (quiz_id, answers, questions) = app.seed_quiz(&owner, false).await;

    let response = app
        .post(
            &format!("/api/quiz/{}/submit", quiz_id),
            &player,
            json!({ "answers": { questions[0].to_string(): answers[0][0] } }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(app.repository.submission_count(quiz_id).await, 0);
}

#[tokio::test]
async fn negative_time_spent_is_rejected() {
    let app = spawn_app().await;
    let (_, owner) = app.register().await;
    let (quiz_id, _, _) = app.seed_quiz(&owner, true).await;

    let response = app
        .post(
            &format!("/api/quiz/{}/submit", quiz_id),
            &owner,
            json!({ "answers": {}, "time_spent": -5 }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn strict_mode_rejects_foreign_questions() {
    let mut config = test_config();
    config.strict_submissions = true;
    let app = spawn_app_with(config).await;
    let (_, owner) = app.register().await;
    let (quiz_id, _, _) = app.seed_quiz(&owner, true).await;

    let response = app
        .post(
            &format!("/api/quiz/{}/submit", quiz_id),
            &owner,
            json!({ "answers": { "999999": 1 } }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn quiz_leaderboard_respects_limit_and_order() {
    let app = spawn_app().await;
    let (_, owner) = app.register().await;
    let (quiz_id, answers, questions) = app.seed_quiz(&owner, true).await;

    let picks = [
        json!({}),
        json!({ questions[0].to_string(): answers[0][0], questions[1].to_string(): answers[1][0] }),
        json!({ questions[1].to_string(): answers[1][0] }),
        json!({ questions[0].to_string(): answers[0][0] }),
    ];
    for pick in picks {
        let (_, player) = app.register().await;
        let response = app
            .post(&format!("/api/quiz/{}/submit", quiz_id), &player, json!({ "answers": pick }))
            .await;
        assert_eq!(response.status().as_u16(), 200);
    }

    let board: Value = app
        .get(&format!("/api/quiz/{}/leaderboard?limit=3", quiz_id))
        .await
        .json()
        .await
        .unwrap();

    let scores: Vec<i64> = board
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["score"].as_i64().unwrap())
        .collect();
    assert_eq!(scores, vec![3, 2, 1]);
}

#[tokio::test]
async fn user_submissions_are_listed_newest_first() {
    let app = spawn_app().await;
    let (_, owner) = app.register().await;
    let (quiz_id, answers, questions) = app.seed_quiz(&owner, true).await;

    for pick in [json!({}), json!({ questions[0].to_string(): answers[0][0] })] {
        app.post(&format!("/api/quiz/{}/submit", quiz_id), &owner, json!({ "answers": pick }))
            .await;
    }

    let history: Value = app
        .client
        .get(app.url("/api/quiz/user/submissions"))
        .bearer_auth(&owner)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let scores: Vec<i64> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["score"].as_i64().unwrap())
        .collect();
    assert_eq!(scores, vec![2, 0]);
}

#[tokio::test]
async fn delete_quiz_cascades() {
    let app = spawn_app().await;
    let (_, owner) = app.register().await;
    let (quiz_id, answers, questions) = app.seed_quiz(&owner, true).await;
    app.post(
        &format!("/api/quiz/{}/submit", quiz_id),
        &owner,
        json!({ "answers": { questions[0].to_string(): answers[0][0] } }),
    )
    .await;

    let response = app
        .client
        .delete(app.url(&format!("/api/quiz/{}", quiz_id)))
        .bearer_auth(&owner)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(app.get(&format!("/api/quiz/{}", quiz_id)).await.status().as_u16(), 404);
    assert!(app.repository.list_questions(quiz_id).await.unwrap().is_empty());
    assert!(app.repository.list_answers(questions[0]).await.unwrap().is_empty());
    assert_eq!(app.repository.submission_count(quiz_id).await, 0);
}

#[tokio::test]
async fn published_filter_on_listing() {
    let app = spawn_app().await;
    let (_, owner) = app.register().await;
    let (published_id, _, _) = app.seed_quiz(&owner, true).await;
    let (draft_id, _, _) = app.seed_quiz(&owner, false).await;

    let published: Value = app.get("/api/quiz?published=true").await.json().await.unwrap();
    let drafts: Value = app.get("/api/quiz?published=false").await.json().await.unwrap();
    let all: Value = app.get("/api/quiz").await.json().await.unwrap();

    assert_eq!(published[0]["id"], published_id);
    assert_eq!(published.as_array().unwrap().len(), 1);
    assert_eq!(drafts[0]["id"], draft_id);
    assert_eq!(all.as_array().unwrap().len(), 2);
    // Newest first.
    assert_eq!(all[0]["id"], draft_id);
}
