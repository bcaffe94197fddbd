//! End-to-end flows against PostgreSQL. Run with a `DATABASE_URL` and
//! `cargo test -- --ignored`.

mod common;

use axum::Router;
use axum::http::StatusCode;
use common::{app_with_pool, body_json, get, json};
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;

async fn register(app: &Router, email: &str, role: &str) -> (String, Value) {
    let response = app
        .clone()
        .oneshot(json(
            "POST",
            "/api/auth/register",
            None,
            json!({ "name": "Test", "email": email, "password": "secret123", "role": role }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    (body["access_token"].as_str().unwrap().to_string(), body["user"].clone())
}

fn quiz_body(published: bool) -> Value {
    json!({
        "title": "Times tables",
        "subject": "maths",
        "published": published,
        "questions": [
            { "prompt": "7 x 8?", "options": ["54", "56"], "correct_option": 1 },
            { "prompt": "6 x 6?", "options": ["36", "38"], "correct_option": 0 }
        ]
    })
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_email_is_conflict(pool: PgPool) {
    let app = app_with_pool(pool);
    register(&app, "dup@example.com", "student").await;

    let response = app
        .oneshot(json(
            "POST",
            "/api/auth/register",
            None,
            json!({ "name": "Again", "email": "dup@example.com", "password": "secret123" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["message"], "email already exists");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_quiz_attempt_flow(pool: PgPool) {
    let app = app_with_pool(pool);
    let (teacher, _) = register(&app, "teacher@example.com", "teacher").await;
    let (student, _) = register(&app, "student@example.com", "student").await;

    let response = app
        .clone()
        .oneshot(json("POST", "/api/quizzes", Some(&teacher), quiz_body(true)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let quiz = body_json(response).await;
    let quiz_id = quiz["id"].as_str().unwrap().to_string();
    assert_eq!(quiz["questions"][0]["correct_option"], 1);

    // Students see the quiz without the answer key.
    let response = app
        .clone()
        .oneshot(get(&format!("/api/quizzes/{quiz_id}"), Some(&student)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let seen = body_json(response).await;
    assert!(seen["questions"][0].get("correct_option").is_none());

    // The student was told about the new quiz.
    let response = app
        .clone()
        .oneshot(get("/api/notifications", Some(&student)))
        .await
        .unwrap();
    let inbox = body_json(response).await;
    assert_eq!(inbox["unread"], 1);
    assert_eq!(inbox["data"][0]["kind"], "quiz_published");

    let response = app
        .clone()
        .oneshot(json(
            "POST",
            &format!("/api/quizzes/{quiz_id}/attempts"),
            Some(&student),
            json!({ "answers": [1, 1] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let result = body_json(response).await;
    assert_eq!(result["score"], 1);
    assert_eq!(result["total"], 2);
    assert_eq!(result["percentage"], 50.0);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/quizzes/{quiz_id}/attempts"), Some(&teacher)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    // Students cannot read other students' attempts.
    let response = app
        .clone()
        .oneshot(get(&format!("/api/quizzes/{quiz_id}/attempts"), Some(&student)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(get("/api/notifications?unread=true", Some(&teacher)))
        .await
        .unwrap();
    let inbox = body_json(response).await;
    assert_eq!(inbox["data"][0]["kind"], "quiz_submitted");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_drafts_are_hidden_from_other_users(pool: PgPool) {
    let app = app_with_pool(pool);
    let (owner, _) = register(&app, "owner@example.com", "teacher").await;
    let (other, _) = register(&app, "other@example.com", "teacher").await;

    let response = app
        .clone()
        .oneshot(json("POST", "/api/quizzes", Some(&owner), quiz_body(false)))
        .await
        .unwrap();
    let quiz_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(get(&format!("/api/quizzes/{quiz_id}"), Some(&other)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(get("/api/quizzes", Some(&other)))
        .await
        .unwrap();
    let page = body_json(response).await;
    assert_eq!(page["meta"]["total"], 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_notification_lifecycle(pool: PgPool) {
    let app = app_with_pool(pool);
    let (teacher, _) = register(&app, "t@example.com", "teacher").await;
    let (student, student_user) = register(&app, "s@example.com", "student").await;

    let response = app
        .clone()
        .oneshot(json(
            "POST",
            "/api/notifications",
            Some(&teacher),
            json!({ "user_id": student_user["id"], "message": "See me after class" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["id"].as_str().unwrap().to_string();

    // Only the recipient can mark it read.
    let patch = |token: &str| {
        axum::http::Request::builder()
            .method("PATCH")
            .uri(format!("/api/notifications/{id}/read"))
            .header("authorization", format!("Bearer {token}"))
            .body(axum::body::Body::empty())
            .unwrap()
    };
    let response = app.clone().oneshot(patch(&teacher)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.clone().oneshot(patch(&student)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["read"], true);

    let response = app
        .oneshot(
            axum::http::Request::builder()
                .method("DELETE")
                .uri(format!("/api/notifications/{id}"))
                .header("authorization", format!("Bearer {student}"))
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
