//! Login, registration and invitation integration tests.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::json;

#[tokio::test]
async fn register_then_login_ignores_email_case() {
    let harness = TestHarness::new();
    harness
        .register("Olive", "Olive@Example.com", "pw1", "Owner")
        .await;

    let body = harness
        .post_json(
            "/api/auth/login",
            json!({ "email": "  OLIVE@example.COM ", "password": "pw1" }),
        )
        .await;

    assert_eq!(body["status"], "success");
    assert_eq!(body["user"]["email"], "olive@example.com");
    assert_eq!(body["user"]["role"], "Owner");
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn wrong_password_is_refused_with_200() {
    let harness = TestHarness::new();
    harness.register("Olive", "olive@example.com", "pw1", "Owner").await;

    let response = harness
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "olive@example.com", "password": "nope" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Invalid Credentials");
}

#[tokio::test]
async fn duplicate_registration_is_refused() {
    let harness = TestHarness::new();
    harness.register("Olive", "olive@example.com", "pw1", "Owner").await;

    let body = harness
        .post_json(
            "/api/auth/register",
            json!({ "name": "Other", "email": "OLIVE@example.com", "password": "x", "role": "Trainer" }),
        )
        .await;

    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Email already registered");
}

#[tokio::test]
async fn invited_trainer_logs_in_only_after_setup() {
    let harness = TestHarness::new();

    let invited = harness
        .post_json(
            "/api/trainers/invite",
            json!({ "name": "Tara", "email": "tara@example.com" }),
        )
        .await;
    assert_eq!(invited["status"], "success");

    let pending = harness
        .post_json(
            "/api/auth/login",
            json!({ "email": "tara@example.com", "password": "PENDING_SETUP" }),
        )
        .await;
    assert_eq!(pending["status"], "error");
    assert!(pending["message"].as_str().unwrap().contains("pending"));

    let setup = harness
        .post_json(
            "/api/auth/setup",
            json!({ "email": "Tara@Example.com", "password": "secret" }),
        )
        .await;
    assert_eq!(setup["status"], "success");
    assert_eq!(setup["user"]["role"], "Trainer");

    let login = harness
        .post_json(
            "/api/auth/login",
            json!({ "email": "tara@example.com", "password": "secret" }),
        )
        .await;
    assert_eq!(login["status"], "success");

    let trainers: serde_json::Value = harness.server.get("/api/trainers").await.json();
    assert_eq!(trainers.as_array().unwrap().len(), 1);
    assert_eq!(trainers[0]["name"], "Tara");
}

#[tokio::test]
async fn setup_for_unknown_email_is_refused() {
    let harness = TestHarness::new();

    let body = harness
        .post_json(
            "/api/auth/setup",
            json!({ "email": "ghost@example.com", "password": "x" }),
        )
        .await;

    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn malformed_json_is_a_500_with_the_parse_error() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/auth/login")
        .content_type("application/json")
        .bytes("{not json".into())
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "error");
    assert!(!body["message"].as_str().unwrap().is_empty());
}
