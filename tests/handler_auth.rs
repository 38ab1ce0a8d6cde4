mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

fn register_body(email: &str) -> serde_json::Value {
    json!({
        "email": email,
        "password": "correct-horse",
        "name": "Alice"
    })
}

#[sqlx::test]
async fn test_register_returns_token(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool);
    let server = common::create_test_server(state);

    let response = server
        .post("/auth/register")
        .json(&register_body("alice@example.com"))
        .await;

    response.assert_status(StatusCode::CREATED);
    let token = response.json::<serde_json::Value>()["token"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(token.split('.').count(), 3);
}

#[sqlx::test]
async fn test_register_duplicate_email(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool);
    let server = common::create_test_server(state);

    server
        .post("/auth/register")
        .json(&register_body("dup@example.com"))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/auth/register")
        .json(&register_body("dup@example.com"))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "conflict"
    );
}

#[sqlx::test]
async fn test_register_validation(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool);
    let server = common::create_test_server(state);

    let cases = [
        json!({ "email": "not-an-email", "password": "correct-horse", "name": "A" }),
        json!({ "email": "a@example.com", "password": "short", "name": "A" }),
        json!({ "email": "a@example.com", "password": "correct-horse", "name": "" }),
        json!({ "email": "a@example.com" }),
    ];

    for body in cases {
        server
            .post("/auth/register")
            .json(&body)
            .await
            .assert_status_bad_request();
    }
}

#[sqlx::test]
async fn test_login_success(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool);
    let server = common::create_test_server(state);

    server
        .post("/auth/register")
        .json(&register_body("bob@example.com"))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/auth/login")
        .json(&json!({ "email": "bob@example.com", "password": "correct-horse" }))
        .await;

    response.assert_status_ok();
    let token = response.json::<serde_json::Value>()["token"]
        .as_str()
        .unwrap()
        .to_string();

    // The issued token opens protected routes.
    server
        .get("/stat")
        .authorization_bearer(&token)
        .add_query_param("from", "2025-01-01")
        .add_query_param("to", "2025-01-02")
        .add_query_param("by", "day")
        .await
        .assert_status_ok();
}

#[sqlx::test]
async fn test_login_wrong_password(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool);
    let server = common::create_test_server(state);

    server
        .post("/auth/register")
        .json(&register_body("carol@example.com"))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/auth/login")
        .json(&json!({ "email": "carol@example.com", "password": "wrong-horse" }))
        .await;

    response.assert_status_unauthorized();
}

#[sqlx::test]
async fn test_login_unknown_email(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool);
    let server = common::create_test_server(state);

    server
        .post("/auth/login")
        .json(&json!({ "email": "nobody@example.com", "password": "correct-horse" }))
        .await
        .assert_status_unauthorized();
}
