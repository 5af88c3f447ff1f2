//! Shared helpers for API tests
//!
//! Each test gets its own in-memory database. The pool is capped at one
//! connection because every SQLite `:memory:` connection is a separate
//! database.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use ficrec_api::{create_router, AppState};
use ficrec_core::AppConfig;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

pub async fn test_app() -> Router {
    let mut config = AppConfig::default();
    config.database.url = "sqlite::memory:".to_string();
    config.database.pool_size = 1;

    let state = AppState::new(config).await.expect("state init failed");
    create_router(state)
}

/// Drive one request through the router and decode the JSON body.
///
/// A body that is empty or not JSON (204 responses) decodes to `Null`.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request did not complete");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();

    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    builder
        .body(Body::from(body.to_string()))
        .expect("invalid request")
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    builder.body(Body::empty()).expect("invalid request")
}

pub fn form_request(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let body = fields
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .expect("invalid request")
}

/// Register a user and return their access token.
pub async fn register_and_login(app: &Router, username: &str, email: &str) -> String {
    let (status, _) = send(
        app,
        json_request(
            "POST",
            "/auth/register",
            None,
            &json!({
                "username": username,
                "email": email,
                "password": "34somepassword34",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        form_request(
            "/auth/token",
            &[("username", username), ("password", "34somepassword34")],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    body["access_token"]
        .as_str()
        .expect("token missing")
        .to_string()
}

/// Create a recommendation and return its id.
pub async fn create_recommendation(app: &Router, token: &str, title: &str) -> i64 {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/recommendations",
            Some(token),
            &json!({
                "title": title,
                "short_description": "A short description",
                "opinion": "Worth reading",
                "fiction_type": "Book",
                "tags": ["fantasy", "magic"],
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    body["id"].as_i64().expect("id missing")
}
