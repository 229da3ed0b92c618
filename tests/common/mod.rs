//! Shared helpers for HTTP-level integration tests.
//!
//! Every test app runs the production router over an in-memory store, so the
//! middleware stack and handlers are exercised exactly as deployed.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use devlog_api::config::Config;
use devlog_api::db::memory::MemoryStore;
use devlog_api::db::Store;
use devlog_api::{router, AppState};

pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

pub fn test_config() -> Config {
    Config {
        database_url: devlog_api::config::MEMORY_STORE_URL.to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        frontend_url: "http://localhost:3000".to_string(),
        cors_extra_origins: vec![],
        jwt_secret: TEST_SECRET.to_string(),
        jwt_ttl_secs: 1800,
    }
}

pub fn build_test_app() -> Router {
    build_test_app_with(Arc::new(MemoryStore::new()))
}

pub fn build_test_app_with(store: Arc<dyn Store>) -> Router {
    router(AppState::new(store, test_config()))
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: &Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: &Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn put_auth(app: &Router, uri: &str, token: &str) -> Response {
    send(app, Method::PUT, uri, Some(token), None).await
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A registered account: its token and user id.
pub struct Account {
    pub token: String,
    pub id: String,
}

/// Register through the API and return the issued token and user id.
pub async fn register(
    app: &Router,
    username: &str,
    password: &str,
    role: &str,
    manager_id: Option<&str>,
) -> Account {
    let body = json!({
        "username": username,
        "email": format!("{username}@test.com"),
        "password": password,
        "role": role,
        "manager_id": manager_id,
    });
    let response = post_json(app, "/api/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::OK, "registration of {username} should succeed");
    let json = body_json(response).await;
    Account {
        token: json["access_token"].as_str().unwrap().to_string(),
        id: json["user"]["id"].as_str().unwrap().to_string(),
    }
}

/// A manager `m1` with one developer `d1` reporting to them.
pub async fn manager_and_developer(app: &Router) -> (Account, Account) {
    let manager = register(app, "m1", "pw1", "manager", None).await;
    let developer = register(app, "d1", "pw2", "developer", Some(&manager.id)).await;
    (manager, developer)
}

pub fn log_body(date: &str, mood: i32) -> Value {
    json!({
        "date": date,
        "tasks": [{ "description": "fix bug", "time_spent": 2.0, "completed": true }],
        "total_time": 2.0,
        "mood": mood,
    })
}

pub async fn create_log(app: &Router, token: &str, date: &str) -> Value {
    let response = post_json_auth(app, "/api/logs", token, log_body(date, 4)).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}
