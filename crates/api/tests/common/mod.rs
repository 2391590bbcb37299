//! Shared harness for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use checkforge_api::auth::jwt::JwtConfig;
use checkforge_api::config::ServerConfig;
use checkforge_api::router::build_app_router;
use checkforge_api::state::AppState;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        password_min_length: 8,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// The production router over a test pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

/// POST without a body.
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Register `username` through the API and return its access token.
pub async fn register(app: Router, username: &str) -> String {
    let body = json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": TEST_PASSWORD,
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), 201, "registering {username}");
    body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Create a technology and return its id.
pub async fn create_technology(app: Router, token: &str, name: &str) -> i64 {
    let body = json!({
        "name": name,
        "description": format!("{name} framework"),
        "icon": "🐍",
        "color": "#092E20",
    });
    let response = post_json_auth(app, "/api/v1/technologies", body, token).await;
    assert_eq!(response.status(), 201, "creating technology {name}");
    body_json(response).await["id"].as_i64().unwrap()
}

/// Create a template and return its id.
pub async fn create_template(
    app: Router,
    token: &str,
    technology_id: i64,
    name: &str,
    is_public: bool,
) -> i64 {
    let body = json!({
        "technology_id": technology_id,
        "name": name,
        "description": "Checklist",
        "is_public": is_public,
    });
    let response = post_json_auth(app, "/api/v1/templates", body, token).await;
    assert_eq!(response.status(), 201, "creating template {name}");
    body_json(response).await["id"].as_i64().unwrap()
}

/// Add a step and return its id.
pub async fn create_step(
    app: Router,
    token: &str,
    template_id: i64,
    order: i32,
    question: &str,
    is_required: bool,
) -> i64 {
    let body = json!({
        "question": question,
        "order": order,
        "is_required": is_required,
    });
    let uri = format!("/api/v1/templates/{template_id}/steps");
    let response = post_json_auth(app, &uri, body, token).await;
    assert_eq!(response.status(), 201, "creating step {order}");
    body_json(response).await["id"].as_i64().unwrap()
}
