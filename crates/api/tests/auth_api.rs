//! Registration, login, lockout, refresh rotation and logout.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_auth, post_json, TEST_PASSWORD};
use serde_json::json;
use sqlx::PgPool;

async fn login(app: axum::Router, username: &str, password: &str) -> axum::response::Response {
    post_json(
        app,
        "/api/v1/auth/login",
        json!({ "username": username, "password": password }),
    )
    .await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_returns_tokens_and_user(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = json!({ "username": "alice", "email": "Alice@Example.com", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["expires_in"], 15 * 60);
    assert_eq!(json["user"]["username"], "alice");
    assert_eq!(json["user"]["email"], "alice@example.com");
    assert!(json["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_rejects_short_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = json!({ "username": "bob", "email": "bob@example.com", "password": "short" });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_rejects_bad_email(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = json!({ "username": "bob", "email": "not-an-email", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_username_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::register(app.clone(), "carol").await;

    let body = json!({ "username": "carol", "email": "other@example.com", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_and_me(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::register(app.clone(), "dave").await;

    let response = login(app.clone(), "dave", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
    let token = body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let me = get_auth(app, "/api/v1/users/me", &token).await;
    assert_eq!(me.status(), StatusCode::OK);
    assert_eq!(body_json(me).await["username"], "dave");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_password_and_unknown_user_are_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::register(app.clone(), "erin").await;

    let wrong = login(app.clone(), "erin", "nope-nope-nope").await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let ghost = login(app, "ghost", TEST_PASSWORD).await;
    assert_eq!(ghost.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn account_locks_after_five_failures(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::register(app.clone(), "frank").await;

    for _ in 0..5 {
        let response = login(app.clone(), "frank", "bad-password").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let locked = login(app, "frank", TEST_PASSWORD).await;
    assert_eq!(locked.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_rotates_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = json!({ "username": "gina", "email": "gina@example.com", "password": TEST_PASSWORD });
    let registered = body_json(post_json(app.clone(), "/api/v1/auth/register", body).await).await;
    let refresh_token = registered["refresh_token"].as_str().unwrap().to_string();

    let first = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);
    let rotated = body_json(first).await;
    assert_ne!(rotated["refresh_token"], refresh_token.as_str());

    let reused = post_json(
        app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(reused.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn logout_revokes_refresh_tokens(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = json!({ "username": "hank", "email": "hank@example.com", "password": TEST_PASSWORD });
    let registered = body_json(post_json(app.clone(), "/api/v1/auth/register", body).await).await;
    let access = registered["access_token"].as_str().unwrap();
    let refresh = registered["refresh_token"].as_str().unwrap();

    let response = post_auth(app.clone(), "/api/v1/auth/logout", access).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let after = post_json(app, "/api/v1/auth/refresh", json!({ "refresh_token": refresh })).await;
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn protected_routes_need_a_valid_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let missing = get(app.clone(), "/api/v1/users/me").await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let garbage = get_auth(app, "/api/v1/projects", "not.a.jwt").await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}
