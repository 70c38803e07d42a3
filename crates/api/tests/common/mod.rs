#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use radar_api::auth::jwt::{generate_access_token, JwtConfig};
use radar_api::config::{CanvasConfig, ServerConfig};
use radar_api::router::build_app_router;
use radar_api::state::AppState;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

pub const ALICE: i64 = 101;
pub const BOB: i64 = 202;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "radar-integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
        canvas: CanvasConfig::default(),
    }
}

/// Build the full application router (same middleware stack as production).
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config())
}

pub fn build_test_app_with(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Mint a bearer token for `user_id`, signed with the test secret.
pub fn bearer(user_id: i64) -> String {
    let token = generate_access_token(user_id, "editor", &test_config().jwt).unwrap();
    format!("Bearer {token}")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    user: Option<i64>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user {
        builder = builder.header("authorization", bearer(user_id));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, user: i64) -> Response<Body> {
    send(app, Method::GET, uri, Some(user), None).await
}

pub async fn post(app: Router, uri: &str, user: i64) -> Response<Body> {
    send(app, Method::POST, uri, Some(user), None).await
}

pub async fn post_json(app: Router, uri: &str, user: i64, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(user), Some(body)).await
}

pub async fn patch_json(app: Router, uri: &str, user: i64, body: Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(user), Some(body)).await
}

pub async fn delete_json(app: Router, uri: &str, user: i64, body: Value) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(user), Some(body)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a project and a draft brief owned by `user`, returning the brief id.
pub async fn create_brief(app: &Router, user: i64) -> i64 {
    let project = body_json(
        post_json(
            app.clone(),
            "/api/projects",
            user,
            serde_json::json!({"name": "Q3 Campaign"}),
        )
        .await,
    )
    .await;
    let brief = body_json(
        post_json(
            app.clone(),
            "/api/briefs",
            user,
            serde_json::json!({"project_id": project["id"], "title": "Launch brief"}),
        )
        .await,
    )
    .await;
    brief["id"].as_i64().unwrap()
}

/// Acquire the brief's lock for `user`, returning the plaintext token.
pub async fn acquire_lock(app: &Router, brief_id: i64, user: i64) -> String {
    let response = post(app.clone(), &format!("/api/briefs/{brief_id}/lock"), user).await;
    assert_eq!(response.status(), 200);
    let json = body_json(response).await;
    json["lockToken"].as_str().unwrap().to_string()
}
