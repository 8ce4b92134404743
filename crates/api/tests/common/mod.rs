#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use quotedesk_api::config::ServerConfig;
use quotedesk_api::router::build_app_router;
use quotedesk_api::state::AppState;
use quotedesk_events::EventBus;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
    }
}

/// Build the full application router over the given test database pool.
///
/// The state is returned too so tests can subscribe to the event bus or
/// query the pool directly.
pub fn build_test_app(pool: PgPool) -> (Router, AppState) {
    let state = AppState {
        pool,
        config: Arc::new(test_config()),
        event_bus: Arc::new(EventBus::default()),
    };
    (build_app_router(state.clone()), state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, None).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// Create a rule and return its id.
pub async fn create_rule(app: &Router, body: Value) -> i64 {
    let response = post_json(app, "/api/v1/assignment-rules", body).await;
    assert_eq!(response.status(), 201, "rule creation should succeed");
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// A `load_balance` rule over `categories` with auto-assign enabled.
pub fn load_balance_rule(name: &str, priority: i32, categories: &[&str]) -> Value {
    json!({
        "rule_name": name,
        "priority": priority,
        "rule_type": "load_balance",
        "product_categories": categories,
        "auto_assign": true,
    })
}

pub async fn seed_engineer(app: &Router, id: i64, categories: &[&str], current: u32) {
    let response = put_json(
        app,
        &format!("/api/v1/engineers/{id}/workload"),
        json!({
            "engineer_name": format!("Engineer {id}"),
            "skill_categories": categories,
            "current_inquiries": current,
        }),
    )
    .await;
    assert!(response.status().is_success(), "engineer upsert should succeed");
}

/// Create an inquiry and return its id.
pub async fn create_inquiry(app: &Router, category: &str) -> i64 {
    let response = post_json(
        app,
        "/api/v1/inquiries",
        json!({
            "customer_name": "Acme Fasteners",
            "product_category": category,
        }),
    )
    .await;
    assert_eq!(response.status(), 201, "inquiry creation should succeed");
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
