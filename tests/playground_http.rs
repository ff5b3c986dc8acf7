//! Playground HTTP Tests
//!
//! The full router as `serve` builds it: health, metrics, inference,
//! validation, generation and the specification store.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use schemaform::http_server::{HttpServer, HttpServerConfig, PlaygroundState};
use schemaform::layout::ValidationMode;
use schemaform::observability::{Logger, Severity};
use schemaform::pipeline::GenerationPipeline;
use schemaform::render::RenderConfig;
use schemaform::store::SpecStore;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

// =============================================================================
// Helper Functions
// =============================================================================

fn router(dir: &TempDir) -> Router {
    let pipeline = GenerationPipeline::from_config(
        &RenderConfig::default(),
        ValidationMode::Collect,
        Logger::new(Severity::Fatal),
    )
    .unwrap();
    let store = SpecStore::open(dir.path().join("specs")).unwrap();
    let state = Arc::new(PlaygroundState::new(pipeline, store));
    HttpServer::new(HttpServerConfig::default(), state).router()
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn signup_schema() -> Value {
    let mut properties = serde_json::Map::new();
    for name in ["first", "last", "email", "phone", "city", "zip", "country", "company", "role", "team"] {
        properties.insert(name.to_string(), json!({"type": "string"}));
    }
    properties.insert(
        "address".to_string(),
        json!({"type": "object", "properties": {"street": {"type": "string"}}}),
    );
    json!({"type": "object", "title": "Sign up", "properties": properties})
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_health() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send(&router(&dir), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_infer_then_generate_with_edited_spec() {
    let dir = TempDir::new().unwrap();
    let router = router(&dir);

    let (status, body) = send(&router, "POST", "/api/infer", Some(json!({"schema": signup_schema()}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["spec"]["layout"], "tabs");
    assert_eq!(body["spec"]["address"]["layout"], "vtabs");

    let mut spec = body["spec"].clone();
    spec["layout"] = json!("wizard");
    spec["address"]["layout"] = json!("grid");

    let (status, body) = send(
        &router,
        "POST",
        "/api/generate",
        Some(json!({"schema": signup_schema(), "spec": spec})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tree"]["layout"], "wizard");
    assert_eq!(body["tree"]["properties"]["address"]["layout"], "grid");
    assert!(body["html"].as_str().unwrap().contains("Sign up"));
}

#[tokio::test]
async fn test_rejected_spec_returns_violations() {
    let dir = TempDir::new().unwrap();
    let router = router(&dir);

    let (status, body) = send(
        &router,
        "POST",
        "/api/generate",
        Some(json!({"schema": signup_schema(), "spec": {"layout": "tabs", "address": {"layout": "tabs"}}})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["violations"][0]["rule"], "SF_LAYOUT_TABS_IN_TABS");
    assert_eq!(body["violations"][0]["path"], "$root.address");

    let (_, metrics) = send(&router, "GET", "/metrics", None).await;
    assert_eq!(metrics["requests"], 1);
    assert_eq!(metrics["specification_errors"], 1);
}

#[tokio::test]
async fn test_breakpoint_with_markup_is_rejected() {
    let dir = TempDir::new().unwrap();
    let router = router(&dir);

    let (status, body) = send(
        &router,
        "POST",
        "/api/generate",
        Some(json!({
            "schema": signup_schema(),
            "spec": {"layout": "vertical", "responsive": {"x onmouseover=alert(1) y": {"layout": "grid"}}}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("SF_SPEC_MALFORMED"));
}

#[tokio::test]
async fn test_stored_spec_workflow() {
    let dir = TempDir::new().unwrap();
    let router = router(&dir);

    let (status, _) = send(
        &router,
        "PUT",
        "/api/specs/signup",
        Some(json!({"layout": "grid", "options": {"columns": 3}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(dir.path().join("specs/signup.json").is_file());

    let (status, body) = send(
        &router,
        "POST",
        "/api/generate",
        Some(json!({"schema": signup_schema(), "spec_id": "signup"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tree"]["layoutOptions"]["columns"], 3);

    let (status, body) = send(&router, "GET", "/api/specs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);

    let (status, _) = send(&router, "DELETE", "/api/specs/signup", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&router, "DELETE", "/api/specs/signup", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_validate_endpoint() {
    let dir = TempDir::new().unwrap();
    let router = router(&dir);

    let (status, body) = send(
        &router,
        "POST",
        "/api/validate",
        Some(json!({"schema": signup_schema(), "spec": {"order": ["email", "first"]}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert_eq!(body["violations"], json!([]));
}
