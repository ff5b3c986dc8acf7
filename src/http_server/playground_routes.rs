//! Playground HTTP Routes
//!
//! JSON endpoints for trying schemas and specifications interactively.
//!
//! # Endpoints
//!
//! - `POST /infer` - generate a specification for a schema
//! - `POST /validate` - check a specification against a schema
//! - `POST /generate` - render a form, with an inline or stored specification
//! - `GET|POST /specs` - list / create stored specifications
//! - `GET|PUT|DELETE /specs/:id` - load / save / delete one

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::layout::{LayoutSpec, SpecDocumentError, Violation};
use crate::observability::{Event, MetricsRegistry};
use crate::pipeline::{
    ErrorKind, GenerationError, GenerationPipeline, GenerationRequest, SchemaSource,
};
use crate::schema::SchemaNode;
use crate::store::{SpecStore, StoreError};

/// Shared state for the playground routes
pub struct PlaygroundState {
    pub pipeline: GenerationPipeline,
    pub store: SpecStore,
    pub metrics: Arc<MetricsRegistry>,
}

impl PlaygroundState {
    pub fn new(pipeline: GenerationPipeline, store: SpecStore) -> Self {
        Self {
            pipeline,
            store,
            metrics: Arc::new(MetricsRegistry::new()),
        }
    }
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
pub struct InferRequest {
    pub schema: Value,
}

#[derive(Debug, Serialize)]
pub struct InferResponse {
    pub spec: Value,
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub schema: Value,
    pub spec: Value,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub violations: Vec<Violation>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub schema: Value,
    #[serde(default)]
    pub spec: Option<Value>,
    #[serde(default)]
    pub spec_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub html: String,
    pub spec: Value,
    pub tree: SchemaNode,
}

#[derive(Debug, Serialize)]
pub struct SpecListResponse {
    pub ids: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct SpecSavedResponse {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: status.as_u16(),
            violations: Vec::new(),
        }),
    )
}

fn store_error(err: StoreError) -> ApiError {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    api_error(status, err.to_string())
}

/// Counts the failure and maps its family to a status.
fn generation_error(metrics: &MetricsRegistry, err: GenerationError) -> ApiError {
    let status = match err.kind() {
        ErrorKind::Specification => {
            metrics.increment_specification_errors();
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ErrorKind::Input => {
            metrics.increment_input_errors();
            StatusCode::BAD_REQUEST
        }
        ErrorKind::Unexpected => {
            metrics.increment_unexpected_failures();
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            code: status.as_u16(),
            violations: err.violations().to_vec(),
        }),
    )
}

fn parse_spec(metrics: &MetricsRegistry, document: &Value) -> Result<LayoutSpec, ApiError> {
    LayoutSpec::from_value(document)
        .map_err(|e: SpecDocumentError| generation_error(metrics, GenerationError::from(e)))
}

// ==================
// Routes
// ==================

pub fn playground_routes(state: Arc<PlaygroundState>) -> Router {
    Router::new()
        .route("/infer", post(infer_spec))
        .route("/validate", post(validate_spec))
        .route("/generate", post(generate_form))
        .route("/specs", get(list_specs).post(create_spec))
        .route("/specs/:id", get(get_spec).put(put_spec).delete(delete_spec))
        .with_state(state)
}

// ==================
// Handlers
// ==================

async fn infer_spec(
    State(state): State<Arc<PlaygroundState>>,
    Json(request): Json<InferRequest>,
) -> Result<Json<InferResponse>, ApiError> {
    state.metrics.increment_requests();
    let spec = state
        .pipeline
        .infer(&SchemaSource::Inline(request.schema))
        .map_err(|e| generation_error(&state.metrics, e))?;

    Ok(Json(InferResponse {
        spec: spec.to_value(),
    }))
}

async fn validate_spec(
    State(state): State<Arc<PlaygroundState>>,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<ValidateResponse>, ApiError> {
    state.metrics.increment_requests();
    let spec = parse_spec(&state.metrics, &request.spec)?;
    let violations = state
        .pipeline
        .validate(&SchemaSource::Inline(request.schema), &spec)
        .map_err(|e| generation_error(&state.metrics, e))?;

    Ok(Json(ValidateResponse {
        valid: violations.is_empty(),
        violations,
    }))
}

async fn generate_form(
    State(state): State<Arc<PlaygroundState>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    state.metrics.increment_requests();

    let spec = match (&request.spec, &request.spec_id) {
        (Some(_), Some(_)) => {
            state.metrics.increment_input_errors();
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                "spec and spec_id cannot both be given",
            ));
        }
        (Some(document), None) => Some(parse_spec(&state.metrics, document)?),
        (None, Some(id)) => Some(state.store.load(id).map_err(store_error)?),
        (None, None) => None,
    };

    let mut generation = GenerationRequest::inline(request.schema);
    if let Some(spec) = spec {
        generation = generation.with_spec(spec);
    }

    let output = state
        .pipeline
        .run_guarded(&generation)
        .map_err(|e| generation_error(&state.metrics, e))?;
    state.metrics.increment_forms_generated();

    Ok(Json(GenerateResponse {
        html: output.html,
        spec: output.spec.to_value(),
        tree: output.tree,
    }))
}

async fn list_specs(
    State(state): State<Arc<PlaygroundState>>,
) -> Result<Json<SpecListResponse>, ApiError> {
    let ids = state.store.list().map_err(store_error)?;
    Ok(Json(SpecListResponse {
        total: ids.len(),
        ids,
    }))
}

async fn create_spec(
    State(state): State<Arc<PlaygroundState>>,
    Json(document): Json<Value>,
) -> Result<(StatusCode, Json<SpecSavedResponse>), ApiError> {
    let spec = parse_spec(&state.metrics, &document)?;
    let id = SpecStore::new_id();
    save(&state, &id, &spec)?;
    Ok((StatusCode::CREATED, Json(SpecSavedResponse { id })))
}

async fn get_spec(
    State(state): State<Arc<PlaygroundState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let spec = state.store.load(&id).map_err(store_error)?;
    Ok(Json(spec.to_value()))
}

async fn put_spec(
    State(state): State<Arc<PlaygroundState>>,
    Path(id): Path<String>,
    Json(document): Json<Value>,
) -> Result<Json<SpecSavedResponse>, ApiError> {
    let spec = parse_spec(&state.metrics, &document)?;
    save(&state, &id, &spec)?;
    Ok(Json(SpecSavedResponse { id }))
}

async fn delete_spec(
    State(state): State<Arc<PlaygroundState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.store.delete(&id).map_err(store_error)?;
    state.metrics.increment_specs_deleted();
    state
        .pipeline
        .logger()
        .event(Event::SpecDeleted, &[("id", id.as_str())]);

    Ok(Json(MessageResponse {
        message: format!("specification '{}' deleted", id),
    }))
}

fn save(state: &PlaygroundState, id: &str, spec: &LayoutSpec) -> Result<(), ApiError> {
    state.store.save(id, spec).map_err(store_error)?;
    state.metrics.increment_specs_saved();
    state.pipeline.logger().event(Event::SpecSaved, &[("id", id)]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutEngine, ValidationMode};
    use crate::observability::{Logger, Severity};
    use crate::render::FormRenderer;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::json;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn state(dir: &TempDir) -> Arc<PlaygroundState> {
        let pipeline = GenerationPipeline::new(
            LayoutEngine::new(ValidationMode::Collect),
            FormRenderer::default(),
            Logger::new(Severity::Fatal),
        );
        Arc::new(PlaygroundState::new(
            pipeline,
            SpecStore::open(dir.path()).unwrap(),
        ))
    }

    async fn call(
        state: &Arc<PlaygroundState>,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(v) => Body::from(v.to_string()),
                None => Body::empty(),
            })
            .unwrap();
        let response = playground_routes(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn contact_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "email": {"type": "string", "format": "email"}
            }
        })
    }

    #[tokio::test]
    async fn test_infer() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        let (status, body) = call(&state, "POST", "/infer", Some(json!({"schema": contact_schema()}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["spec"]["layout"], "vertical");
        assert_eq!(body["spec"]["order"], json!(["name", "email"]));
    }

    #[tokio::test]
    async fn test_validate_reports_violations() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        let (status, body) = call(
            &state,
            "POST",
            "/validate",
            Some(json!({"schema": contact_schema(), "spec": {"layout": "carousel"}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], false);
        assert_eq!(body["violations"][0]["path"], "$root");
    }

    #[tokio::test]
    async fn test_generate_inferred() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        let (status, body) = call(&state, "POST", "/generate", Some(json!({"schema": contact_schema()}))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["html"].as_str().unwrap().contains("<form"));
        assert_eq!(body["tree"]["layout"], "vertical");
        assert_eq!(state.metrics.snapshot().forms_generated, 1);
    }

    #[tokio::test]
    async fn test_generate_status_codes() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);

        let (status, body) = call(
            &state,
            "POST",
            "/generate",
            Some(json!({"schema": contact_schema(), "spec": {"layout": "carousel"}})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], 422);
        assert!(body["violations"].as_array().is_some_and(|v| !v.is_empty()));

        let (status, _) = call(
            &state,
            "POST",
            "/generate",
            Some(json!({"schema": {"type": "object", "properties": "nope"}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            &state,
            "POST",
            "/generate",
            Some(json!({"schema": contact_schema(), "spec_id": "missing"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let snapshot = state.metrics.snapshot();
        assert_eq!(snapshot.specification_errors, 1);
        assert_eq!(snapshot.input_errors, 1);
    }

    #[tokio::test]
    async fn test_spec_crud() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        let spec = json!({"layout": "grid", "options": {"columns": 2}});

        let (status, body) = call(&state, "PUT", "/specs/contact", Some(spec.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "contact");

        let (status, body) = call(&state, "GET", "/specs", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ids"], json!(["contact"]));

        let (status, body) = call(&state, "GET", "/specs/contact", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["layout"], "grid");

        let (status, body) = call(
            &state,
            "POST",
            "/generate",
            Some(json!({"schema": contact_schema(), "spec_id": "contact"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tree"]["layout"], "grid");

        let (status, _) = call(&state, "DELETE", "/specs/contact", None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(&state, "GET", "/specs/contact", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let snapshot = state.metrics.snapshot();
        assert_eq!(snapshot.specs_saved, 1);
        assert_eq!(snapshot.specs_deleted, 1);
    }

    #[tokio::test]
    async fn test_create_and_bad_ids() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);

        let (status, body) = call(&state, "POST", "/specs", Some(json!({"layout": "tabs"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["id"].as_str().unwrap().to_string();
        assert!(state.store.exists(&id));

        let (status, _) = call(&state, "PUT", "/specs/bad%20id", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(&state, "PUT", "/specs/ok", Some(json!([1, 2]))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_spec_and_spec_id_conflict() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        let (status, _) = call(
            &state,
            "POST",
            "/generate",
            Some(json!({"schema": contact_schema(), "spec": {}, "spec_id": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
