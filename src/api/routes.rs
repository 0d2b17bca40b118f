use std::any::Any;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{debug, error, info, warn};

use super::state::AppState;
use crate::inference::validation::parse_body;
use crate::inference::{validate_request, ModelError, PredictError, ValidationError};

/// Router exposing prediction, model and probe endpoints.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/model", get(model_endpoint))
        .route("/model/reload", post(reload_endpoint))
        .route("/predict", post(predict_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    if state.models().is_loaded() {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "not_ready", "detail": "model not loaded" })),
        )
    }
}

pub(crate) async fn model_endpoint(State(state): State<AppState>) -> Response {
    match state.models().metadata() {
        Ok(metadata) => (StatusCode::OK, Json(metadata)).into_response(),
        Err(err) => unavailable(&err.to_string()),
    }
}

pub(crate) async fn reload_endpoint(State(state): State<AppState>) -> Response {
    let models = Arc::clone(state.models());
    let outcome = tokio::task::spawn_blocking(move || models.load_active()).await;
    state.observer().model_state(state.models().is_loaded());

    match outcome {
        Ok(Ok(metadata)) => {
            info!(model_version = %metadata.model_version, "model reloaded on request");
            (StatusCode::OK, Json(metadata)).into_response()
        }
        Ok(Err(err)) => load_failed(&err),
        Err(join_error) => {
            error!(error = %join_error, "model reload task aborted");
            internal_error()
        }
    }
}

pub(crate) async fn predict_endpoint(State(state): State<AppState>, body: Bytes) -> Response {
    let request = match parse_body(&body).and_then(|payload| validate_request(&payload)) {
        Ok(request) => request,
        Err(err) => {
            debug!(field_count = err.field_errors.len(), "rejected invalid predict request");
            state.observer().validation_failed(&err);
            return err.into_response();
        }
    };

    match state.pipeline.predict(&request) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    state.observer().model_state(state.models().is_loaded());
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "code": "validation_error",
            "message": "request failed validation",
            "field_errors": self.field_errors,
        }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        match self {
            PredictError::ServiceUnavailable(err) => unavailable(&err.to_string()),
            PredictError::Inference { .. } => {
                let body = Json(json!({
                    "code": "inference_failed",
                    "message": "inference did not produce a usable score",
                }));
                (StatusCode::SERVICE_UNAVAILABLE, body).into_response()
            }
            PredictError::Internal(_) => internal_error(),
        }
    }
}

fn unavailable(message: &str) -> Response {
    let body = Json(json!({
        "code": "service_unavailable",
        "message": message,
    }));
    (StatusCode::SERVICE_UNAVAILABLE, body).into_response()
}

fn load_failed(err: &ModelError) -> Response {
    warn!(kind = err.kind(), error = %err, "model reload failed");
    let body = Json(json!({
        "code": "model_load_failed",
        "kind": err.kind(),
        "message": "active model could not be loaded",
    }));
    (StatusCode::SERVICE_UNAVAILABLE, body).into_response()
}

fn internal_error() -> Response {
    let body = Json(json!({
        "code": "internal_error",
        "message": "internal server error",
    }));
    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}

fn panic_response(_payload: Box<dyn Any + Send + 'static>) -> Response {
    error!("request handler panicked");
    internal_error()
}
