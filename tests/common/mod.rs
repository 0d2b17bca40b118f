#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use risk_inference::api::{router, AppState};
use risk_inference::config::ModelStoreConfig;
use risk_inference::inference::{ModelManager, NoopObserver, PredictionObserver};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const REQUEST_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

/// Model store config pointing at the artifacts shipped with the crate.
pub fn bundled_store() -> ModelStoreConfig {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    ModelStoreConfig {
        models_dir: root.join("models"),
        config_dir: root.join("configs"),
    }
}

pub fn store_in(dir: &Path) -> ModelStoreConfig {
    ModelStoreConfig {
        models_dir: dir.join("models"),
        config_dir: dir.join("configs"),
    }
}

pub fn write_pointer(dir: &Path, version: &str) {
    write(
        dir.join("configs").join("active_model.json"),
        &json!({ "active_model_version": version }).to_string(),
    );
}

pub fn write_constant_model(dir: &Path, version: &str, score: f64) {
    write(
        dir.join("models").join(format!("{version}.json")),
        &json!({
            "metadata": { "model_version": version, "model_name": "fixture" },
            "features": ["amount", "currency", "country", "merchant_category", "device_type"],
            "scorer": { "kind": "constant", "score": score }
        })
        .to_string(),
    );
}

pub fn write(path: PathBuf, body: &str) {
    std::fs::create_dir_all(path.parent().expect("path has parent")).expect("create dir");
    std::fs::write(path, body).expect("write fixture");
}

pub fn app(models: Arc<ModelManager>) -> Router {
    app_with_observer(models, Arc::new(NoopObserver))
}

pub fn app_with_observer(
    models: Arc<ModelManager>,
    observer: Arc<dyn PredictionObserver>,
) -> Router {
    router(AppState::detached(models, observer))
}

pub fn loaded_bundled_models() -> Arc<ModelManager> {
    let models = Arc::new(ModelManager::from_config(&bundled_store()));
    models.load_active().expect("bundled model loads");
    models
}

pub fn predict_body() -> Value {
    json!({
        "request_id": REQUEST_ID,
        "event_time": "2026-01-31T10:00:00Z",
        "transaction": {
            "transaction_id": "txn_001",
            "user_id": "user_123",
            "amount": 100.0,
            "currency": "USD",
            "country": "US",
            "merchant_category": "electronics",
            "device_type": "mobile"
        }
    })
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
        .await
        .expect("router responds");
    split(response).await
}

pub async fn post_json(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
        .expect("router responds");
    split(response).await
}

pub async fn get_text(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
        .await
        .expect("router responds");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    (status, String::from_utf8(bytes.to_vec()).expect("utf-8 body"))
}

async fn split(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}
