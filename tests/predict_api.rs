//! End-to-end behavior of the HTTP boundary: validation, normalization, scoring and
//! the probe endpoints, driven through the public router.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::*;
use risk_inference::inference::ModelManager;
use serde_json::json;

#[tokio::test]
async fn health_is_always_ok() {
    let models = Arc::new(ModelManager::from_config(&bundled_store()));
    let (status, body) = get(app(models), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn ready_tracks_model_state() {
    let models = Arc::new(ModelManager::from_config(&bundled_store()));

    let (status, body) = get(app(models.clone()), "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "not_ready");

    models.load_active().expect("bundled model loads");
    let (status, body) = get(app(models), "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ready" }));
}

#[tokio::test]
async fn model_endpoint_returns_metadata() {
    let (status, body) = get(app(loaded_bundled_models()), "/model").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_version"], "v1");
    assert!(body["model_name"].is_string());
}

#[tokio::test]
async fn model_endpoint_unavailable_before_load() {
    let models = Arc::new(ModelManager::from_config(&bundled_store()));
    let (status, body) = get(app(models), "/model").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "service_unavailable");
}

#[tokio::test]
async fn predict_normalizes_and_scores() {
    let mut request = predict_body();
    request["transaction"]["currency"] = json!("usd");
    request["transaction"]["country"] = json!("us");
    request["transaction"]["merchant_category"] = json!("Electronics");
    request["transaction"]["device_type"] = json!("");

    let (status, body) = post_json(app(loaded_bundled_models()), "/predict", &request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["request_id"], REQUEST_ID);
    assert_eq!(body["model_version"], "v1");
    let decision = body["decision"].as_str().expect("decision is a string");
    assert!(["approve", "review", "decline"].contains(&decision));
    let score = body["risk_score"].as_f64().expect("score is a number");
    assert!((0.0..=1.0).contains(&score));
    assert!(body["processed_at"].is_string());
}

#[tokio::test]
async fn predict_echoes_request_id_as_sent() {
    let mut request = predict_body();
    request["request_id"] = json!("123E4567E89B12D3A456426614174000");

    let (status, body) = post_json(app(loaded_bundled_models()), "/predict", &request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["request_id"], "123E4567E89B12D3A456426614174000");
}

#[tokio::test]
async fn padded_iso_codes_are_rejected() {
    let mut request = predict_body();
    request["transaction"]["currency"] = json!(" usd ");

    let (status, body) = post_json(app(loaded_bundled_models()), "/predict", &request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["field_errors"].as_array().expect("field errors");
    assert!(errors.iter().any(|e| e["field"] == "transaction.currency"));
}

#[tokio::test]
async fn bundled_constant_model_sends_requests_to_review() {
    let (status, body) =
        post_json(app(loaded_bundled_models()), "/predict", &predict_body()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["risk_score"], 0.5);
    assert_eq!(body["decision"], "review");
}

#[tokio::test]
async fn invalid_uuid_is_a_validation_error() {
    let mut request = predict_body();
    request["request_id"] = json!("invalid-uuid");

    let (status, body) = post_json(app(loaded_bundled_models()), "/predict", &request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
    let errors = body["field_errors"].as_array().expect("field_errors array");
    assert!(errors.iter().any(|e| e["field"] == "request_id"));
}

#[tokio::test]
async fn negative_amount_is_rejected() {
    let mut request = predict_body();
    request["transaction"]["amount"] = json!(-50.0);

    let (status, body) = post_json(app(loaded_bundled_models()), "/predict", &request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field_errors"][0]["field"], "transaction.amount");
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    let response = app(loaded_bundled_models())
        .oneshot(
            Request::post("/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"request_id\": "))
                .expect("request"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn validation_runs_before_model_availability() {
    let models = Arc::new(ModelManager::from_config(&bundled_store()));
    let mut request = predict_body();
    request["transaction"]["country"] = json!("USA");

    let (status, _) = post_json(app(models), "/predict", &request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn predict_without_model_is_unavailable() {
    let models = Arc::new(ModelManager::from_config(&bundled_store()));
    let (status, body) = post_json(app(models), "/predict", &predict_body()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "service_unavailable");
}

#[tokio::test]
async fn reload_switches_active_version() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_constant_model(dir.path(), "v1", 0.1);
    write_constant_model(dir.path(), "v2", 0.9);
    write_pointer(dir.path(), "v1");

    let models = Arc::new(ModelManager::from_config(&store_in(dir.path())));
    models.load_active().expect("v1 loads");

    let (_, body) = post_json(app(models.clone()), "/predict", &predict_body()).await;
    assert_eq!(body["decision"], "approve");

    write_pointer(dir.path(), "v2");
    let (status, body) = post_json(app(models.clone()), "/model/reload", &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_version"], "v2");

    let (_, body) = post_json(app(models.clone()), "/predict", &predict_body()).await;
    assert_eq!(body["decision"], "decline");
    assert_eq!(body["model_version"], "v2");

    write_pointer(dir.path(), "v3");
    let (status, body) = post_json(app(models.clone()), "/model/reload", &json!({})).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["kind"], "model_not_found");
    let dir_text = dir.path().to_string_lossy().into_owned();
    assert!(!body.to_string().contains(&dir_text));

    let (status, body) = get(app(models), "/model").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_version"], "v2");
}
