use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};

use crate::inference::{Decision, ModelError, PredictionObserver, ValidationError};

pub(crate) const INVALID_REQUESTS: &str = "invalid_requests_total";
pub(crate) const PREDICTIONS: &str = "predictions_total";
pub(crate) const INFERENCE_FAILURES: &str = "inference_failures_total";
pub(crate) const MODEL_UNAVAILABLE: &str = "model_unavailable_total";
pub(crate) const PREDICTION_LATENCY: &str = "prediction_latency_ms";
pub(crate) const MODEL_LOADED: &str = "model_loaded";

/// Forwards pipeline outcomes to the globally installed `metrics` recorder.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusObserver;

impl PrometheusObserver {
    /// Register help text; safe to call more than once.
    pub fn describe() -> Self {
        describe_counter!(INVALID_REQUESTS, "Invalid prediction requests, by offending field");
        describe_counter!(PREDICTIONS, "Completed predictions, by decision");
        describe_counter!(INFERENCE_FAILURES, "Inference failures, by error type");
        describe_counter!(MODEL_UNAVAILABLE, "Predictions rejected because no model was loaded");
        describe_histogram!(PREDICTION_LATENCY, "Prediction pipeline latency in milliseconds");
        describe_gauge!(MODEL_LOADED, "1 when a model is loaded, 0 otherwise");
        Self
    }
}

impl PredictionObserver for PrometheusObserver {
    fn validation_failed(&self, error: &ValidationError) {
        for field in &error.field_errors {
            counter!(INVALID_REQUESTS, "field" => field.field.clone()).increment(1);
        }
    }

    fn prediction_completed(&self, decision: Decision, elapsed: Duration) {
        counter!(PREDICTIONS, "decision" => decision.label()).increment(1);
        histogram!(PREDICTION_LATENCY).record(elapsed.as_secs_f64() * 1_000.0);
    }

    fn inference_failed(&self, error: &ModelError) {
        counter!(INFERENCE_FAILURES, "error_type" => error.kind()).increment(1);
    }

    fn model_unavailable(&self) {
        counter!(MODEL_UNAVAILABLE).increment(1);
    }

    fn model_state(&self, loaded: bool) {
        gauge!(MODEL_LOADED).set(if loaded { 1.0 } else { 0.0 });
    }
}
