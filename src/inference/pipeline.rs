use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{error, warn};

use super::decision::map_decision;
use super::features::build_features;
use super::model::{ModelError, ModelManager};
use super::normalizer::normalize_request;
use super::observer::{NoopObserver, PredictionObserver};
use super::schema::{PredictRequest, PredictResponse};

/// Composes normalization, feature building, scoring and decision mapping.
///
/// Holds no state of its own beyond shared handles.
#[derive(Clone)]
pub struct PredictionPipeline {
    models: Arc<ModelManager>,
    observer: Arc<dyn PredictionObserver>,
}

impl PredictionPipeline {
    pub fn new(models: Arc<ModelManager>) -> Self {
        Self::with_observer(models, Arc::new(NoopObserver))
    }

    pub fn with_observer(
        models: Arc<ModelManager>,
        observer: Arc<dyn PredictionObserver>,
    ) -> Self {
        Self { models, observer }
    }

    pub fn models(&self) -> &Arc<ModelManager> {
        &self.models
    }

    pub fn observer(&self) -> &Arc<dyn PredictionObserver> {
        &self.observer
    }

    /// Score one validated request.
    pub fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, PredictError> {
        let started = Instant::now();

        // Pin one snapshot so the score and the reported version come from the same model.
        let model = self.models.snapshot().map_err(|err| {
            self.observer.model_unavailable();
            PredictError::ServiceUnavailable(err)
        })?;

        let normalized = normalize_request(request);
        let features = build_features(&normalized);

        let score = model.predict(&features).map_err(|err| {
            warn!(
                request_id = %normalized.request_id,
                model_version = model.model_version(),
                error = %err,
                "inference failed"
            );
            self.observer.inference_failed(&err);
            PredictError::Inference {
                request_id: normalized.request_id.clone(),
                source: err,
            }
        })?;

        let decision = map_decision(score.value()).map_err(|err| {
            error!(request_id = %normalized.request_id, error = %err, "score escaped range check");
            PredictError::Internal(err.to_string())
        })?;

        self.observer.prediction_completed(decision, started.elapsed());

        Ok(PredictResponse {
            request_id: normalized.request_id,
            decision,
            risk_score: score,
            model_version: model.model_version().to_string(),
            processed_at: Utc::now(),
        })
    }
}

/// Terminal failure of a prediction, consumed by the boundary to pick a status.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("model unavailable: {0}")]
    ServiceUnavailable(#[source] ModelError),
    #[error("inference failed for request {request_id}")]
    Inference {
        request_id: String,
        #[source]
        source: ModelError,
    },
    #[error("internal error: {0}")]
    Internal(String),
}
