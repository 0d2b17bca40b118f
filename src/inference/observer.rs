use std::time::Duration;

use super::decision::Decision;
use super::model::ModelError;
use super::validation::ValidationError;

/// Hooks fired at each terminal outcome of a prediction, for metrics exporters.
///
/// Every method defaults to a no-op.
pub trait PredictionObserver: Send + Sync {
    fn validation_failed(&self, _error: &ValidationError) {}

    fn prediction_completed(&self, _decision: Decision, _elapsed: Duration) {}

    fn inference_failed(&self, _error: &ModelError) {}

    fn model_unavailable(&self) {}

    fn model_state(&self, _loaded: bool) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PredictionObserver for NoopObserver {}
