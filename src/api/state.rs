use std::sync::Arc;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::inference::{ModelManager, PredictionObserver, PredictionPipeline};

/// Handles shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub(crate) pipeline: PredictionPipeline,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        models: Arc<ModelManager>,
        observer: Arc<dyn PredictionObserver>,
        metrics: PrometheusHandle,
    ) -> Self {
        Self {
            pipeline: PredictionPipeline::with_observer(models, observer),
            metrics: Arc::new(metrics),
        }
    }

    /// State whose metrics endpoint renders a private, never-installed recorder.
    pub fn detached(models: Arc<ModelManager>, observer: Arc<dyn PredictionObserver>) -> Self {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        Self::new(models, observer, handle)
    }

    pub fn models(&self) -> &Arc<ModelManager> {
        self.pipeline.models()
    }

    pub fn observer(&self) -> &Arc<dyn PredictionObserver> {
        self.pipeline.observer()
    }
}
