use crate::api::cli::ServeArgs;
use crate::api::prometheus::PrometheusObserver;
use crate::api::routes::router;
use crate::api::state::AppState;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::inference::{ModelManager, PredictionObserver};
use crate::telemetry;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    args.store.apply(&mut config.models);

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let observer = Arc::new(PrometheusObserver::describe());

    let models = Arc::new(ModelManager::from_config(&config.models));
    if let Err(err) = models.load_active() {
        warn!(
            error = %err,
            models_dir = %config.models.models_dir.display(),
            "starting without a model; readiness will report not ready"
        );
    }
    observer.model_state(models.is_loaded());

    let state = AppState::new(models, observer, prometheus_handle);
    let app = router(state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(?config.environment, %addr, "risk inference service listening");

    axum::serve(listener, app).await?;
    Ok(())
}
