use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{info, warn};

use super::artifact::{FileModelStore, LoadedModel, ModelMetadata, ModelStore};
use crate::config::ModelStoreConfig;
use crate::inference::decision::RiskScore;
use crate::inference::features::FeatureRecord;

/// Failures raised while loading or querying the active model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("active model config not found at {}", .path.display())]
    ConfigNotFound { path: PathBuf },
    #[error("active model config at {} is invalid: {reason}", .path.display())]
    ConfigInvalid { path: PathBuf, reason: String },
    #[error("model '{version}' not found at {}", .path.display())]
    ModelNotFound { version: String, path: PathBuf },
    #[error("model artifact '{version}' is invalid: {reason}")]
    ArtifactInvalid { version: String, reason: String },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no model is loaded")]
    NotLoaded,
    #[error("inference failed: {0}")]
    Inference(String),
}

impl ModelError {
    /// Stable label used for log fields and metric dimensions.
    pub fn kind(&self) -> &'static str {
        match self {
            ModelError::ConfigNotFound { .. } => "config_not_found",
            ModelError::ConfigInvalid { .. } => "config_invalid",
            ModelError::ModelNotFound { .. } => "model_not_found",
            ModelError::ArtifactInvalid { .. } => "artifact_invalid",
            ModelError::Io { .. } => "io",
            ModelError::NotLoaded => "not_loaded",
            ModelError::Inference(_) => "inference_error",
        }
    }
}

/// Owns the active scorer and publishes it as one immutable snapshot.
///
/// Readers clone the `Arc` under a short read lock, so a prediction always
/// sees a scorer and metadata from the same load. Loads are serialized and
/// staged off to the side; the snapshot is only replaced once the new model
/// is fully built. A failed reload keeps the previous snapshot in place.
pub struct ModelManager {
    store: Box<dyn ModelStore>,
    active: RwLock<Option<Arc<LoadedModel>>>,
    load_lock: Mutex<()>,
}

impl ModelManager {
    pub fn new<S>(store: S) -> Self
    where
        S: ModelStore + 'static,
    {
        Self {
            store: Box::new(store),
            active: RwLock::new(None),
            load_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &ModelStoreConfig) -> Self {
        Self::new(FileModelStore::new(config))
    }

    /// Resolve the active pointer, load the artifact it names and publish it.
    pub fn load_active(&self) -> Result<ModelMetadata, ModelError> {
        let _serialized = self.load_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let staged = self
            .store
            .active_version()
            .and_then(|version| self.store.load(&version));

        match staged {
            Ok(model) => {
                let metadata = model.metadata().clone();
                let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
                *active = Some(Arc::new(model));
                drop(active);
                info!(model_version = %metadata.model_version, "model loaded");
                Ok(metadata)
            }
            Err(err) => {
                let retained = self.current().map(|model| model.model_version().to_string());
                warn!(
                    error = %err,
                    kind = err.kind(),
                    retained_version = retained.as_deref().unwrap_or("none"),
                    "model load failed"
                );
                Err(err)
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.current().is_some()
    }

    pub fn metadata(&self) -> Result<ModelMetadata, ModelError> {
        self.snapshot().map(|model| model.metadata().clone())
    }

    /// Current snapshot, for callers that need the scorer and its version together.
    pub fn snapshot(&self) -> Result<Arc<LoadedModel>, ModelError> {
        self.current().ok_or(ModelError::NotLoaded)
    }

    pub fn predict(&self, features: &FeatureRecord) -> Result<RiskScore, ModelError> {
        self.snapshot()?.predict(features)
    }

    fn current(&self) -> Option<Arc<LoadedModel>> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
