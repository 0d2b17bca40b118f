use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lifecycle::ModelError;
use super::scorer::{Scorer, ScorerError, ScorerSpec};
use crate::config::ModelStoreConfig;
use crate::inference::decision::RiskScore;
use crate::inference::features::{FeatureRecord, FEATURE_COLUMNS};

/// Persisted pointer naming the model version to serve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveModelConfig {
    #[serde(default)]
    pub active_model_version: Option<String>,
}

/// Descriptive record published alongside a loaded scorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_version: String,
    pub model_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trained_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// On-disk model artifact: metadata, the feature schema it was trained on and its scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub metadata: ModelMetadata,
    pub features: Vec<String>,
    pub scorer: ScorerSpec,
}

/// Immutable scorer + metadata pair published by a successful load.
pub struct LoadedModel {
    metadata: ModelMetadata,
    scorer: Box<dyn Scorer>,
}

impl fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModel")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl LoadedModel {
    pub fn new(metadata: ModelMetadata, scorer: Box<dyn Scorer>) -> Self {
        Self { metadata, scorer }
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn model_version(&self) -> &str {
        &self.metadata.model_version
    }

    /// Score one record. Scorer failures, non-finite and out-of-range outputs
    /// all surface as [`ModelError::Inference`].
    pub fn predict(&self, features: &FeatureRecord) -> Result<RiskScore, ModelError> {
        let raw = self
            .scorer
            .score(features)
            .map_err(|ScorerError(reason)| ModelError::Inference(reason))?;
        RiskScore::new(raw).map_err(|err| ModelError::Inference(err.to_string()))
    }
}

/// Source of the active-model pointer and the artifacts it names.
pub trait ModelStore: Send + Sync {
    fn active_version(&self) -> Result<String, ModelError>;
    fn load(&self, version: &str) -> Result<LoadedModel, ModelError>;
}

/// Reads `<config_dir>/active_model.json` and `<models_dir>/<version>.json`.
#[derive(Debug, Clone)]
pub struct FileModelStore {
    pointer_path: PathBuf,
    models_dir: PathBuf,
}

impl FileModelStore {
    pub fn new(config: &ModelStoreConfig) -> Self {
        Self {
            pointer_path: config.active_pointer_path(),
            models_dir: config.models_dir.clone(),
        }
    }

    pub fn artifact_path(&self, version: &str) -> PathBuf {
        self.models_dir.join(format!("{version}.json"))
    }
}

impl ModelStore for FileModelStore {
    fn active_version(&self) -> Result<String, ModelError> {
        let path = &self.pointer_path;
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(ModelError::ConfigNotFound { path: path.clone() })
            }
            Err(source) => {
                return Err(ModelError::Io {
                    path: path.clone(),
                    source,
                })
            }
        };

        let config: ActiveModelConfig =
            serde_json::from_str(&raw).map_err(|err| ModelError::ConfigInvalid {
                path: path.clone(),
                reason: err.to_string(),
            })?;

        let version = config
            .active_model_version
            .map(|version| version.trim().to_string())
            .filter(|version| !version.is_empty())
            .ok_or_else(|| ModelError::ConfigInvalid {
                path: path.clone(),
                reason: "active_model_version is not specified".to_string(),
            })?;

        if !is_safe_version(&version) {
            return Err(ModelError::ConfigInvalid {
                path: path.clone(),
                reason: format!("active_model_version '{version}' is not a plain name"),
            });
        }

        Ok(version)
    }

    fn load(&self, version: &str) -> Result<LoadedModel, ModelError> {
        let path = self.artifact_path(version);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(ModelError::ModelNotFound {
                    version: version.to_string(),
                    path,
                })
            }
            Err(source) => return Err(ModelError::Io { path, source }),
        };

        let artifact: ModelArtifact =
            serde_json::from_str(&raw).map_err(|err| ModelError::ArtifactInvalid {
                version: version.to_string(),
                reason: err.to_string(),
            })?;

        artifact.into_loaded(version)
    }
}

impl ModelArtifact {
    /// Check the artifact against the requested version and the feature schema, then build it.
    pub fn into_loaded(self, version: &str) -> Result<LoadedModel, ModelError> {
        let invalid = |reason: String| ModelError::ArtifactInvalid {
            version: version.to_string(),
            reason,
        };

        if self.metadata.model_version.trim().is_empty() {
            return Err(invalid("metadata.model_version is empty".to_string()));
        }
        if self.metadata.model_version != version {
            return Err(invalid(format!(
                "metadata.model_version '{}' does not match '{version}'",
                self.metadata.model_version
            )));
        }
        if !self.features.iter().map(String::as_str).eq(FEATURE_COLUMNS) {
            return Err(invalid(format!(
                "feature columns {:?} do not match {:?}",
                self.features, FEATURE_COLUMNS
            )));
        }

        let scorer = self.scorer.build().map_err(invalid)?;
        Ok(LoadedModel::new(self.metadata, scorer))
    }
}

fn is_safe_version(version: &str) -> bool {
    version != ".."
        && version != "."
        && version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && Path::new(version).components().count() == 1
}
