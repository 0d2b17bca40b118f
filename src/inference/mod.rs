pub mod decision;
pub mod features;
pub mod model;
pub mod normalizer;
pub mod observer;
pub mod pipeline;
pub mod schema;
pub mod validation;

pub use decision::{map_decision, Decision, InvalidScore, RiskScore};
pub use features::{build_features, FeatureRecord, FEATURE_COLUMNS};
pub use model::{ModelError, ModelManager, ModelMetadata};
pub use normalizer::normalize_request;
pub use observer::{NoopObserver, PredictionObserver};
pub use pipeline::{PredictError, PredictionPipeline};
pub use schema::{PredictRequest, PredictResponse, Transaction};
pub use validation::{validate_request, FieldError, ValidationError};
