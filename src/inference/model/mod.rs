pub mod artifact;
pub mod lifecycle;
pub mod scorer;

pub use artifact::{
    ActiveModelConfig, FileModelStore, LoadedModel, ModelArtifact, ModelMetadata, ModelStore,
};
pub use lifecycle::{ModelError, ModelManager};
pub use scorer::{ConstantScorer, LogisticScorer, Scorer, ScorerError, ScorerSpec};
