//! Validation error types

/// Validation error type
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("No models configured (must list at least one)")]
    NoModels,

    #[error("Duplicate model name: {0} (must be unique)")]
    DuplicateModelName(String),

    #[error("Model '{0}' has a zero-width hidden layer (must be > 0)")]
    ZeroWidthLayer(String),

    #[error("Functional model '{0}' has no hidden layers (must have at least one)")]
    FunctionalNeedsHidden(String),

    #[error("Invalid dropout: {0} (must be in [0.0, 1.0))")]
    InvalidDropout(f32),

    #[error("Invalid sample count: {0} (must be > 0)")]
    InvalidSamples(usize),

    #[error("Invalid feature count: {0} (must be > 0)")]
    InvalidFeatures(usize),

    #[error("Invalid class count: {0} (must be >= 2)")]
    InvalidClasses(usize),

    #[error("Invalid spread: {0} (must be >= 0.0)")]
    InvalidSpread(f32),

    #[error("Invalid validation split: {0} (must be in [0.0, 1.0))")]
    InvalidValidationSplit(f32),

    #[error("Validation split {split} of {samples} samples leaves an empty partition (must keep at least one sample on each side)")]
    EmptySplit { samples: usize, split: f32 },

    #[error("Invalid learning rate: {0} (must be > 0.0 and <= 1.0)")]
    InvalidLearningRate(f32),

    #[error("Invalid optimizer: {0} (must be one of: adam, sgd)")]
    InvalidOptimizer(String),

    #[error("Invalid momentum: {0} (must be in [0.0, 1.0))")]
    InvalidMomentum(f32),

    #[error("Invalid beta: {0} (must be in [0.0, 1.0))")]
    InvalidBeta(f32),

    #[error("Invalid epsilon: {0} (must be > 0.0)")]
    InvalidEpsilon(f32),

    #[error("Invalid batch size: {0} (must be > 0)")]
    InvalidBatchSize(usize),

    #[error("Invalid epochs: {0} (must be > 0)")]
    InvalidEpochs(usize),

    #[error("Invalid gradient clip value: {0} (must be > 0.0)")]
    InvalidGradClip(f32),

    #[error("Invalid log interval: {0} (must be > 0)")]
    InvalidLogInterval(usize),

    #[error("Invalid early stopping patience: {0} (must be > 0)")]
    InvalidPatience(usize),

    #[error("Duplicate metric: {0} (must be listed once)")]
    DuplicateMetric(String),

    #[error("Metric {metric} does not fit loss {loss} (sparse metrics need a sparse loss and vice versa)")]
    MetricLossMismatch { metric: String, loss: String },
}
