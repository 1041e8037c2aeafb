//! Error types for paso
//!
//! Every fallible operation in the crate returns [`Result`]. Errors carry enough
//! context to locate the offending op, layer, or config field.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for paso operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building models, running steps, or loading configuration.
#[derive(Error, Debug)]
pub enum Error {
    /// Two arrays had incompatible shapes for an operation.
    #[error("Shape mismatch in {op}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        op: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// A sparse class label was not an integer in `[0, classes)`.
    #[error("Invalid label {label} at row {row} (expected integer in [0, {classes}))")]
    InvalidLabel { label: f32, row: usize, classes: usize },

    /// The loss evaluated to NaN or infinity.
    #[error("Non-finite loss: {value}\n  → Lower the learning rate or enable max_grad_norm")]
    NonFiniteLoss { value: f32 },

    /// A gradient contained NaN or infinity.
    #[error("Non-finite gradient for parameter '{param}'\n  → Lower the learning rate or enable max_grad_norm")]
    NonFiniteGradient { param: String },

    /// A functional graph referenced an unknown node or had no output.
    #[error("Invalid model graph: {0}")]
    Graph(String),

    /// Trainer or run configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Two tracked metrics share a name.
    #[error("Duplicate metric name '{0}'\n  → Each tracked metric must have a unique name")]
    DuplicateMetric(String),

    /// A dataset or batch had no rows.
    #[error("Dataset is empty")]
    EmptyDataset,

    /// IO error with the path that caused it.
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error.
    #[error("Failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build a shape mismatch error from two shape slices.
    pub fn shape(op: &'static str, expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            op,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    /// Create an IO error tied to a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error stems from numerical instability rather than misuse.
    pub fn is_numerical(&self) -> bool {
        matches!(
            self,
            Self::NonFiniteLoss { .. } | Self::NonFiniteGradient { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_error_message() {
        let err = Error::shape("matmul", &[2, 3], &[4, 3]);
        let msg = err.to_string();
        assert!(msg.contains("matmul"));
        assert!(msg.contains("[2, 3]"));
        assert!(msg.contains("[4, 3]"));
    }

    #[test]
    fn test_is_numerical() {
        assert!(Error::NonFiniteLoss { value: f32::NAN }.is_numerical());
        assert!(Error::NonFiniteGradient { param: "w".into() }.is_numerical());
        assert!(!Error::EmptyDataset.is_numerical());
    }

    #[test]
    fn test_io_error_keeps_path() {
        let err = Error::io(
            "missing.yaml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "nope"),
        );
        assert!(err.to_string().contains("missing.yaml"));
    }
}
