//! YAML schema for a training run
//!
//! A run trains every entry of `models` with the same data, optimizer
//! settings, loss and metrics. Omitted sections fall back to defaults.

use crate::train::NonFinitePolicy;
use serde::{Deserialize, Serialize};

/// Complete run specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSpec {
    /// Seed for data generation, initialization, dropout and shuffling
    #[serde(default)]
    pub seed: u64,

    #[serde(default)]
    pub data: DataSpec,

    #[serde(default)]
    pub training: TrainingParams,

    #[serde(default)]
    pub optimizer: OptimSpec,

    #[serde(default)]
    pub loss: LossKind,

    /// Metrics tracked after the loss, in log order
    #[serde(default = "default_metrics")]
    pub metrics: Vec<MetricKind>,

    /// Models trained one after another with the same setup
    pub models: Vec<ModelSpec>,
}

fn default_metrics() -> Vec<MetricKind> {
    vec![MetricKind::SparseCategoricalAccuracy]
}

/// Synthetic classification data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSpec {
    pub samples: usize,
    pub features: usize,
    pub classes: usize,
    /// Standard deviation of each class cluster
    pub spread: f32,
    /// Fraction of samples held out for validation; 0 disables validation
    pub validation_split: f32,
}

impl Default for DataSpec {
    fn default() -> Self {
        Self {
            samples: 600,
            features: 4,
            classes: 3,
            spread: 0.5,
            validation_split: 0.2,
        }
    }
}

/// Training hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingParams {
    pub epochs: usize,
    pub batch_size: usize,
    pub shuffle: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_grad_norm: Option<f32>,
    pub non_finite: NonFinitePolicy,
    /// Emit a progress line every N batches
    pub log_interval: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub early_stopping: Option<EarlyStoppingSpec>,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            epochs: 10,
            batch_size: 32,
            shuffle: true,
            max_grad_norm: None,
            non_finite: NonFinitePolicy::Fail,
            log_interval: 50,
            early_stopping: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EarlyStoppingSpec {
    pub monitor: String,
    pub patience: usize,
    pub min_delta: f32,
}

impl Default for EarlyStoppingSpec {
    fn default() -> Self {
        Self {
            monitor: "val_loss".to_string(),
            patience: 3,
            min_delta: 0.0,
        }
    }
}

/// Optimizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimSpec {
    /// `sgd` or `adam`
    pub name: String,
    /// Learning rate; the optimizer's default when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lr: Option<f32>,
    pub momentum: f32,
    pub nesterov: bool,
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
}

impl Default for OptimSpec {
    fn default() -> Self {
        Self {
            name: "adam".to_string(),
            lr: None,
            momentum: 0.0,
            nesterov: false,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
        }
    }
}

impl OptimSpec {
    /// Learning rate after applying the per-optimizer default
    pub fn learning_rate(&self) -> f32 {
        self.lr.unwrap_or(match self.name.to_lowercase().as_str() {
            "sgd" => 0.01,
            _ => 0.001,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossKind {
    #[default]
    SparseCategoricalCrossentropy,
    CategoricalCrossentropy,
    MeanSquaredError,
}

impl LossKind {
    /// Whether the loss expects one-hot targets instead of class indices
    pub fn wants_one_hot(self) -> bool {
        !matches!(self, LossKind::SparseCategoricalCrossentropy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Accuracy,
    SparseCategoricalAccuracy,
    CategoricalAccuracy,
}

impl MetricKind {
    pub fn name(self) -> &'static str {
        match self {
            MetricKind::Accuracy => "accuracy",
            MetricKind::SparseCategoricalAccuracy => "sparse_categorical_accuracy",
            MetricKind::CategoricalAccuracy => "categorical_accuracy",
        }
    }
}

/// How a model's layers are wired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Hidden layers stacked, then a softmax output
    #[default]
    Sequential,
    /// Hidden layers stacked, then the raw input concatenated back in
    /// before the softmax output (wide and deep)
    Functional,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub name: String,
    #[serde(default)]
    pub kind: ModelKind,
    /// Units of each ReLU hidden layer
    #[serde(default = "default_hidden")]
    pub hidden: Vec<usize>,
    /// Dropout rate after each hidden layer; 0 disables dropout
    #[serde(default)]
    pub dropout: f32,
}

fn default_hidden() -> Vec<usize> {
    vec![32]
}
