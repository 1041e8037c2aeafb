//! Declarative run configuration
//!
//! A YAML file describes synthetic data, one optimizer/loss/metric setup and
//! any number of models. Every model is trained with the same shared steps.

pub mod builder;
mod loader;
mod schema;
pub mod validate;

pub use builder::{build_loss, build_metric, build_model, build_optimizer, build_trainer};
pub use loader::{
    build_datasets, load_config, parse_config, train_from_spec, train_from_yaml, ModelReport,
};
pub use schema::{
    DataSpec, EarlyStoppingSpec, LossKind, MetricKind, ModelKind, ModelSpec, OptimSpec, RunSpec,
    TrainingParams,
};
pub use validate::{validate_config, ValidationError};
