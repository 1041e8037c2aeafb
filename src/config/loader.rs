//! Load a run from YAML and train every configured model

use super::builder::{build_model, build_trainer};
use super::schema::RunSpec;
use super::validate::validate_config;
use crate::data::synthetic::{blobs, BlobSpec};
use crate::data::ArrayDataset;
use crate::error::{Error, Result};
use crate::model::Model;
use crate::train::{FitOptions, History};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Outcome of training one configured model
#[derive(Debug, Clone, Serialize)]
pub struct ModelReport {
    pub model: String,
    pub parameters: usize,
    /// Steps dropped because of a non-finite loss or gradient
    pub skipped_steps: u64,
    pub history: History,
}

/// Parse and validate a YAML run specification
pub fn parse_config(yaml: &str) -> Result<RunSpec> {
    let spec: RunSpec = serde_yaml::from_str(yaml)?;
    validate_config(&spec).map_err(|e| Error::Config(format!("Invalid config: {e}")))?;
    Ok(spec)
}

/// Load and validate a run specification from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RunSpec> {
    let path = path.as_ref();
    let yaml = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_config(&yaml)
}

/// Generate the run's training set and optional validation set
///
/// Targets are one-hot encoded when the configured loss expects it.
pub fn build_datasets(spec: &RunSpec) -> Result<(ArrayDataset, Option<ArrayDataset>)> {
    let data = &spec.data;
    let mut dataset = blobs(
        BlobSpec {
            samples: data.samples,
            features: data.features,
            classes: data.classes,
            spread: data.spread,
        },
        spec.seed,
    )?;
    if spec.loss.wants_one_hot() {
        dataset = dataset.one_hot(data.classes)?;
    }
    if data.validation_split > 0.0 {
        let (train, val) = dataset.split_validation(data.validation_split)?;
        Ok((train, Some(val)))
    } else {
        Ok((dataset, None))
    }
}

/// Train every model in `spec` on the same data with the same setup
///
/// Models are trained in configuration order. Each gets its own optimizer
/// and metric state; model `i` is initialized from `seed + i`.
pub fn train_from_spec(spec: &RunSpec) -> Result<Vec<ModelReport>> {
    validate_config(spec).map_err(|e| Error::Config(format!("Invalid config: {e}")))?;
    let (train, validation) = build_datasets(spec)?;
    tracing::info!(
        train = train.len(),
        validation = validation.as_ref().map_or(0, ArrayDataset::len),
        models = spec.models.len(),
        "dataset ready"
    );

    let options = FitOptions::new(spec.training.epochs, spec.training.batch_size)
        .with_shuffle(spec.training.shuffle)
        .with_seed(spec.seed);

    let mut reports = Vec::with_capacity(spec.models.len());
    for (i, model_spec) in spec.models.iter().enumerate() {
        let model = build_model(
            model_spec,
            spec.data.features,
            spec.data.classes,
            spec.seed.wrapping_add(i as u64),
        )?;
        let parameters = model.parameter_count();
        tracing::info!(model = %model_spec.name, parameters, "training model");

        let mut trainer = build_trainer(spec, model)?;
        let history = trainer.fit(&train, validation.as_ref(), &options)?;
        reports.push(ModelReport {
            model: model_spec.name.clone(),
            parameters,
            skipped_steps: trainer.skipped_steps(),
            history,
        });
    }
    Ok(reports)
}

/// Load a YAML run and train it
pub fn train_from_yaml<P: AsRef<Path>>(path: P) -> Result<Vec<ModelReport>> {
    let spec = load_config(path)?;
    train_from_spec(&spec)
}
