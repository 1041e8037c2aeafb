//! Configuration validation logic

use super::error::ValidationError;
use crate::config::schema::{
    DataSpec, LossKind, MetricKind, ModelKind, ModelSpec, OptimSpec, RunSpec, TrainingParams,
};
use crate::data::validation_cut;

/// Validate a run specification
///
/// Checks numeric ranges, optimizer names, model wiring and that every metric
/// can read the targets the loss implies.
pub fn validate_config(spec: &RunSpec) -> Result<(), ValidationError> {
    validate_data(&spec.data)?;
    validate_training(&spec.training)?;
    validate_optimizer(&spec.optimizer)?;
    validate_metrics(spec.loss, &spec.metrics)?;
    validate_models(&spec.models)
}

fn validate_data(data: &DataSpec) -> Result<(), ValidationError> {
    if data.samples == 0 {
        return Err(ValidationError::InvalidSamples(data.samples));
    }
    if data.features == 0 {
        return Err(ValidationError::InvalidFeatures(data.features));
    }
    if data.classes < 2 {
        return Err(ValidationError::InvalidClasses(data.classes));
    }
    if data.spread < 0.0 || !data.spread.is_finite() {
        return Err(ValidationError::InvalidSpread(data.spread));
    }
    if !(0.0..1.0).contains(&data.validation_split) {
        return Err(ValidationError::InvalidValidationSplit(data.validation_split));
    }
    if data.validation_split > 0.0 {
        let cut = validation_cut(data.samples, data.validation_split);
        if cut == 0 || cut >= data.samples {
            return Err(ValidationError::EmptySplit {
                samples: data.samples,
                split: data.validation_split,
            });
        }
    }
    Ok(())
}

fn validate_training(training: &TrainingParams) -> Result<(), ValidationError> {
    if training.epochs == 0 {
        return Err(ValidationError::InvalidEpochs(training.epochs));
    }
    if training.batch_size == 0 {
        return Err(ValidationError::InvalidBatchSize(training.batch_size));
    }
    if let Some(clip) = training.max_grad_norm {
        if clip <= 0.0 || !clip.is_finite() {
            return Err(ValidationError::InvalidGradClip(clip));
        }
    }
    if training.log_interval == 0 {
        return Err(ValidationError::InvalidLogInterval(training.log_interval));
    }
    if let Some(es) = &training.early_stopping {
        if es.patience == 0 {
            return Err(ValidationError::InvalidPatience(es.patience));
        }
    }
    Ok(())
}

fn validate_optimizer(optim: &OptimSpec) -> Result<(), ValidationError> {
    let name = optim.name.to_lowercase();
    if !["adam", "sgd"].contains(&name.as_str()) {
        return Err(ValidationError::InvalidOptimizer(optim.name.clone()));
    }
    let lr = optim.learning_rate();
    if lr.is_nan() || lr <= 0.0 || lr > 1.0 {
        return Err(ValidationError::InvalidLearningRate(lr));
    }
    if !(0.0..1.0).contains(&optim.momentum) {
        return Err(ValidationError::InvalidMomentum(optim.momentum));
    }
    for beta in [optim.beta1, optim.beta2] {
        if !(0.0..1.0).contains(&beta) {
            return Err(ValidationError::InvalidBeta(beta));
        }
    }
    if optim.epsilon.is_nan() || optim.epsilon <= 0.0 {
        return Err(ValidationError::InvalidEpsilon(optim.epsilon));
    }
    Ok(())
}

fn validate_metrics(loss: LossKind, metrics: &[MetricKind]) -> Result<(), ValidationError> {
    for (i, metric) in metrics.iter().enumerate() {
        if metrics[..i].contains(metric) {
            return Err(ValidationError::DuplicateMetric(metric.name().to_string()));
        }
        let fits = match metric {
            // resolved against the loss when the trainer is built
            MetricKind::Accuracy => true,
            MetricKind::SparseCategoricalAccuracy => !loss.wants_one_hot(),
            MetricKind::CategoricalAccuracy => loss.wants_one_hot(),
        };
        if !fits {
            return Err(ValidationError::MetricLossMismatch {
                metric: metric.name().to_string(),
                loss: format!("{loss:?}"),
            });
        }
    }
    Ok(())
}

fn validate_models(models: &[ModelSpec]) -> Result<(), ValidationError> {
    if models.is_empty() {
        return Err(ValidationError::NoModels);
    }
    for (i, model) in models.iter().enumerate() {
        if models[..i].iter().any(|m| m.name == model.name) {
            return Err(ValidationError::DuplicateModelName(model.name.clone()));
        }
        if model.hidden.contains(&0) {
            return Err(ValidationError::ZeroWidthLayer(model.name.clone()));
        }
        if model.kind == ModelKind::Functional && model.hidden.is_empty() {
            return Err(ValidationError::FunctionalNeedsHidden(model.name.clone()));
        }
        if !(0.0..1.0).contains(&model.dropout) {
            return Err(ValidationError::InvalidDropout(model.dropout));
        }
    }
    Ok(())
}
