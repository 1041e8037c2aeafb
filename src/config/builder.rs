//! Build training components from configuration

use super::schema::{LossKind, MetricKind, ModelKind, ModelSpec, OptimSpec, RunSpec};
use crate::error::{Error, Result};
use crate::model::{FunctionalBuilder, Model, Sequential};
use crate::nn::{Activation, Concatenate, Dense, Dropout};
use crate::optim::{Adam, Optimizer, Sgd};
use crate::train::callback::{EarlyStopping, ProgressLogger};
use crate::train::{
    CategoricalAccuracy, CategoricalCrossentropy, Loss, MeanSquaredError, Metric,
    SparseCategoricalAccuracy, SparseCategoricalCrossentropy, TrainConfig, Trainer,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Build optimizer from configuration
pub fn build_optimizer(spec: &OptimSpec) -> Result<Box<dyn Optimizer>> {
    let lr = spec.learning_rate();
    match spec.name.to_lowercase().as_str() {
        "sgd" => Ok(Box::new(Sgd::with_momentum(lr, spec.momentum, spec.nesterov))),
        "adam" => Ok(Box::new(Adam::new(lr, spec.beta1, spec.beta2, spec.epsilon))),
        name => Err(Error::Config(format!(
            "Unknown optimizer: {name}. Supported: sgd, adam"
        ))),
    }
}

pub fn build_loss(kind: LossKind) -> Box<dyn Loss> {
    match kind {
        LossKind::SparseCategoricalCrossentropy => Box::new(SparseCategoricalCrossentropy::default()),
        LossKind::CategoricalCrossentropy => Box::new(CategoricalCrossentropy::default()),
        LossKind::MeanSquaredError => Box::new(MeanSquaredError),
    }
}

/// Build a metric reading the targets `loss` is trained against
///
/// `accuracy` resolves to the sparse or categorical variant depending on
/// whether the loss takes class indices or one-hot rows, and keeps its
/// `accuracy` log key.
pub fn build_metric(kind: MetricKind, loss: LossKind) -> Box<dyn Metric> {
    match kind {
        MetricKind::Accuracy if loss.wants_one_hot() => Box::new(CategoricalAccuracy::named(kind.name())),
        MetricKind::Accuracy => Box::new(SparseCategoricalAccuracy::named(kind.name())),
        MetricKind::SparseCategoricalAccuracy => Box::new(SparseCategoricalAccuracy::new()),
        MetricKind::CategoricalAccuracy => Box::new(CategoricalAccuracy::new()),
    }
}

/// Build a classifier mapping `features` inputs to `classes` probabilities
///
/// Weight initialization and dropout masks are derived from `seed`.
pub fn build_model(spec: &ModelSpec, features: usize, classes: usize, seed: u64) -> Result<Box<dyn Model>> {
    let mut rng = StdRng::seed_from_u64(seed);
    match spec.kind {
        ModelKind::Sequential => {
            let mut model = Sequential::new(&spec.name);
            let mut width = features;
            for (i, &units) in spec.hidden.iter().enumerate() {
                model.push(Box::new(Dense::new(format!("dense_{i}"), width, units, Activation::Relu, &mut rng)));
                if spec.dropout > 0.0 {
                    model.push(Box::new(Dropout::new(
                        format!("dropout_{i}"),
                        spec.dropout,
                        seed.wrapping_add(i as u64 + 1),
                    )?));
                }
                width = units;
            }
            model.push(Box::new(Dense::new("output", width, classes, Activation::Softmax, &mut rng)));
            Ok(Box::new(model))
        }
        ModelKind::Functional => {
            if spec.hidden.is_empty() {
                return Err(Error::Config(format!(
                    "functional model '{}' needs at least one hidden layer",
                    spec.name
                )));
            }
            let mut graph = FunctionalBuilder::new(&spec.name);
            let input = graph.input();
            let mut deep = input;
            let mut width = features;
            for (i, &units) in spec.hidden.iter().enumerate() {
                deep = graph.apply(
                    Dense::new(format!("deep_{i}"), width, units, Activation::Relu, &mut rng),
                    &[deep],
                )?;
                if spec.dropout > 0.0 {
                    deep = graph.apply(
                        Dropout::new(format!("dropout_{i}"), spec.dropout, seed.wrapping_add(i as u64 + 1))?,
                        &[deep],
                    )?;
                }
                width = units;
            }
            let merged = graph.apply(Concatenate::new("wide_and_deep"), &[input, deep])?;
            let output = graph.apply(
                Dense::new("output", features + width, classes, Activation::Softmax, &mut rng),
                &[merged],
            )?;
            Ok(Box::new(graph.build(output)?))
        }
    }
}

/// Assemble a trainer for `model` from the run's optimizer, loss, metrics
/// and step settings
///
/// Each call builds a fresh optimizer so trainers never share slot state.
pub fn build_trainer(spec: &RunSpec, model: Box<dyn Model>) -> Result<Trainer<Box<dyn Model>>> {
    let training = &spec.training;
    let mut config = TrainConfig::new()
        .with_non_finite(training.non_finite)
        .with_log_interval(training.log_interval);
    if let Some(max_norm) = training.max_grad_norm {
        config = config.with_grad_clip(max_norm);
    }

    let mut builder = Trainer::builder(model)
        .optimizer(build_optimizer(&spec.optimizer)?)
        .loss(build_loss(spec.loss))
        .config(config);
    for &kind in &spec.metrics {
        builder = builder.metric(build_metric(kind, spec.loss));
    }
    let mut trainer = builder.build()?;

    trainer.add_callback(ProgressLogger::new(training.log_interval));
    if let Some(es) = &training.early_stopping {
        trainer.add_callback(EarlyStopping::new(&es.monitor, es.patience, es.min_delta));
    }
    Ok(trainer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::Tape;
    use crate::config::schema::{EarlyStoppingSpec, TrainingParams};
    use crate::nn::Mode;
    use crate::train::Batch;
    use approx::assert_relative_eq;
    use ndarray::Array2;

    fn model_spec(kind: ModelKind, hidden: Vec<usize>, dropout: f32) -> ModelSpec {
        ModelSpec {
            name: "m".into(),
            kind,
            hidden,
            dropout,
        }
    }

    fn run_spec() -> RunSpec {
        RunSpec {
            seed: 3,
            data: Default::default(),
            training: TrainingParams::default(),
            optimizer: OptimSpec::default(),
            loss: LossKind::SparseCategoricalCrossentropy,
            metrics: vec![MetricKind::SparseCategoricalAccuracy, MetricKind::Accuracy],
            models: vec![model_spec(ModelKind::Sequential, vec![8], 0.0)],
        }
    }

    #[test]
    fn test_build_optimizer() {
        let sgd = build_optimizer(&OptimSpec {
            name: "SGD".into(),
            lr: Some(0.1),
            ..OptimSpec::default()
        })
        .unwrap();
        assert_eq!(sgd.name(), "sgd");
        assert_eq!(sgd.lr(), 0.1);

        let adam = build_optimizer(&OptimSpec::default()).unwrap();
        assert_eq!(adam.name(), "adam");
        assert_eq!(adam.lr(), 0.001);
    }

    #[test]
    fn test_build_optimizer_unknown() {
        let err = build_optimizer(&OptimSpec {
            name: "lbfgs".into(),
            ..OptimSpec::default()
        })
        .err()
        .unwrap();
        assert!(err.to_string().contains("Unknown optimizer: lbfgs"));
    }

    #[test]
    fn test_build_loss_and_metric_names() {
        assert_eq!(build_loss(LossKind::MeanSquaredError).name(), "mean_squared_error");
        assert_eq!(
            build_metric(MetricKind::CategoricalAccuracy, LossKind::CategoricalCrossentropy).name(),
            MetricKind::CategoricalAccuracy.name()
        );
    }

    #[test]
    fn test_accuracy_follows_target_encoding() {
        let probs = Array2::from_shape_vec((2, 3), vec![0.7, 0.2, 0.1, 0.1, 0.3, 0.6]).unwrap();

        let mut sparse = build_metric(MetricKind::Accuracy, LossKind::SparseCategoricalCrossentropy);
        let labels = Array2::from_shape_vec((2, 1), vec![0.0, 1.0]).unwrap();
        sparse.validate(&labels, &probs).unwrap();
        sparse.update_state(&labels, &probs);
        assert_eq!(sparse.name(), "accuracy");
        assert_relative_eq!(sparse.result(), 0.5);

        let mut dense = build_metric(MetricKind::Accuracy, LossKind::CategoricalCrossentropy);
        let one_hot = Array2::from_shape_vec((2, 3), vec![1.0, 0.0, 0.0, 0.0, 0.0, 1.0]).unwrap();
        dense.validate(&one_hot, &probs).unwrap();
        dense.update_state(&one_hot, &probs);
        assert_eq!(dense.name(), "accuracy");
        assert_relative_eq!(dense.result(), 1.0);
    }

    #[test]
    fn test_sequential_model_shapes() {
        let model = build_model(&model_spec(ModelKind::Sequential, vec![8, 6], 0.5), 4, 3, 1).unwrap();
        assert_eq!(model.parameter_count(), 4 * 8 + 8 + 8 * 6 + 6 + 6 * 3 + 3);
        let tape = Tape::inference();
        let x = tape.constant(Array2::ones((5, 4)));
        let y = model.forward(&tape, &x, Mode::Inference).unwrap();
        assert_eq!(y.shape(), (5, 3));
    }

    #[test]
    fn test_functional_model_concatenates_input() {
        let model = build_model(&model_spec(ModelKind::Functional, vec![8], 0.0), 4, 3, 1).unwrap();
        // deep 4x8 + 8, output (4 + 8)x3 + 3
        assert_eq!(model.parameter_count(), 4 * 8 + 8 + 12 * 3 + 3);
        let tape = Tape::inference();
        let x = tape.constant(Array2::ones((2, 4)));
        let y = model.forward(&tape, &x, Mode::Inference).unwrap();
        assert_eq!(y.shape(), (2, 3));
    }

    #[test]
    fn test_functional_without_hidden_rejected() {
        assert!(build_model(&model_spec(ModelKind::Functional, vec![], 0.0), 4, 3, 1).is_err());
    }

    #[test]
    fn test_same_seed_same_weights() {
        let spec = model_spec(ModelKind::Sequential, vec![4], 0.0);
        let a = build_model(&spec, 3, 2, 9).unwrap();
        let b = build_model(&spec, 3, 2, 9).unwrap();
        for (p, q) in a.trainable_parameters().iter().zip(b.trainable_parameters()) {
            assert_eq!(*p.value(), *q.value());
        }
    }

    #[test]
    fn test_build_trainer() {
        let mut spec = run_spec();
        spec.training.early_stopping = Some(EarlyStoppingSpec::default());
        spec.training.max_grad_norm = Some(1.0);
        let model = build_model(&spec.models[0], 4, 3, spec.seed).unwrap();
        let mut trainer = build_trainer(&spec, model).unwrap();
        assert_eq!(
            trainer.metric_names(),
            ["loss", "sparse_categorical_accuracy", "accuracy"]
        );
        let inputs = Array2::ones((4, 4));
        let labels = Array2::from_shape_vec((4, 1), vec![0.0, 1.0, 2.0, 1.0]).unwrap();
        let logs = trainer.train_step(&Batch::new(inputs, labels).unwrap()).unwrap();
        assert_eq!(logs["accuracy"], logs["sparse_categorical_accuracy"]);
        assert_eq!(trainer.config().max_grad_norm, Some(1.0));
        assert_eq!(trainer.callbacks().names(), ["ProgressLogger", "EarlyStopping"]);
    }
}
