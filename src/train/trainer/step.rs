//! The shared train and eval steps

use super::core::Trainer;
use crate::autograd::Tape;
use crate::model::Model;
use crate::nn::Mode;
use crate::train::{Batch, Logs, NonFinitePolicy};
use crate::{Error, Result};
use ndarray::Array2;

impl<M: Model> Trainer<M> {
    /// Run one optimization step on `batch`
    ///
    /// Forward in training mode on a recording tape, compute the loss,
    /// differentiate it with respect to every trainable parameter, apply the
    /// optimizer, then fold the batch into every tracked metric. Returns the
    /// current value of every tracked metric.
    ///
    /// Shapes, labels and finiteness are all checked before the first
    /// mutation: on error, parameters and metrics are exactly as before.
    /// The forward pass has already run by then, so dropout layers have
    /// consumed one mask each.
    pub fn train_step(&mut self, batch: &Batch) -> Result<Logs> {
        check_batch(batch)?;
        let tape = Tape::record();
        let inputs = tape.constant(batch.inputs.clone());
        let y_pred = self.model.forward(&tape, &inputs, Mode::Training)?;
        let loss = self.loss.forward(&tape, &y_pred, &batch.targets)?;
        self.validate_metrics(&batch.targets, y_pred.value())?;

        let loss_value = loss.scalar();
        if !loss_value.is_finite() {
            return self.reject_non_finite(Error::NonFiniteLoss { value: loss_value });
        }

        let params = self.model.trainable_parameters();
        let mut grads = tape.gradient(&loss, &params)?;
        if let Some(param) = grads.first_non_finite() {
            let err = Error::NonFiniteGradient {
                param: param.name().to_string(),
            };
            return self.reject_non_finite(err);
        }
        if let Some(max_norm) = self.config.max_grad_norm {
            let norm = grads.clip_by_global_norm(max_norm);
            if norm > max_norm {
                tracing::trace!(norm, max_norm, "clipped gradients");
            }
        }

        self.optimizer.apply_gradients(&grads);
        self.update_metrics(&batch.targets, y_pred.value(), loss_value);
        tracing::trace!(
            model = self.model.name(),
            iteration = self.optimizer.iterations(),
            loss = loss_value,
            "train step"
        );
        Ok(self.logs())
    }

    /// Score `batch` without touching parameters
    ///
    /// Forward in inference mode (dropout disabled) on a non-recording tape;
    /// only metric state changes.
    pub fn eval_step(&mut self, batch: &Batch) -> Result<Logs> {
        check_batch(batch)?;
        let tape = Tape::inference();
        let inputs = tape.constant(batch.inputs.clone());
        let y_pred = self.model.forward(&tape, &inputs, Mode::Inference)?;
        let loss = self.loss.forward(&tape, &y_pred, &batch.targets)?;
        self.validate_metrics(&batch.targets, y_pred.value())?;

        let loss_value = loss.scalar();
        if !loss_value.is_finite() {
            return self.reject_non_finite(Error::NonFiniteLoss { value: loss_value });
        }

        self.update_metrics(&batch.targets, y_pred.value(), loss_value);
        Ok(self.logs())
    }

    fn validate_metrics(&self, y_true: &Array2<f32>, y_pred: &Array2<f32>) -> Result<()> {
        self.metrics
            .iter()
            .skip(1)
            .try_for_each(|m| m.validate(y_true, y_pred))
    }

    fn update_metrics(&mut self, y_true: &Array2<f32>, y_pred: &Array2<f32>, loss: f32) {
        let loss = Array2::from_elem((1, 1), loss);
        let (tracker, rest) = self.metrics.split_at_mut(1);
        tracker[0].update_state(y_true, &loss);
        for metric in rest {
            metric.update_state(y_true, y_pred);
        }
    }

    fn reject_non_finite(&mut self, err: Error) -> Result<Logs> {
        match self.config.non_finite {
            NonFinitePolicy::Fail => Err(err),
            NonFinitePolicy::SkipUpdate => {
                self.skipped_steps += 1;
                tracing::warn!(
                    model = self.model.name(),
                    skipped = self.skipped_steps,
                    "skipping step: {err}"
                );
                Ok(self.logs())
            }
        }
    }
}

fn check_batch(batch: &Batch) -> Result<()> {
    if batch.is_empty() {
        return Err(Error::EmptyDataset);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::autograd::{Parameter, Tape, Var};
    use crate::model::{Model, Sequential};
    use crate::nn::{Activation, Dense, Dropout, Mode};
    use crate::optim::Sgd;
    use crate::train::loss::{MeanSquaredError, SparseCategoricalCrossentropy};
    use crate::train::metrics::SparseCategoricalAccuracy;
    use crate::train::{Batch, NonFinitePolicy, TrainConfig, Trainer};
    use crate::{Error, Result};
    use approx::assert_relative_eq;
    use ndarray::array;

    /// `y = w * x` with a single scalar weight
    struct Scalar {
        w: Parameter,
    }

    impl Scalar {
        fn new(w: f32) -> Self {
            Self {
                w: Parameter::new("w", array![[w]]),
            }
        }
    }

    impl Model for Scalar {
        fn forward(&self, tape: &Tape, input: &Var, _mode: Mode) -> Result<Var> {
            tape.matmul(input, &tape.param(&self.w))
        }

        fn trainable_parameters(&self) -> Vec<Parameter> {
            vec![self.w.clone()]
        }

        fn name(&self) -> &str {
            "scalar"
        }
    }

    fn scalar_trainer(w: f32, config: TrainConfig) -> Trainer<Scalar> {
        Trainer::builder(Scalar::new(w))
            .optimizer(Sgd::new(0.1))
            .loss(MeanSquaredError)
            .config(config)
            .build()
            .unwrap()
    }

    fn classifier() -> Trainer<Sequential> {
        let dense = Dense::from_weights(
            "out",
            array![[1.0, -1.0], [-1.0, 1.0]],
            array![[0.0, 0.0]],
            Activation::Softmax,
        )
        .unwrap();
        Trainer::builder(Sequential::new("clf").add(dense))
            .optimizer(Sgd::new(0.5))
            .loss(SparseCategoricalCrossentropy::default())
            .metric(SparseCategoricalAccuracy::new())
            .build()
            .unwrap()
    }

    #[test]
    fn test_train_step_applies_sgd_update() {
        let mut trainer = scalar_trainer(0.0, TrainConfig::default());
        let batch = Batch::new(array![[1.0]], array![[2.0]]).unwrap();
        let logs = trainer.train_step(&batch).unwrap();

        // loss = (w - 2)² = 4, dL/dw = 2(w - 2) = -4, w' = 0 - 0.1 * -4
        assert_relative_eq!(logs["loss"], 4.0);
        assert_relative_eq!(trainer.model().w.value()[[0, 0]], 0.4, epsilon = 1e-6);
        assert_eq!(trainer.optimizer().iterations(), 1);
    }

    #[test]
    fn test_eval_step_does_not_update() {
        let mut trainer = scalar_trainer(0.0, TrainConfig::default());
        let batch = Batch::new(array![[1.0]], array![[2.0]]).unwrap();
        trainer.eval_step(&batch).unwrap();
        assert_eq!(trainer.model().w.value()[[0, 0]], 0.0);
        assert_eq!(trainer.optimizer().iterations(), 0);
    }

    #[test]
    fn test_invalid_label_leaves_state_untouched() {
        let mut trainer = classifier();
        let good = Batch::new(array![[1.0, 0.0]], array![[0.0]]).unwrap();
        trainer.eval_step(&good).unwrap();
        let logs_before = trainer.logs();
        let kernel_before = trainer.model().trainable_parameters()[0].to_array();

        let bad = Batch::new(array![[1.0, 0.0]], array![[7.0]]).unwrap();
        assert!(matches!(
            trainer.train_step(&bad),
            Err(Error::InvalidLabel { label, .. }) if label == 7.0
        ));
        assert_eq!(trainer.logs(), logs_before);
        assert_eq!(trainer.model().trainable_parameters()[0].to_array(), kernel_before);
        assert_eq!(trainer.optimizer().iterations(), 0);
    }

    #[test]
    fn test_metric_shape_error_is_atomic() {
        // MSE accepts the shapes but the sparse metric rejects a 2-column target
        let dense = Dense::from_weights("d", array![[1.0, 0.0], [0.0, 1.0]], array![[0.0, 0.0]], Activation::Linear)
            .unwrap();
        let mut trainer = Trainer::builder(Sequential::new("reg").add(dense))
            .optimizer(Sgd::new(0.1))
            .loss(MeanSquaredError)
            .metric(SparseCategoricalAccuracy::new())
            .build()
            .unwrap();
        let batch = Batch::new(array![[1.0, 2.0]], array![[0.0, 1.0]]).unwrap();
        assert!(matches!(trainer.train_step(&batch), Err(Error::ShapeMismatch { .. })));
        assert_eq!(trainer.tracked_metrics()[0].result(), 0.0);
        assert_eq!(
            trainer.model().trainable_parameters()[0].to_array(),
            array![[1.0, 0.0], [0.0, 1.0]]
        );
    }

    #[test]
    fn test_non_finite_loss_fails_by_default() {
        let mut trainer = scalar_trainer(1.0, TrainConfig::default());
        let batch = Batch::new(array![[f32::INFINITY]], array![[0.0]]).unwrap();
        assert!(matches!(trainer.train_step(&batch), Err(Error::NonFiniteLoss { .. })));
        assert_eq!(trainer.model().w.value()[[0, 0]], 1.0);
        assert_eq!(trainer.tracked_metrics()[0].result(), 0.0);
    }

    #[test]
    fn test_non_finite_skip_update() {
        let config = TrainConfig::new().with_non_finite(NonFinitePolicy::SkipUpdate);
        let mut trainer = scalar_trainer(1.0, config);
        let bad = Batch::new(array![[f32::NAN]], array![[0.0]]).unwrap();
        let logs = trainer.train_step(&bad).unwrap();
        assert_eq!(logs["loss"], 0.0);
        assert_eq!(trainer.skipped_steps(), 1);
        assert_eq!(trainer.model().w.value()[[0, 0]], 1.0);

        let good = Batch::new(array![[1.0]], array![[0.0]]).unwrap();
        trainer.train_step(&good).unwrap();
        assert_eq!(trainer.skipped_steps(), 1);
        assert!(trainer.model().w.value()[[0, 0]] < 1.0);
    }

    #[test]
    fn test_gradient_clipping_bounds_update() {
        let mut trainer = scalar_trainer(0.0, TrainConfig::new().with_grad_clip(1.0));
        let batch = Batch::new(array![[1.0]], array![[10.0]]).unwrap();
        trainer.train_step(&batch).unwrap();
        // raw gradient -20 is clipped to -1
        assert_relative_eq!(trainer.model().w.value()[[0, 0]], 0.1, epsilon = 1e-6);
    }

    #[test]
    fn test_empty_batch_rejected() {
        let mut trainer = scalar_trainer(0.0, TrainConfig::default());
        let empty = Batch::new(ndarray::Array2::zeros((0, 1)), ndarray::Array2::zeros((0, 1))).unwrap();
        assert!(matches!(trainer.train_step(&empty), Err(Error::EmptyDataset)));
        assert!(matches!(trainer.eval_step(&empty), Err(Error::EmptyDataset)));
    }

    #[test]
    fn test_rejected_step_advances_dropout_masks() {
        let dropout_classifier = || {
            let dense = Dense::from_weights(
                "out",
                array![[1.0, -1.0], [-1.0, 1.0]],
                array![[0.0, 0.0]],
                Activation::Softmax,
            )
            .unwrap();
            Sequential::new("clf")
                .add(Dropout::new("dropout", 0.5, 11).unwrap())
                .add(dense)
        };
        let mut trainer = Trainer::builder(dropout_classifier())
            .optimizer(Sgd::new(0.5))
            .loss(SparseCategoricalCrossentropy::default())
            .build()
            .unwrap();
        let bad = Batch::new(ndarray::Array2::ones((32, 2)), ndarray::Array2::from_elem((32, 1), 5.0)).unwrap();
        assert!(matches!(trainer.train_step(&bad), Err(Error::InvalidLabel { .. })));

        let reference = dropout_classifier();
        let tape = Tape::record();
        let x = tape.constant(ndarray::Array2::ones((32, 2)));
        let skipped = reference.forward(&tape, &x, Mode::Training).unwrap();
        let next = reference.forward(&tape, &x, Mode::Training).unwrap();
        let after_failure = trainer.model().forward(&tape, &x, Mode::Training).unwrap();
        assert_eq!(after_failure.value(), next.value());
        assert_ne!(after_failure.value(), skipped.value());
    }

    #[test]
    fn test_eval_disables_dropout() {
        let model = Sequential::new("drop")
            .add(Dropout::new("dropout", 0.5, 3).unwrap())
            .add(Dense::from_weights("d", array![[1.0]], array![[0.0]], Activation::Linear).unwrap());
        let mut trainer = Trainer::builder(model)
            .optimizer(Sgd::new(0.0))
            .loss(MeanSquaredError)
            .build()
            .unwrap();
        let batch = Batch::new(array![[1.0], [2.0], [3.0]], array![[1.0], [2.0], [3.0]]).unwrap();
        let logs = trainer.eval_step(&batch).unwrap();
        assert_eq!(logs["loss"], 0.0);
    }
}
