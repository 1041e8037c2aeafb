//! Core Trainer struct, its builder, and the `Model` delegation

use crate::autograd::{Parameter, Tape, Var};
use crate::model::Model;
use crate::nn::Mode;
use crate::optim::Optimizer;
use crate::train::callback::{CallbackManager, TrainerCallback};
use crate::train::loss::Loss;
use crate::train::metrics::{Mean, Metric};
use crate::train::{Logs, TrainConfig};
use crate::{Error, Result};

/// Name of the loss tracker that always leads the tracked metrics
pub const LOSS_METRIC: &str = "loss";

/// Owns a model and trains it with one shared step implementation
///
/// The model is moved in at construction and dropped with the trainer.
/// Any [`Model`] works: the train and eval steps only use `forward` and
/// `trainable_parameters`.
///
/// # Example
///
/// ```
/// use paso::model::Sequential;
/// use paso::nn::{Activation, Dense};
/// use paso::optim::Adam;
/// use paso::train::{Batch, SparseCategoricalAccuracy, SparseCategoricalCrossentropy, Trainer};
/// use ndarray::array;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let model = Sequential::new("clf").add(Dense::new("out", 2, 2, Activation::Softmax, &mut rng));
/// let mut trainer = Trainer::builder(model)
///     .optimizer(Adam::default())
///     .loss(SparseCategoricalCrossentropy::default())
///     .metric(SparseCategoricalAccuracy::new())
///     .build()
///     .unwrap();
///
/// let batch = Batch::new(array![[1.0, 0.0], [0.0, 1.0]], array![[0.0], [1.0]]).unwrap();
/// let logs = trainer.train_step(&batch).unwrap();
/// assert!(logs.contains_key("loss"));
/// assert!(logs.contains_key("sparse_categorical_accuracy"));
/// ```
pub struct Trainer<M: Model> {
    pub(crate) model: M,
    pub(crate) optimizer: Box<dyn Optimizer>,
    pub(crate) loss: Box<dyn Loss>,
    /// `metrics[0]` is the loss tracker
    pub(crate) metrics: Vec<Box<dyn Metric>>,
    pub(crate) config: TrainConfig,
    pub(crate) callbacks: CallbackManager,
    pub(crate) skipped_steps: u64,
}

impl<M: Model> Trainer<M> {
    /// Start building a trainer around `model`
    pub fn builder(model: M) -> TrainerBuilder<M> {
        TrainerBuilder::new(model)
    }

    /// Every tracked accumulator, loss tracker first
    ///
    /// The set is fixed at construction; repeated calls return the same
    /// accumulators.
    pub fn tracked_metrics(&self) -> &[Box<dyn Metric>] {
        &self.metrics
    }

    /// Names of the tracked metrics, in log order
    pub fn metric_names(&self) -> Vec<&str> {
        self.metrics.iter().map(|m| m.name()).collect()
    }

    /// Clear every accumulator; steps never do this themselves
    pub fn reset_metrics(&mut self) {
        for metric in &mut self.metrics {
            metric.reset_state();
        }
    }

    /// Current value of every tracked metric
    pub fn logs(&self) -> Logs {
        self.metrics
            .iter()
            .map(|m| (m.name().to_string(), m.result()))
            .collect()
    }

    /// Add a callback fired by [`fit`](Trainer::fit)
    pub fn add_callback<C: TrainerCallback + 'static>(&mut self, callback: C) {
        self.callbacks.add(callback);
    }

    pub fn callbacks(&self) -> &CallbackManager {
        &self.callbacks
    }

    pub fn lr(&self) -> f32 {
        self.optimizer.lr()
    }

    pub fn set_lr(&mut self, lr: f32) {
        self.optimizer.set_lr(lr);
    }

    pub fn optimizer(&self) -> &dyn Optimizer {
        self.optimizer.as_ref()
    }

    pub fn loss(&self) -> &dyn Loss {
        self.loss.as_ref()
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Give the model back, dropping the optimizer and metric state
    pub fn into_model(self) -> M {
        self.model
    }

    /// Steps dropped under [`NonFinitePolicy::SkipUpdate`](crate::train::NonFinitePolicy::SkipUpdate)
    pub fn skipped_steps(&self) -> u64 {
        self.skipped_steps
    }
}

impl<M: Model> Model for Trainer<M> {
    fn forward(&self, tape: &Tape, input: &Var, mode: Mode) -> Result<Var> {
        self.model.forward(tape, input, mode)
    }

    fn trainable_parameters(&self) -> Vec<Parameter> {
        self.model.trainable_parameters()
    }

    fn name(&self) -> &str {
        self.model.name()
    }
}

/// Builder for [`Trainer`]
pub struct TrainerBuilder<M: Model> {
    model: M,
    optimizer: Option<Box<dyn Optimizer>>,
    loss: Option<Box<dyn Loss>>,
    metrics: Vec<Box<dyn Metric>>,
    config: TrainConfig,
}

impl<M: Model> TrainerBuilder<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            optimizer: None,
            loss: None,
            metrics: Vec::new(),
            config: TrainConfig::default(),
        }
    }

    pub fn optimizer<O: Optimizer + 'static>(mut self, optimizer: O) -> Self {
        self.optimizer = Some(Box::new(optimizer));
        self
    }

    pub fn loss<L: Loss + 'static>(mut self, loss: L) -> Self {
        self.loss = Some(Box::new(loss));
        self
    }

    /// Track an additional metric; order of calls is the log order
    pub fn metric<T: Metric + 'static>(mut self, metric: T) -> Self {
        self.metrics.push(Box::new(metric));
        self
    }

    pub fn config(mut self, config: TrainConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Trainer<M>> {
        let optimizer = self
            .optimizer
            .ok_or_else(|| Error::Config("trainer needs an optimizer".into()))?;
        let loss = self
            .loss
            .ok_or_else(|| Error::Config("trainer needs a loss".into()))?;
        self.config.validate()?;

        let mut metrics: Vec<Box<dyn Metric>> = Vec::with_capacity(self.metrics.len() + 1);
        metrics.push(Box::new(Mean::new(LOSS_METRIC)));
        for metric in self.metrics {
            if metrics.iter().any(|m| m.name() == metric.name()) {
                return Err(Error::DuplicateMetric(metric.name().to_string()));
            }
            metrics.push(metric);
        }

        tracing::debug!(
            model = self.model.name(),
            params = self.model.parameter_count(),
            optimizer = optimizer.name(),
            loss = loss.name(),
            "trainer built"
        );

        Ok(Trainer {
            model: self.model,
            optimizer,
            loss,
            metrics,
            config: self.config,
            callbacks: CallbackManager::new(),
            skipped_steps: 0,
        })
    }
}
