//! Early stopping callback to halt training when a metric plateaus

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};
use serde::{Deserialize, Serialize};

/// Whether a monitored metric should go down or up
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Minimize,
    Maximize,
}

impl Direction {
    /// Accuracy-like metrics are maximised, everything else minimised
    pub fn infer(monitor: &str) -> Self {
        if monitor.contains("acc") {
            Direction::Maximize
        } else {
            Direction::Minimize
        }
    }
}

/// Stops training when `monitor` has not improved by more than `min_delta`
/// for `patience` consecutive epochs
///
/// # Example
///
/// ```rust
/// use paso::train::callback::{Direction, EarlyStopping};
///
/// let early_stop = EarlyStopping::new("val_sparse_categorical_accuracy", 5, 0.001);
/// assert_eq!(early_stop.direction(), Direction::Maximize);
/// ```
#[derive(Clone, Debug)]
pub struct EarlyStopping {
    monitor: String,
    patience: usize,
    min_delta: f32,
    direction: Direction,
    best: Option<f32>,
    pub(crate) epochs_without_improvement: usize,
}

impl EarlyStopping {
    pub fn new(monitor: impl Into<String>, patience: usize, min_delta: f32) -> Self {
        let monitor = monitor.into();
        Self {
            direction: Direction::infer(&monitor),
            monitor,
            patience,
            min_delta: min_delta.abs(),
            best: None,
            epochs_without_improvement: 0,
        }
    }

    /// Override the inferred direction
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn monitor(&self) -> &str {
        &self.monitor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Best value seen so far
    pub fn best(&self) -> Option<f32> {
        self.best
    }

    /// Reset internal state
    pub fn reset(&mut self) {
        self.best = None;
        self.epochs_without_improvement = 0;
    }

    fn check_improvement(&mut self, value: f32) -> bool {
        let improved = match (self.best, self.direction) {
            (None, _) => true,
            (Some(best), Direction::Minimize) => value < best - self.min_delta,
            (Some(best), Direction::Maximize) => value > best + self.min_delta,
        };
        if improved {
            self.best = Some(value);
            self.epochs_without_improvement = 0;
        } else {
            self.epochs_without_improvement += 1;
        }
        improved
    }
}

impl TrainerCallback for EarlyStopping {
    fn on_train_begin(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        self.reset();
        CallbackAction::Continue
    }

    fn on_epoch_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
        let Some(value) = ctx.metric(&self.monitor) else {
            tracing::warn!(monitor = %self.monitor, "early stopping metric missing from logs");
            return CallbackAction::Continue;
        };
        self.check_improvement(value);

        if self.epochs_without_improvement >= self.patience {
            tracing::info!(
                monitor = %self.monitor,
                patience = self.patience,
                best = self.best.unwrap_or(value),
                "early stopping"
            );
            CallbackAction::Stop
        } else {
            CallbackAction::Continue
        }
    }

    fn name(&self) -> &'static str {
        "EarlyStopping"
    }
}
