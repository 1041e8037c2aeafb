//! Core traits and types for the callback system
//!
//! - `CallbackContext` - State passed to callbacks
//! - `CallbackAction` - Actions a callback can request
//! - `TrainerCallback` - The trait all callbacks implement

use crate::train::Logs;

/// Context passed to callbacks with current training state
#[derive(Clone, Debug, Default)]
pub struct CallbackContext {
    /// Current epoch (0-indexed)
    pub epoch: usize,
    /// Total epochs planned
    pub max_epochs: usize,
    /// Batches completed in the current epoch
    pub step: usize,
    /// Batches per epoch
    pub steps_per_epoch: usize,
    /// Batches completed since `fit` started
    pub global_step: usize,
    /// Current learning rate
    pub lr: f32,
    /// Latest metric values; at epoch end this includes `val_` entries
    pub logs: Logs,
    /// Seconds since `fit` started
    pub elapsed_secs: f64,
}

impl CallbackContext {
    /// Look up a metric by name
    pub fn metric(&self, name: &str) -> Option<f32> {
        self.logs.get(name).copied()
    }
}

/// Action to take after a callback
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackAction {
    /// Continue training normally
    Continue,
    /// Stop training (early stopping)
    Stop,
    /// Skip rest of current epoch
    SkipEpoch,
}

/// Trait for training callbacks
///
/// All methods default to no-ops, so implement only the events you care
/// about.
pub trait TrainerCallback {
    /// Called before the first epoch
    fn on_train_begin(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        CallbackAction::Continue
    }

    /// Called once after the last epoch, including after an early stop
    fn on_train_end(&mut self, _ctx: &CallbackContext) {}

    fn on_epoch_begin(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        CallbackAction::Continue
    }

    /// Called after training and validation of an epoch
    fn on_epoch_end(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        CallbackAction::Continue
    }

    /// Called after every training batch
    fn on_batch_end(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        CallbackAction::Continue
    }

    /// Get callback name for logging
    fn name(&self) -> &'static str {
        "TrainerCallback"
    }
}
