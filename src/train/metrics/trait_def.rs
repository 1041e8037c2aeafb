//! Core Metric trait definition

use crate::Result;
use ndarray::Array2;

/// Stateful metric accumulator
///
/// A metric is updated once per batch and reports the aggregate over every
/// batch seen since the last [`reset_state`](Metric::reset_state). Only the
/// training driver resets; steps only update.
pub trait Metric {
    /// Name used as the key in step logs
    fn name(&self) -> &str;

    /// Check that `(y_true, y_pred)` can be accumulated
    ///
    /// Called for every metric before any of them is updated, so a rejected
    /// batch leaves all accumulators untouched.
    fn validate(&self, _y_true: &Array2<f32>, _y_pred: &Array2<f32>) -> Result<()> {
        Ok(())
    }

    /// Fold one batch into the running state
    fn update_state(&mut self, y_true: &Array2<f32>, y_pred: &Array2<f32>);

    /// Current aggregate; `0.0` when nothing has been accumulated
    fn result(&self) -> f32;

    fn reset_state(&mut self);
}

impl<M: Metric + ?Sized> Metric for Box<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn validate(&self, y_true: &Array2<f32>, y_pred: &Array2<f32>) -> Result<()> {
        (**self).validate(y_true, y_pred)
    }

    fn update_state(&mut self, y_true: &Array2<f32>, y_pred: &Array2<f32>) {
        (**self).update_state(y_true, y_pred);
    }

    fn result(&self) -> f32 {
        (**self).result()
    }

    fn reset_state(&mut self) {
        (**self).reset_state();
    }
}
