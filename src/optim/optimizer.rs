//! Optimizer trait

use crate::autograd::Gradients;

/// Trait for optimization algorithms
///
/// Implementations keep per-parameter state keyed by
/// [`ParamId`](crate::autograd::ParamId), so the same optimizer can be handed
/// gradients for any subset of parameters in any order.
pub trait Optimizer {
    /// Update every parameter in `grads` in place
    fn apply_gradients(&mut self, grads: &Gradients);

    /// Get learning rate
    fn lr(&self) -> f32;

    /// Set learning rate
    fn set_lr(&mut self, lr: f32);

    /// Number of `apply_gradients` calls so far
    fn iterations(&self) -> u64;

    fn name(&self) -> &'static str;
}

impl<O: Optimizer + ?Sized> Optimizer for Box<O> {
    fn apply_gradients(&mut self, grads: &Gradients) {
        (**self).apply_gradients(grads);
    }

    fn lr(&self) -> f32 {
        (**self).lr()
    }

    fn set_lr(&mut self, lr: f32) {
        (**self).set_lr(lr);
    }

    fn iterations(&self) -> u64 {
        (**self).iterations()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
