//! Stochastic Gradient Descent optimizer

use super::Optimizer;
use crate::autograd::{Gradients, ParamId};
use ndarray::Array2;
use std::collections::HashMap;

/// SGD with optional (Nesterov) momentum
///
/// ```text
/// v = momentum * v - lr * g
/// p = p + v                          (classic)
/// p = p + momentum * v - lr * g      (nesterov)
/// ```
pub struct Sgd {
    lr: f32,
    momentum: f32,
    nesterov: bool,
    iterations: u64,
    velocities: HashMap<ParamId, Array2<f32>>,
}

impl Sgd {
    /// Plain SGD
    pub fn new(lr: f32) -> Self {
        Self::with_momentum(lr, 0.0, false)
    }

    pub fn with_momentum(lr: f32, momentum: f32, nesterov: bool) -> Self {
        Self {
            lr,
            momentum,
            nesterov,
            iterations: 0,
            velocities: HashMap::new(),
        }
    }

    pub fn momentum(&self) -> f32 {
        self.momentum
    }
}

impl Default for Sgd {
    fn default() -> Self {
        Self::new(0.01)
    }
}

impl Optimizer for Sgd {
    fn apply_gradients(&mut self, grads: &Gradients) {
        for (param, grad) in grads.iter() {
            if self.momentum > 0.0 {
                let velocity = self
                    .velocities
                    .entry(param.id())
                    .or_insert_with(|| Array2::zeros(grad.raw_dim()));
                velocity.mapv_inplace(|v| v * self.momentum);
                velocity.scaled_add(-self.lr, grad);

                if self.nesterov {
                    let momentum = self.momentum;
                    let lr = self.lr;
                    param.update(|p| {
                        p.scaled_add(momentum, &*velocity);
                        p.scaled_add(-lr, grad);
                    });
                } else {
                    param.update(|p| *p += &*velocity);
                }
            } else {
                // Simple SGD: param -= lr * grad
                param.update(|p| p.scaled_add(-self.lr, grad));
            }
        }
        self.iterations += 1;
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }

    fn iterations(&self) -> u64 {
        self.iterations
    }

    fn name(&self) -> &'static str {
        "sgd"
    }
}
