//! Adam optimizer

use super::Optimizer;
use crate::autograd::{Gradients, ParamId};
use ndarray::Array2;
use std::collections::HashMap;

struct Moments {
    m: Array2<f32>,
    v: Array2<f32>,
}

/// Adam with bias correction folded into the step size
///
/// ```text
/// m = β1 m + (1 - β1) g
/// v = β2 v + (1 - β2) g²
/// lr_t = lr · √(1 - β2^t) / (1 - β1^t)
/// p = p - lr_t · m / (√v + ε)
/// ```
pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    t: u64,
    moments: HashMap<ParamId, Moments>,
}

impl Adam {
    /// Create a new Adam optimizer
    pub fn new(lr: f32, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Self {
            lr,
            beta1,
            beta2,
            epsilon,
            t: 0,
            moments: HashMap::new(),
        }
    }

    /// Adam with β1 = 0.9, β2 = 0.999, ε = 1e-7
    pub fn default_params(lr: f32) -> Self {
        Self::new(lr, 0.9, 0.999, 1e-7)
    }

    pub fn beta1(&self) -> f32 {
        self.beta1
    }

    pub fn beta2(&self) -> f32 {
        self.beta2
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }
}

impl Default for Adam {
    fn default() -> Self {
        Self::default_params(0.001)
    }
}

impl Optimizer for Adam {
    fn apply_gradients(&mut self, grads: &Gradients) {
        self.t += 1;
        let t = self.t as i32;
        let lr_t =
            self.lr * (1.0 - self.beta2.powi(t)).sqrt() / (1.0 - self.beta1.powi(t));
        let (beta1, beta2, epsilon) = (self.beta1, self.beta2, self.epsilon);

        for (param, grad) in grads.iter() {
            let state = self.moments.entry(param.id()).or_insert_with(|| Moments {
                m: Array2::zeros(grad.raw_dim()),
                v: Array2::zeros(grad.raw_dim()),
            });

            state.m.zip_mut_with(grad, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
            state.v.zip_mut_with(grad, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);

            param.update(|p| {
                ndarray::Zip::from(p)
                    .and(&state.m)
                    .and(&state.v)
                    .for_each(|p, &m, &v| *p -= lr_t * m / (v.sqrt() + epsilon));
            });
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }

    fn iterations(&self) -> u64 {
        self.t
    }

    fn name(&self) -> &'static str {
        "adam"
    }
}
