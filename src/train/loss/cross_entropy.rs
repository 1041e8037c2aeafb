//! Cross entropy losses for classification

use super::Loss;
use crate::autograd::{Tape, Var};
use crate::train::batch::class_indices;
use crate::{Error, Result};
use ndarray::Array2;

/// Probabilities are clamped to `[EPSILON, 1 - EPSILON]` before the log
pub const EPSILON: f32 = 1e-7;

fn probabilities(tape: &Tape, y_pred: &Var, from_logits: bool) -> Var {
    if from_logits {
        tape.softmax(y_pred)
    } else {
        y_pred.clone()
    }
}

/// Cross entropy against integer class labels
///
/// L = -mean(ln p[i, y_i])
///
/// Targets are a `(batch, 1)` column of class indices.
///
/// # Example
///
/// ```
/// use paso::autograd::Tape;
/// use paso::train::{Loss, SparseCategoricalCrossentropy};
/// use ndarray::array;
///
/// let tape = Tape::inference();
/// let probs = tape.constant(array![[0.5, 0.5], [0.9, 0.1]]);
/// let loss = SparseCategoricalCrossentropy::default()
///     .forward(&tape, &probs, &array![[0.0], [0.0]])
///     .unwrap();
/// assert!(loss.scalar() > 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SparseCategoricalCrossentropy {
    /// Whether predictions are unnormalized scores rather than probabilities
    pub from_logits: bool,
}

impl SparseCategoricalCrossentropy {
    pub fn new(from_logits: bool) -> Self {
        Self { from_logits }
    }
}

impl Loss for SparseCategoricalCrossentropy {
    fn forward(&self, tape: &Tape, y_pred: &Var, y_true: &Array2<f32>) -> Result<Var> {
        let (rows, classes) = y_pred.shape();
        if y_true.nrows() != rows {
            return Err(Error::shape(
                "sparse_categorical_crossentropy",
                &[rows, 1],
                &[y_true.nrows(), y_true.ncols()],
            ));
        }
        let labels = class_indices(y_true, classes)?;

        let probs = probabilities(tape, y_pred, self.from_logits);
        let picked = tape.pick(&probs, &labels)?;
        let log_p = tape.log_clamped(&picked, EPSILON);
        Ok(tape.scale(&tape.mean(&log_p), -1.0))
    }

    fn name(&self) -> &str {
        "sparse_categorical_crossentropy"
    }
}

/// Cross entropy against one-hot (or soft) targets
///
/// L = -mean over rows of sum(t * ln p)
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoricalCrossentropy {
    pub from_logits: bool,
}

impl CategoricalCrossentropy {
    pub fn new(from_logits: bool) -> Self {
        Self { from_logits }
    }
}

impl Loss for CategoricalCrossentropy {
    fn forward(&self, tape: &Tape, y_pred: &Var, y_true: &Array2<f32>) -> Result<Var> {
        let rows = y_pred.shape().0;
        let probs = probabilities(tape, y_pred, self.from_logits);
        let log_p = tape.log_clamped(&probs, EPSILON);
        let weighted = tape.mul_constant(&log_p, y_true)?;
        Ok(tape.scale(&tape.sum(&weighted), -1.0 / rows as f32))
    }

    fn name(&self) -> &str {
        "categorical_crossentropy"
    }
}
