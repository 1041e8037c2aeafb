//! Loss function trait

use crate::autograd::{Tape, Var};
use crate::Result;
use ndarray::Array2;

/// Trait for loss functions
///
/// The loss is computed on the same tape as the predictions so that its
/// gradient flows back into the model.
pub trait Loss {
    /// Reduce `(y_pred, y_true)` to a `(1, 1)` loss value
    fn forward(&self, tape: &Tape, y_pred: &Var, y_true: &Array2<f32>) -> Result<Var>;

    /// Name of the loss function
    fn name(&self) -> &str;
}

impl<L: Loss + ?Sized> Loss for Box<L> {
    fn forward(&self, tape: &Tape, y_pred: &Var, y_true: &Array2<f32>) -> Result<Var> {
        (**self).forward(tape, y_pred, y_true)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
