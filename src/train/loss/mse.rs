//! Mean squared error

use super::Loss;
use crate::autograd::{Tape, Var};
use crate::Result;
use ndarray::Array2;

/// Mean Squared Error Loss
///
/// L = mean((y_pred - y_true)²)
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanSquaredError;

impl Loss for MeanSquaredError {
    fn forward(&self, tape: &Tape, y_pred: &Var, y_true: &Array2<f32>) -> Result<Var> {
        let diff = tape.sub(y_pred, &tape.constant(y_true.clone()))?;
        let squared = tape.mul(&diff, &diff)?;
        Ok(tape.mean(&squared))
    }

    fn name(&self) -> &str {
        "mean_squared_error"
    }
}
