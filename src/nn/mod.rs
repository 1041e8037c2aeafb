//! Layers: the building blocks shared by `Sequential` and `Functional` models

mod activation;
mod dense;
mod dropout;
pub mod init;
mod merge;

pub use activation::Activation;
pub use dense::Dense;
pub use dropout::Dropout;
pub use merge::{Add, Concatenate};

use crate::autograd::{Parameter, Tape, Var};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Whether a forward pass is part of training
///
/// Inference mode disables stochastic regularization such as dropout. The
/// interface of a layer does not change with the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Training,
    Inference,
}

impl Mode {
    pub fn is_training(self) -> bool {
        self == Mode::Training
    }
}

/// A differentiable transformation with optional trainable weights
pub trait Layer {
    /// Apply the layer. Single-input layers read `inputs[0]`.
    fn forward(&self, tape: &Tape, inputs: &[Var], mode: Mode) -> Result<Var>;

    /// Trainable weights, in a stable order
    fn parameters(&self) -> Vec<Parameter> {
        Vec::new()
    }

    fn name(&self) -> &str;
}

/// The single input of a one-input layer
pub(crate) fn single_input<'a>(layer: &str, inputs: &'a [Var]) -> Result<&'a Var> {
    match inputs {
        [x] => Ok(x),
        _ => Err(crate::Error::Graph(format!(
            "layer '{layer}' expects exactly one input, got {}",
            inputs.len()
        ))),
    }
}

impl<L: Layer + ?Sized> Layer for Box<L> {
    fn forward(&self, tape: &Tape, inputs: &[Var], mode: Mode) -> Result<Var> {
        (**self).forward(tape, inputs, mode)
    }

    fn parameters(&self) -> Vec<Parameter> {
        (**self).parameters()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_mode_is_training() {
        assert!(Mode::Training.is_training());
        assert!(!Mode::Inference.is_training());
    }

    #[test]
    fn test_single_input_rejects_many() {
        let tape = Tape::inference();
        let a = tape.constant(array![[1.0]]);
        assert!(single_input("dense", &[a.clone()]).is_ok());
        assert!(single_input("dense", &[a.clone(), a]).is_err());
        assert!(single_input("dense", &[]).is_err());
    }
}
