//! The model capability and its two structural variants
//!
//! Anything that can produce predictions from an input batch and expose its
//! trainable weights implements [`Model`]. The trainer is written against this
//! trait only, so a linear stack of layers and a graph of layers are trained
//! by the same step code.

mod functional;
mod sequential;

pub use functional::{Functional, FunctionalBuilder, NodeRef};
pub use sequential::Sequential;

use crate::autograd::{Parameter, Tape, Var};
use crate::nn::Mode;
use crate::Result;

/// Predict-from-input capability
pub trait Model {
    /// Compute predictions for `input` on `tape`
    fn forward(&self, tape: &Tape, input: &Var, mode: Mode) -> Result<Var>;

    /// All trainable weights, in a stable order
    fn trainable_parameters(&self) -> Vec<Parameter>;

    fn name(&self) -> &str;

    /// Total number of trainable scalars
    fn parameter_count(&self) -> usize {
        self.trainable_parameters().iter().map(Parameter::len).sum()
    }
}

impl<M: Model + ?Sized> Model for Box<M> {
    fn forward(&self, tape: &Tape, input: &Var, mode: Mode) -> Result<Var> {
        (**self).forward(tape, input, mode)
    }

    fn trainable_parameters(&self) -> Vec<Parameter> {
        (**self).trainable_parameters()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
