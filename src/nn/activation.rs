//! Activation functions usable inside `Dense` or as standalone layers

use super::{single_input, Layer, Mode};
use crate::autograd::{Tape, Var};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Element-wise (or row-wise for softmax) non-linearity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    #[default]
    Linear,
    Relu,
    Sigmoid,
    Softmax,
}

impl Activation {
    pub fn apply(self, tape: &Tape, x: &Var) -> Var {
        match self {
            Activation::Linear => x.clone(),
            Activation::Relu => tape.relu(x),
            Activation::Sigmoid => tape.sigmoid(x),
            Activation::Softmax => tape.softmax(x),
        }
    }
}

impl Layer for Activation {
    fn forward(&self, tape: &Tape, inputs: &[Var], _mode: Mode) -> Result<Var> {
        let x = single_input(self.name(), inputs)?;
        Ok(self.apply(tape, x))
    }

    fn name(&self) -> &str {
        match self {
            Activation::Linear => "linear",
            Activation::Relu => "relu",
            Activation::Sigmoid => "sigmoid",
            Activation::Softmax => "softmax",
        }
    }
}
