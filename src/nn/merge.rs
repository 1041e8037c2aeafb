//! Merge layers for multi-input graphs

use super::{Layer, Mode};
use crate::autograd::{Tape, Var};
use crate::{Error, Result};

/// Element-wise sum of two or more equally shaped inputs
pub struct Add {
    name: String,
}

impl Add {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Layer for Add {
    fn forward(&self, tape: &Tape, inputs: &[Var], _mode: Mode) -> Result<Var> {
        let [first, rest @ ..] = inputs else {
            return Err(Error::Graph(format!("layer '{}' has no inputs", self.name)));
        };
        if rest.is_empty() {
            return Err(Error::Graph(format!(
                "layer '{}' needs at least two inputs",
                self.name
            )));
        }
        rest.iter()
            .try_fold(first.clone(), |acc, x| tape.add(&acc, x))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Column-wise concatenation of inputs with equal batch size
pub struct Concatenate {
    name: String,
}

impl Concatenate {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Layer for Concatenate {
    fn forward(&self, tape: &Tape, inputs: &[Var], _mode: Mode) -> Result<Var> {
        if inputs.len() < 2 {
            return Err(Error::Graph(format!(
                "layer '{}' needs at least two inputs",
                self.name
            )));
        }
        tape.concat(inputs)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
