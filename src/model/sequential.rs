//! Linear stack of single-input layers

use super::Model;
use crate::autograd::{Parameter, Tape, Var};
use crate::nn::{Layer, Mode};
use crate::Result;

/// Applies its layers in insertion order
///
/// # Example
///
/// ```
/// use paso::model::{Model, Sequential};
/// use paso::nn::{Activation, Dense, Dropout};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(812);
/// let model = Sequential::new("mlp")
///     .add(Dense::new("hidden", 4, 8, Activation::Relu, &mut rng))
///     .add(Dropout::new("dropout", 0.2, 812).unwrap())
///     .add(Dense::new("output", 8, 3, Activation::Softmax, &mut rng));
/// assert_eq!(model.parameter_count(), 4 * 8 + 8 + 8 * 3 + 3);
/// ```
pub struct Sequential {
    name: String,
    layers: Vec<Box<dyn Layer>>,
}

impl Sequential {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layers: Vec::new(),
        }
    }

    /// Append a layer
    pub fn add<L: Layer + 'static>(mut self, layer: L) -> Self {
        self.layers.push(Box::new(layer));
        self
    }

    /// Append an already boxed layer
    pub fn push(&mut self, layer: Box<dyn Layer>) {
        self.layers.push(layer);
    }

    pub fn layers(&self) -> &[Box<dyn Layer>] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Model for Sequential {
    fn forward(&self, tape: &Tape, input: &Var, mode: Mode) -> Result<Var> {
        let mut x = input.clone();
        for layer in &self.layers {
            x = layer.forward(tape, std::slice::from_ref(&x), mode)?;
        }
        Ok(x)
    }

    fn trainable_parameters(&self) -> Vec<Parameter> {
        self.layers.iter().flat_map(|l| l.parameters()).collect()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
