//! Fully connected layer

use super::{init, single_input, Activation, Layer, Mode};
use crate::autograd::{Parameter, Tape, Var};
use crate::{Error, Result};
use ndarray::Array2;
use rand::Rng;

/// `activation(x · kernel + bias)`
///
/// The kernel is `(input_dim, units)` and Glorot-uniform initialized; the bias
/// is a `(1, units)` row of zeros.
pub struct Dense {
    name: String,
    kernel: Parameter,
    bias: Parameter,
    activation: Activation,
}

impl Dense {
    pub fn new<R: Rng + ?Sized>(
        name: impl Into<String>,
        input_dim: usize,
        units: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Self {
        let name = name.into();
        let kernel = Parameter::new(
            format!("{name}/kernel"),
            init::glorot_uniform(rng, input_dim, units),
        );
        let bias = Parameter::zeros(format!("{name}/bias"), 1, units);
        Self {
            name,
            kernel,
            bias,
            activation,
        }
    }

    /// Build from explicit weights. `bias` must be `(1, kernel.ncols())`.
    pub fn from_weights(
        name: impl Into<String>,
        kernel: Array2<f32>,
        bias: Array2<f32>,
        activation: Activation,
    ) -> Result<Self> {
        let units = kernel.ncols();
        if bias.dim() != (1, units) {
            return Err(Error::shape("dense bias", &[1, units], bias.shape()));
        }
        let name = name.into();
        Ok(Self {
            kernel: Parameter::new(format!("{name}/kernel"), kernel),
            bias: Parameter::new(format!("{name}/bias"), bias),
            name,
            activation,
        })
    }

    pub fn kernel(&self) -> &Parameter {
        &self.kernel
    }

    pub fn bias(&self) -> &Parameter {
        &self.bias
    }

    pub fn input_dim(&self) -> usize {
        self.kernel.shape().0
    }

    pub fn units(&self) -> usize {
        self.kernel.shape().1
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }
}

impl Layer for Dense {
    fn forward(&self, tape: &Tape, inputs: &[Var], _mode: Mode) -> Result<Var> {
        let x = single_input(&self.name, inputs)?;
        let z = tape.matmul(x, &tape.param(&self.kernel))?;
        let z = tape.add_bias(&z, &tape.param(&self.bias))?;
        Ok(self.activation.apply(tape, &z))
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![self.kernel.clone(), self.bias.clone()]
    }

    fn name(&self) -> &str {
        &self.name
    }
}
