//! Inverted dropout

use super::{single_input, Layer, Mode};
use crate::autograd::{Tape, Var};
use crate::{Error, Result};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;

/// Zeroes each activation with probability `rate` during training and scales
/// the survivors by `1 / (1 - rate)`. Identity in inference mode.
///
/// Every training-mode forward draws the next mask from the seeded generator,
/// including a forward whose step is later rejected (bad labels, metric shape
/// errors or a non-finite loss). A failed step therefore moves the mask
/// sequence on by one even though parameters and metrics are unchanged.
pub struct Dropout {
    name: String,
    rate: f32,
    rng: RefCell<StdRng>,
}

impl Dropout {
    /// `rate` must be in `[0, 1)`. `seed` fixes the mask sequence.
    pub fn new(name: impl Into<String>, rate: f32, seed: u64) -> Result<Self> {
        if !(0.0..1.0).contains(&rate) {
            return Err(Error::Config(format!(
                "dropout rate {rate} must be in [0.0, 1.0)"
            )));
        }
        Ok(Self {
            name: name.into(),
            rate,
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        })
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    fn mask(&self, shape: (usize, usize)) -> Array2<f32> {
        let keep = 1.0 - self.rate;
        let mut rng = self.rng.borrow_mut();
        Array2::from_shape_simple_fn(shape, || {
            if rng.random::<f32>() < keep {
                1.0 / keep
            } else {
                0.0
            }
        })
    }
}

impl Layer for Dropout {
    fn forward(&self, tape: &Tape, inputs: &[Var], mode: Mode) -> Result<Var> {
        let x = single_input(&self.name, inputs)?;
        if !mode.is_training() || self.rate == 0.0 {
            return Ok(x.clone());
        }
        let mask = self.mask(x.shape());
        tape.mul_constant(x, &mask)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
