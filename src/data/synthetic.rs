//! Seeded synthetic classification data
//!
//! Gaussian blobs: one cluster center per class, samples scattered around
//! their center with standard deviation `spread`.

use super::ArrayDataset;
use crate::nn::init::standard_normal;
use crate::{Error, Result};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Shape of a blob dataset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlobSpec {
    pub samples: usize,
    pub features: usize,
    pub classes: usize,
    /// Standard deviation of each cluster
    pub spread: f32,
}

impl Default for BlobSpec {
    fn default() -> Self {
        Self {
            samples: 600,
            features: 4,
            classes: 3,
            spread: 0.5,
        }
    }
}

/// Generate labelled blobs; targets are `(samples, 1)` class indices
///
/// Samples are emitted in random class order, so a tail split keeps every
/// class represented.
pub fn blobs(spec: BlobSpec, seed: u64) -> Result<ArrayDataset> {
    if spec.samples == 0 || spec.features == 0 || spec.classes < 2 {
        return Err(Error::Config(format!(
            "blobs need samples > 0, features > 0 and classes >= 2 (got {spec:?})"
        )));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let centers =
        Array2::from_shape_simple_fn((spec.classes, spec.features), || rng.random_range(-3.0f32..3.0));

    let mut inputs = Array2::zeros((spec.samples, spec.features));
    let mut targets = Array2::zeros((spec.samples, 1));
    for (row, mut x) in inputs.rows_mut().into_iter().enumerate() {
        let class = rng.random_range(0..spec.classes);
        targets[[row, 0]] = class as f32;
        for (v, &c) in x.iter_mut().zip(centers.row(class)) {
            *v = c + spec.spread * standard_normal(&mut rng);
        }
    }
    ArrayDataset::new(inputs, targets)
}
