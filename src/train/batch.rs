//! Batch data structure

use crate::{Error, Result};
use ndarray::Array2;

/// One unit of `(inputs, targets)` consumed per step
///
/// Rows are samples. Sparse class targets are a single column holding the
/// class index; dense targets have one column per output.
#[derive(Debug, Clone)]
pub struct Batch {
    /// Input features, `(batch, features)`
    pub inputs: Array2<f32>,
    /// Targets, `(batch, 1)` or `(batch, outputs)`
    pub targets: Array2<f32>,
}

impl Batch {
    /// Create a new batch; inputs and targets must have the same row count
    pub fn new(inputs: Array2<f32>, targets: Array2<f32>) -> Result<Self> {
        if inputs.nrows() != targets.nrows() {
            return Err(Error::shape("batch", &[inputs.nrows()], &[targets.nrows()]));
        }
        Ok(Self { inputs, targets })
    }

    /// Number of samples
    pub fn size(&self) -> usize {
        self.inputs.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

/// Read a `(n, 1)` column of sparse labels as class indices in `[0, classes)`
pub(crate) fn class_indices(targets: &Array2<f32>, classes: usize) -> Result<Vec<usize>> {
    if targets.ncols() != 1 {
        return Err(Error::shape(
            "sparse labels",
            &[targets.nrows(), 1],
            &[targets.nrows(), targets.ncols()],
        ));
    }
    targets
        .column(0)
        .iter()
        .enumerate()
        .map(|(row, &label)| {
            if label.fract() == 0.0 && label >= 0.0 && (label as usize) < classes {
                Ok(label as usize)
            } else {
                Err(Error::InvalidLabel { label, row, classes })
            }
        })
        .collect()
}
