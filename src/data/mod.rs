//! In-memory datasets and batching
//!
//! [`ArrayDataset`] holds one feature matrix and one target matrix with a row
//! per sample. Batches are cut in row order, optionally after a seeded
//! shuffle, and the final batch may be smaller than `batch_size`.

pub mod synthetic;

use crate::train::{class_indices, Batch};
use crate::{Error, Result};
use ndarray::{s, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Features and targets with matching row counts
#[derive(Debug, Clone)]
pub struct ArrayDataset {
    inputs: Array2<f32>,
    targets: Array2<f32>,
}

impl ArrayDataset {
    pub fn new(inputs: Array2<f32>, targets: Array2<f32>) -> Result<Self> {
        if inputs.nrows() != targets.nrows() {
            return Err(Error::shape("dataset", &[inputs.nrows()], &[targets.nrows()]));
        }
        Ok(Self { inputs, targets })
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.inputs.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn inputs(&self) -> &Array2<f32> {
        &self.inputs
    }

    pub fn targets(&self) -> &Array2<f32> {
        &self.targets
    }

    pub fn num_features(&self) -> usize {
        self.inputs.ncols()
    }

    /// Number of batches of `batch_size` needed to cover the dataset
    pub fn num_batches(&self, batch_size: usize) -> usize {
        self.len().div_ceil(batch_size.max(1))
    }

    /// Cut the dataset into batches, shuffling row order first when `rng` is given
    pub fn batches(&self, batch_size: usize, rng: Option<&mut StdRng>) -> Result<Vec<Batch>> {
        if batch_size == 0 {
            return Err(Error::Config("batch_size must be > 0".into()));
        }
        if self.is_empty() {
            return Err(Error::EmptyDataset);
        }

        let mut order: Vec<usize> = (0..self.len()).collect();
        if let Some(rng) = rng {
            order.shuffle(rng);
        }

        order
            .chunks(batch_size)
            .map(|rows| {
                Batch::new(
                    self.inputs.select(Axis(0), rows),
                    self.targets.select(Axis(0), rows),
                )
            })
            .collect()
    }

    /// Split off the last `fraction` of rows as a validation set
    ///
    /// The first `floor(n * (1 - fraction))` rows train, the rest validate.
    /// Rows are taken from the end without shuffling, so shuffle beforehand if
    /// the data is ordered.
    pub fn split_validation(self, fraction: f32) -> Result<(ArrayDataset, ArrayDataset)> {
        if !(0.0..1.0).contains(&fraction) || fraction == 0.0 {
            return Err(Error::Config(format!(
                "validation fraction {fraction} must be in (0.0, 1.0)"
            )));
        }
        let n = self.len();
        let cut = validation_cut(n, fraction);
        if cut == 0 || cut >= n {
            return Err(Error::Config(format!(
                "validation fraction {fraction} of {n} samples leaves an empty split"
            )));
        }
        let train = ArrayDataset::new(
            self.inputs.slice(s![..cut, ..]).to_owned(),
            self.targets.slice(s![..cut, ..]).to_owned(),
        )?;
        let val = ArrayDataset::new(
            self.inputs.slice(s![cut.., ..]).to_owned(),
            self.targets.slice(s![cut.., ..]).to_owned(),
        )?;
        Ok((train, val))
    }

    /// Replace `(n, 1)` class-index targets with `(n, classes)` one-hot rows
    pub fn one_hot(self, classes: usize) -> Result<ArrayDataset> {
        let labels = class_indices(&self.targets, classes)?;
        let mut targets = Array2::zeros((labels.len(), classes));
        for (row, label) in labels.into_iter().enumerate() {
            targets[[row, label]] = 1.0;
        }
        ArrayDataset::new(self.inputs, targets)
    }
}

/// Number of leading rows kept for training when `fraction` is held out
pub fn validation_cut(samples: usize, fraction: f32) -> usize {
    (samples as f32 * (1.0 - fraction)).floor() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn dataset(n: usize) -> ArrayDataset {
        let x = Array2::from_shape_fn((n, 2), |(r, c)| (r * 2 + c) as f32);
        let y = Array2::from_shape_fn((n, 1), |(r, _)| r as f32);
        ArrayDataset::new(x, y).unwrap()
    }

    #[test]
    fn test_row_mismatch_rejected() {
        assert!(ArrayDataset::new(Array2::zeros((3, 2)), Array2::zeros((2, 1))).is_err());
    }

    #[test]
    fn test_batches_cover_all_rows_in_order() {
        let batches = dataset(5).batches(2, None).unwrap();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches.iter().map(Batch::size).collect::<Vec<_>>(), [2, 2, 1]);
        assert_eq!(batches[2].targets[[0, 0]], 4.0);
        assert_eq!(dataset(5).num_batches(2), 3);
    }

    #[test]
    fn test_shuffle_is_seeded_permutation() {
        let data = dataset(10);
        let flatten = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            data.batches(3, Some(&mut rng))
                .unwrap()
                .iter()
                .flat_map(|b| b.targets.iter().copied().collect::<Vec<_>>())
                .collect::<Vec<f32>>()
        };
        let a = flatten(3);
        assert_eq!(a, flatten(3));

        let mut sorted = a.clone();
        sorted.sort_by(f32::total_cmp);
        assert_eq!(sorted, (0..10).map(|v| v as f32).collect::<Vec<_>>());
    }

    #[test]
    fn test_shuffle_keeps_rows_aligned() {
        let mut rng = StdRng::seed_from_u64(9);
        for batch in dataset(8).batches(3, Some(&mut rng)).unwrap() {
            for (x, y) in batch.inputs.rows().into_iter().zip(batch.targets.column(0)) {
                assert_eq!(x[0], y * 2.0);
            }
        }
    }

    #[test]
    fn test_bad_batch_requests() {
        assert!(dataset(4).batches(0, None).is_err());
        assert!(matches!(
            dataset(0).batches(2, None),
            Err(Error::EmptyDataset)
        ));
    }

    #[test]
    fn test_split_takes_tail() {
        let (train, val) = dataset(10).split_validation(0.2).unwrap();
        assert_eq!(train.len(), 8);
        assert_eq!(val.len(), 2);
        assert_eq!(val.targets()[[0, 0]], 8.0);
    }

    #[test]
    fn test_split_floors_training_rows() {
        let (train, val) = dataset(10).split_validation(0.14).unwrap();
        assert_eq!((train.len(), val.len()), (8, 2));
        let (train, val) = dataset(7).split_validation(0.5).unwrap();
        assert_eq!((train.len(), val.len()), (3, 4));
        assert_eq!(validation_cut(120, 0.25), 90);
    }

    #[test]
    fn test_one_hot() {
        let data = ArrayDataset::new(
            Array2::zeros((3, 1)),
            ndarray::array![[2.0], [0.0], [1.0]],
        )
        .unwrap()
        .one_hot(3)
        .unwrap();
        assert_eq!(
            data.targets(),
            &ndarray::array![[0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
        );
        assert!(dataset(4).one_hot(2).is_err());
    }

    #[test]
    fn test_split_rejects_degenerate_fractions() {
        assert!(dataset(10).split_validation(0.0).is_err());
        assert!(dataset(10).split_validation(1.0).is_err());
        assert!(dataset(5).split_validation(0.9).is_err());
        assert!(dataset(1).split_validation(0.5).is_err());
        assert!(dataset(2).split_validation(0.1).is_ok());
    }
}
