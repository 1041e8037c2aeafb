//! Classification accuracy metrics
//!
//! Each keeps `correct / seen` counts across batches.

use super::Metric;
use crate::{Error, Result};
use ndarray::{Array2, ArrayView1};

#[derive(Debug, Clone, Copy, Default)]
struct Counts {
    correct: u64,
    seen: u64,
}

impl Counts {
    fn add(&mut self, correct: usize, seen: usize) {
        self.correct += correct as u64;
        self.seen += seen as u64;
    }

    fn ratio(self) -> f32 {
        if self.seen == 0 {
            0.0
        } else {
            (self.correct as f64 / self.seen as f64) as f32
        }
    }
}

fn argmax(row: ArrayView1<'_, f32>) -> usize {
    let mut best = 0;
    for (i, &v) in row.iter().enumerate() {
        if v > row[best] {
            best = i;
        }
    }
    best
}

fn same_shape(name: &'static str, y_true: &Array2<f32>, y_pred: &Array2<f32>) -> Result<()> {
    if y_true.dim() != y_pred.dim() {
        return Err(Error::shape(name, y_pred.shape(), y_true.shape()));
    }
    Ok(())
}

/// Fraction of elements where prediction equals target exactly
///
/// # Example
///
/// ```
/// use paso::train::{Accuracy, Metric};
/// use ndarray::array;
///
/// let mut acc = Accuracy::new();
/// acc.update_state(&array![[1.0], [0.0]], &array![[1.0], [1.0]]);
/// assert_eq!(acc.result(), 0.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Accuracy {
    counts: Counts,
}

impl Accuracy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Metric for Accuracy {
    fn name(&self) -> &str {
        "accuracy"
    }

    fn validate(&self, y_true: &Array2<f32>, y_pred: &Array2<f32>) -> Result<()> {
        same_shape("accuracy", y_true, y_pred)
    }

    fn update_state(&mut self, y_true: &Array2<f32>, y_pred: &Array2<f32>) {
        let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
        self.counts.add(correct, y_true.len());
    }

    fn result(&self) -> f32 {
        self.counts.ratio()
    }

    fn reset_state(&mut self) {
        self.counts = Counts::default();
    }
}

/// Fraction of rows whose argmax prediction equals the integer label
#[derive(Debug, Clone)]
pub struct SparseCategoricalAccuracy {
    name: &'static str,
    counts: Counts,
}

impl SparseCategoricalAccuracy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same metric reported under another log key, e.g. `accuracy`
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            counts: Counts::default(),
        }
    }
}

impl Default for SparseCategoricalAccuracy {
    fn default() -> Self {
        Self::named("sparse_categorical_accuracy")
    }
}

impl Metric for SparseCategoricalAccuracy {
    fn name(&self) -> &str {
        self.name
    }

    fn validate(&self, y_true: &Array2<f32>, y_pred: &Array2<f32>) -> Result<()> {
        if y_true.ncols() != 1 || y_true.nrows() != y_pred.nrows() {
            return Err(Error::shape(
                self.name,
                &[y_pred.nrows(), 1],
                y_true.shape(),
            ));
        }
        Ok(())
    }

    fn update_state(&mut self, y_true: &Array2<f32>, y_pred: &Array2<f32>) {
        let correct = y_pred
            .rows()
            .into_iter()
            .zip(y_true.column(0))
            .filter(|(row, label)| argmax(row.view()) as f32 == **label)
            .count();
        self.counts.add(correct, y_pred.nrows());
    }

    fn result(&self) -> f32 {
        self.counts.ratio()
    }

    fn reset_state(&mut self) {
        self.counts = Counts::default();
    }
}

/// Fraction of rows whose argmax prediction equals the argmax target
#[derive(Debug, Clone)]
pub struct CategoricalAccuracy {
    name: &'static str,
    counts: Counts,
}

impl CategoricalAccuracy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same metric reported under another log key, e.g. `accuracy`
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            counts: Counts::default(),
        }
    }
}

impl Default for CategoricalAccuracy {
    fn default() -> Self {
        Self::named("categorical_accuracy")
    }
}

impl Metric for CategoricalAccuracy {
    fn name(&self) -> &str {
        self.name
    }

    fn validate(&self, y_true: &Array2<f32>, y_pred: &Array2<f32>) -> Result<()> {
        same_shape(self.name, y_true, y_pred)
    }

    fn update_state(&mut self, y_true: &Array2<f32>, y_pred: &Array2<f32>) {
        let correct = y_pred
            .rows()
            .into_iter()
            .zip(y_true.rows())
            .filter(|(p, t)| argmax(p.view()) == argmax(t.view()))
            .count();
        self.counts.add(correct, y_pred.nrows());
    }

    fn result(&self) -> f32 {
        self.counts.ratio()
    }

    fn reset_state(&mut self) {
        self.counts = Counts::default();
    }
}
