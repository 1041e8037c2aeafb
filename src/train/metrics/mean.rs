//! Running mean of scalar values

use super::Metric;
use ndarray::Array2;

/// Running average of the values it is fed
///
/// As a [`Metric`] it ignores targets and averages every element of the
/// prediction array, which is how the trainer feeds it the `(1, 1)` batch
/// loss.
#[derive(Debug, Clone)]
pub struct Mean {
    name: String,
    total: f64,
    count: u64,
}

impl Mean {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            total: 0.0,
            count: 0,
        }
    }

    /// Add one value
    pub fn update(&mut self, value: f32) {
        self.total += f64::from(value);
        self.count += 1;
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

impl Metric for Mean {
    fn name(&self) -> &str {
        &self.name
    }

    fn update_state(&mut self, _y_true: &Array2<f32>, y_pred: &Array2<f32>) {
        for &v in y_pred {
            self.update(v);
        }
    }

    fn result(&self) -> f32 {
        if self.count == 0 {
            0.0
        } else {
            (self.total / self.count as f64) as f32
        }
    }

    fn reset_state(&mut self) {
        self.total = 0.0;
        self.count = 0;
    }
}
