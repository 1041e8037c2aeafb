//! Loss functions for training
//!
//! - [`SparseCategoricalCrossentropy`] - integer class labels
//! - [`CategoricalCrossentropy`] - one-hot targets
//! - [`MeanSquaredError`] - regression

mod cross_entropy;
mod mse;
mod traits;

pub use cross_entropy::{CategoricalCrossentropy, SparseCategoricalCrossentropy, EPSILON};
pub use mse::MeanSquaredError;
pub use traits::Loss;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loss_names() {
        assert_eq!(MeanSquaredError.name(), "mean_squared_error");
        assert_eq!(
            SparseCategoricalCrossentropy::default().name(),
            "sparse_categorical_crossentropy"
        );
        assert_eq!(CategoricalCrossentropy::default().name(), "categorical_crossentropy");
        let boxed: Box<dyn Loss> = Box::new(MeanSquaredError);
        assert_eq!(boxed.name(), "mean_squared_error");
    }
}
