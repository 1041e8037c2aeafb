//! Tests for metric accumulators

use super::{Accuracy, CategoricalAccuracy, Mean, Metric, SparseCategoricalAccuracy};
use approx::assert_relative_eq;
use ndarray::{array, Array2};
use proptest::prelude::*;

#[test]
fn test_accuracy_accumulates_across_batches() {
    let mut acc = Accuracy::new();
    acc.update_state(&array![[1.0], [1.0]], &array![[1.0], [1.0]]);
    acc.update_state(&array![[1.0], [0.0]], &array![[0.0], [1.0]]);
    assert_relative_eq!(acc.result(), 0.5);
}

#[test]
fn test_accuracy_rejects_shape_mismatch() {
    let acc = Accuracy::new();
    assert!(acc.validate(&array![[1.0, 0.0]], &array![[1.0]]).is_err());
}

#[test]
fn test_sparse_categorical_accuracy() {
    let mut acc = SparseCategoricalAccuracy::new();
    let probs = array![[0.1, 0.9], [0.8, 0.2], [0.3, 0.7]];
    acc.update_state(&array![[1.0], [0.0], [0.0]], &probs);
    assert_relative_eq!(acc.result(), 2.0 / 3.0);
}

#[test]
fn test_sparse_categorical_accuracy_validate() {
    let acc = SparseCategoricalAccuracy::new();
    let probs = array![[0.1, 0.9], [0.8, 0.2]];
    assert!(acc.validate(&array![[1.0], [0.0]], &probs).is_ok());
    assert!(acc.validate(&array![[1.0]], &probs).is_err());
    assert!(acc.validate(&array![[1.0, 0.0], [0.0, 1.0]], &probs).is_err());
}

#[test]
fn test_categorical_accuracy() {
    let mut acc = CategoricalAccuracy::new();
    acc.update_state(
        &array![[0.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
        &array![[0.2, 0.5, 0.3], [0.1, 0.1, 0.8]],
    );
    assert_relative_eq!(acc.result(), 0.5);
}

#[test]
fn test_reset_clears_state() {
    let mut metrics: Vec<Box<dyn Metric>> = vec![
        Box::new(Mean::new("loss")),
        Box::new(Accuracy::new()),
        Box::new(SparseCategoricalAccuracy::new()),
    ];
    for m in &mut metrics {
        m.update_state(&array![[1.0]], &array![[1.0]]);
        assert!(m.result() > 0.0);
        m.reset_state();
        assert_eq!(m.result(), 0.0);
    }
}

fn labels_and_probs() -> impl Strategy<Value = (Array2<f32>, Array2<f32>)> {
    (1usize..8, 2usize..5).prop_flat_map(|(rows, classes)| {
        (
            prop::collection::vec(0..classes, rows),
            prop::collection::vec(0.0f32..1.0, rows * classes),
        )
            .prop_map(move |(labels, probs)| {
                let y_true = Array2::from_shape_fn((rows, 1), |(r, _)| labels[r] as f32);
                let y_pred = Array2::from_shape_vec((rows, classes), probs)
                    .unwrap_or_else(|_| Array2::zeros((rows, classes)));
                (y_true, y_pred)
            })
    })
}

proptest! {
    #[test]
    fn prop_sparse_accuracy_in_unit_interval((y_true, y_pred) in labels_and_probs()) {
        let mut acc = SparseCategoricalAccuracy::new();
        prop_assert!(acc.validate(&y_true, &y_pred).is_ok());
        acc.update_state(&y_true, &y_pred);
        let r = acc.result();
        prop_assert!((0.0..=1.0).contains(&r));
    }

    #[test]
    fn prop_accuracy_of_identical_arrays_is_one(values in prop::collection::vec(-10.0f32..10.0, 1..32)) {
        let y = Array2::from_shape_vec((values.len(), 1), values).unwrap();
        let mut acc = Accuracy::new();
        acc.update_state(&y, &y);
        prop_assert_eq!(acc.result(), 1.0);
    }

    #[test]
    fn prop_mean_matches_arithmetic_mean(values in prop::collection::vec(-100.0f32..100.0, 1..20)) {
        let mut m = Mean::new("loss");
        for &v in &values {
            m.update(v);
        }
        let expected = values.iter().map(|&v| f64::from(v)).sum::<f64>() / values.len() as f64;
        prop_assert!((f64::from(m.result()) - expected).abs() < 1e-3);
    }
}
