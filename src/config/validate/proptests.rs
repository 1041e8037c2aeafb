//! Property-based tests for configuration validation

use super::error::ValidationError;
use super::validator::validate_config;
use crate::config::schema::*;
use proptest::prelude::*;

fn arb_valid_spec() -> impl Strategy<Value = RunSpec> {
    (
        1usize..256,                        // batch_size
        1e-6f32..1.0,                       // lr
        1usize..100,                        // epochs
        proptest::option::of(0.1f32..10.0), // max_grad_norm
        0.0f32..0.9,                        // dropout
        2usize..10,                         // classes
    )
        .prop_map(|(batch_size, lr, epochs, max_grad_norm, dropout, classes)| RunSpec {
            seed: 0,
            data: DataSpec {
                classes,
                ..DataSpec::default()
            },
            training: TrainingParams {
                epochs,
                batch_size,
                max_grad_norm,
                ..TrainingParams::default()
            },
            optimizer: OptimSpec {
                lr: Some(lr),
                ..OptimSpec::default()
            },
            loss: LossKind::SparseCategoricalCrossentropy,
            metrics: vec![MetricKind::SparseCategoricalAccuracy],
            models: vec![ModelSpec {
                name: "m".into(),
                kind: ModelKind::Functional,
                hidden: vec![4],
                dropout,
            }],
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_valid_spec_passes(spec in arb_valid_spec()) {
        prop_assert!(validate_config(&spec).is_ok());
    }

    #[test]
    fn prop_zero_batch_size_fails(spec in arb_valid_spec()) {
        let mut spec = spec;
        spec.training.batch_size = 0;
        prop_assert_eq!(validate_config(&spec), Err(ValidationError::InvalidBatchSize(0)));
    }

    #[test]
    fn prop_non_positive_lr_fails(spec in arb_valid_spec(), lr in -1.0f32..=0.0) {
        let mut spec = spec;
        spec.optimizer.lr = Some(lr);
        prop_assert!(matches!(
            validate_config(&spec),
            Err(ValidationError::InvalidLearningRate(_))
        ));
    }

    #[test]
    fn prop_zero_epochs_fails(spec in arb_valid_spec()) {
        let mut spec = spec;
        spec.training.epochs = 0;
        prop_assert_eq!(validate_config(&spec), Err(ValidationError::InvalidEpochs(0)));
    }
}
