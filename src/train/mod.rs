//! The training layer: losses, metrics, the Trainer and its driver
//!
//! - Losses: sparse and dense cross entropy, mean squared error
//! - Stateful metric accumulators (`loss` tracker, accuracies)
//! - [`Trainer`]: one train step and one eval step for any [`Model`](crate::model::Model)
//! - `fit` with validation, history and callbacks
//!
//! # Example
//!
//! ```
//! use paso::data::synthetic::{blobs, BlobSpec};
//! use paso::model::Sequential;
//! use paso::nn::{Activation, Dense};
//! use paso::optim::Sgd;
//! use paso::train::{SparseCategoricalAccuracy, SparseCategoricalCrossentropy, Trainer};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let data = blobs(BlobSpec::default(), 7).unwrap();
//! let mut rng = StdRng::seed_from_u64(7);
//! let model = Sequential::new("clf")
//!     .add(Dense::new("hidden", 4, 8, Activation::Relu, &mut rng))
//!     .add(Dense::new("out", 8, 3, Activation::Softmax, &mut rng));
//!
//! let mut trainer = Trainer::builder(model)
//!     .optimizer(Sgd::new(0.1))
//!     .loss(SparseCategoricalCrossentropy::default())
//!     .metric(SparseCategoricalAccuracy::new())
//!     .build()
//!     .unwrap();
//!
//! for batch in data.batches(64, None).unwrap() {
//!     let logs = trainer.train_step(&batch).unwrap();
//!     assert!(logs["loss"].is_finite());
//! }
//! ```

mod batch;
pub mod callback;
mod config;
pub mod loss;
pub mod metrics;
mod trainer;


use std::collections::BTreeMap;

/// Metric name to current value, sorted by name
pub type Logs = BTreeMap<String, f32>;

pub use batch::Batch;
pub(crate) use batch::class_indices;
pub use callback::{CallbackAction, CallbackContext, CallbackManager, EarlyStopping, ProgressLogger, TrainerCallback};
pub use config::{FitOptions, NonFinitePolicy, TrainConfig};
pub use loss::{CategoricalCrossentropy, Loss, MeanSquaredError, SparseCategoricalCrossentropy};
pub use metrics::{Accuracy, CategoricalAccuracy, Mean, Metric, SparseCategoricalAccuracy};
pub use trainer::{History, Trainer, TrainerBuilder, LOSS_METRIC};
