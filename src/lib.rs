//! paso: one training step for every model
//!
//! A [`Trainer`](train::Trainer) owns any [`Model`](model::Model) together
//! with an optimizer, a loss and a set of stateful metrics. Its
//! [`train_step`](train::Trainer::train_step) and
//! [`eval_step`](train::Trainer::eval_step) are written once and reused for
//! sequential stacks, layer graphs and hand-written models alike.
//!
//! # Modules
//!
//! - [`autograd`]: tape-based reverse-mode differentiation over `ndarray`
//! - [`nn`]: layers (dense, dropout, merges) and initializers
//! - [`model`]: the `Model` trait, `Sequential` and `Functional`
//! - [`optim`]: SGD with momentum and Adam
//! - [`train`]: losses, metrics, callbacks and the `Trainer`
//! - [`data`]: in-memory datasets, batching and synthetic blobs
//! - [`config`]: YAML run specifications
//! - [`cli`]: the `paso` command-line interface
//!
//! # Example
//!
//! ```
//! use paso::data::synthetic::{blobs, BlobSpec};
//! use paso::model::{FunctionalBuilder, Model, Sequential};
//! use paso::nn::{Activation, Concatenate, Dense};
//! use paso::optim::Adam;
//! use paso::train::{FitOptions, SparseCategoricalAccuracy, SparseCategoricalCrossentropy, Trainer};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let (train, val) = blobs(BlobSpec::default(), 1).unwrap().split_validation(0.2).unwrap();
//! let mut rng = StdRng::seed_from_u64(1);
//!
//! let mlp = Sequential::new("mlp")
//!     .add(Dense::new("hidden", 4, 16, Activation::Relu, &mut rng))
//!     .add(Dense::new("out", 16, 3, Activation::Softmax, &mut rng));
//!
//! let mut graph = FunctionalBuilder::new("wide_and_deep");
//! let x = graph.input();
//! let deep = graph.apply(Dense::new("deep", 4, 16, Activation::Relu, &mut rng), &[x]).unwrap();
//! let merged = graph.apply(Concatenate::new("merge"), &[x, deep]).unwrap();
//! let out = graph.apply(Dense::new("out", 20, 3, Activation::Softmax, &mut rng), &[merged]).unwrap();
//! let wide = graph.build(out).unwrap();
//!
//! let models: Vec<Box<dyn Model>> = vec![Box::new(mlp), Box::new(wide)];
//! for model in models {
//!     let mut trainer = Trainer::builder(model)
//!         .optimizer(Adam::default_params(0.01))
//!         .loss(SparseCategoricalCrossentropy::default())
//!         .metric(SparseCategoricalAccuracy::new())
//!         .build()
//!         .unwrap();
//!     let history = trainer.fit(&train, Some(&val), &FitOptions::new(2, 32)).unwrap();
//!     assert!(history.last().unwrap().contains_key("val_loss"));
//! }
//! ```

pub mod autograd;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod nn;
pub mod optim;
pub mod train;

pub use error::{Error, Result};
