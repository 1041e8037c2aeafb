//! Stateful metric accumulators
//!
//! - [`Mean`]: running average, used for the `"loss"` tracker
//! - [`Accuracy`], [`SparseCategoricalAccuracy`], [`CategoricalAccuracy`]

mod classification;
mod mean;
mod trait_def;

#[cfg(test)]
mod tests;

pub use classification::{Accuracy, CategoricalAccuracy, SparseCategoricalAccuracy};
pub use mean::Mean;
pub use trait_def::Metric;
