//! The Trainer: one train step and one eval step shared by every model
//!
//! - [`Trainer::train_step`] / [`Trainer::eval_step`]: one batch
//! - [`Trainer::evaluate`] / [`Trainer::predict`]: a whole dataset
//! - [`Trainer::fit`]: epochs, validation and callbacks

mod core;
mod epoch;
mod fit;
mod result;
mod step;

pub use self::core::{Trainer, TrainerBuilder, LOSS_METRIC};
pub use result::History;
