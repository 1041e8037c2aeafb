//! Optimizers that apply gradients to parameters

mod adam;
mod optimizer;
mod sgd;

pub use adam::Adam;
pub use optimizer::Optimizer;
pub use sgd::Sgd;
