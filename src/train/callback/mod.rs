//! Callback system for training events
//!
//! Hooks fired by [`Trainer::fit`](crate::train::Trainer::fit):
//! - `on_train_begin` / `on_train_end`
//! - `on_epoch_begin` / `on_epoch_end`
//! - `on_batch_end`
//!
//! # Example
//!
//! ```rust
//! use paso::train::callback::{CallbackAction, CallbackContext, TrainerCallback};
//!
//! struct StopAtHalf;
//!
//! impl TrainerCallback for StopAtHalf {
//!     fn on_epoch_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
//!         if ctx.metric("accuracy").unwrap_or(0.0) >= 0.5 {
//!             CallbackAction::Stop
//!         } else {
//!             CallbackAction::Continue
//!         }
//!     }
//! }
//! ```

mod early_stopping;
mod manager;
mod progress;
mod traits;

pub use early_stopping::{Direction, EarlyStopping};
pub use manager::CallbackManager;
pub use progress::ProgressLogger;
pub use traits::{CallbackAction, CallbackContext, TrainerCallback};
