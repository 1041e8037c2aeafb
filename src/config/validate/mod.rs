//! Configuration validation
//!
//! Validates run specifications for correctness before anything is built.

mod error;
mod validator;

#[cfg(test)]
mod proptests;

pub use error::ValidationError;
pub use validator::validate_config;
