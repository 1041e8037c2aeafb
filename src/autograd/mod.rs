//! Tape-based autograd engine
//!
//! Reverse-mode automatic differentiation over 2-D `f32` arrays.
//!
//! ```
//! use paso::autograd::{Parameter, Tape};
//! use ndarray::array;
//!
//! let w = Parameter::new("w", array![[2.0]]);
//! let tape = Tape::record();
//! let x = tape.constant(array![[3.0]]);
//! let y = tape.matmul(&x, &tape.param(&w)).unwrap();
//! let grads = tape.gradient(&y, &[w.clone()]).unwrap();
//! assert_eq!(grads.get(&w).unwrap()[[0, 0]], 3.0);
//! ```

mod backward;
mod gradients;
mod ops;
mod parameter;
mod tape;

#[cfg(test)]
mod tests;

pub use gradients::Gradients;
pub use parameter::{ParamId, Parameter};
pub use tape::{Tape, Var};
