//! Differentiable operations, implemented as methods on [`Tape`](super::Tape)
//!
//! Each op computes its value eagerly and, when the tape is recording and at
//! least one input is tracked, records a backward rule.

mod activations;
mod basic;
mod matmul;
mod reduce;
mod select;
