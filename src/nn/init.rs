//! Weight initializers
//!
//! Initializers take an explicit RNG so that a fixed seed reproduces the same
//! weights across runs.

use ndarray::Array2;
use rand::Rng;

/// Glorot (Xavier) uniform: U(-limit, limit), limit = sqrt(6 / (fan_in + fan_out))
pub fn glorot_uniform<R: Rng + ?Sized>(rng: &mut R, fan_in: usize, fan_out: usize) -> Array2<f32> {
    let limit = (6.0 / (fan_in + fan_out).max(1) as f32).sqrt();
    Array2::from_shape_simple_fn((fan_in, fan_out), || rng.random_range(-limit..=limit))
}

/// Standard normal sample via Box-Muller
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    let u1: f32 = rng.random::<f32>().max(1e-10);
    let u2: f32 = rng.random::<f32>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos()
}
