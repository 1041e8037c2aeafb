//! Gradients produced by a tape, paired with their parameters

use super::Parameter;
use ndarray::Array2;

/// Ordered `(parameter, gradient)` pairs returned by [`Tape::gradient`](super::Tape::gradient).
#[derive(Debug, Clone)]
pub struct Gradients {
    entries: Vec<(Parameter, Array2<f32>)>,
}

impl Gradients {
    pub fn new(entries: Vec<(Parameter, Array2<f32>)>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Parameter, &Array2<f32>)> {
        self.entries.iter().map(|(p, g)| (p, g))
    }

    /// Gradient for a specific parameter
    pub fn get(&self, param: &Parameter) -> Option<&Array2<f32>> {
        self.entries
            .iter()
            .find(|(p, _)| p.id() == param.id())
            .map(|(_, g)| g)
    }

    /// Whether every gradient is exactly zero
    pub fn is_zero(&self) -> bool {
        self.entries
            .iter()
            .all(|(_, g)| g.iter().all(|&v| v == 0.0))
    }

    /// First parameter whose gradient holds NaN or infinity
    pub fn first_non_finite(&self) -> Option<&Parameter> {
        self.entries
            .iter()
            .find(|(_, g)| g.iter().any(|v| !v.is_finite()))
            .map(|(p, _)| p)
    }

    /// L2 norm over all gradients: sqrt(sum of squared entries)
    pub fn global_norm(&self) -> f32 {
        self.entries
            .iter()
            .map(|(_, g)| g.iter().map(|&v| v * v).sum::<f32>())
            .sum::<f32>()
            .sqrt()
    }

    /// Clip by global norm
    ///
    /// If the global norm exceeds `max_norm` every gradient is scaled by
    /// `max_norm / global_norm`, keeping the relative magnitudes across
    /// parameters. Returns the norm before clipping.
    pub fn clip_by_global_norm(&mut self, max_norm: f32) -> f32 {
        let global_norm = self.global_norm();
        if global_norm > max_norm && global_norm > 0.0 {
            let clip_coef = max_norm / global_norm;
            for (_, grad) in &mut self.entries {
                grad.mapv_inplace(|g| g * clip_coef);
            }
        }
        global_norm
    }
}
