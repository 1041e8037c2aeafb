//! Reductions to a `(1, 1)` scalar

use crate::autograd::backward::{contributions, BackwardOp, NodeId};
use crate::autograd::{Tape, Var};
use ndarray::Array2;

impl Tape {
    /// Sum of all elements
    pub fn sum(&self, x: &Var) -> Var {
        self.reduce(x, 1.0)
    }

    /// Mean of all elements; the mean of an empty value is NaN
    pub fn mean(&self, x: &Var) -> Var {
        let n = x.value().len();
        self.reduce(x, 1.0 / n as f32)
    }

    fn reduce(&self, x: &Var, factor: f32) -> Var {
        let nx = self.node_of(x);
        let data = Array2::from_elem((1, 1), x.value().sum() * factor);
        let op = self.tracks(&[nx]).then(|| {
            Box::new(ReduceBackward {
                x: nx,
                shape: x.shape(),
                factor,
            }) as Box<dyn BackwardOp>
        });
        self.emit(data, op)
    }
}

struct ReduceBackward {
    x: Option<NodeId>,
    shape: (usize, usize),
    factor: f32,
}

impl BackwardOp for ReduceBackward {
    fn backward(&self, grad: &Array2<f32>) -> Vec<(NodeId, Array2<f32>)> {
        // broadcast the upstream scalar back over the input
        let g = grad[[0, 0]] * self.factor;
        contributions([(self.x, Some(Array2::from_elem(self.shape, g)))])
    }

    fn name(&self) -> &'static str {
        "reduce"
    }
}
