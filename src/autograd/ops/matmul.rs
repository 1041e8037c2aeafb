//! Matrix multiplication

use crate::autograd::backward::{contributions, BackwardOp, NodeId};
use crate::autograd::{Tape, Var};
use crate::{Error, Result};
use ndarray::Array2;
use std::rc::Rc;

impl Tape {
    /// `(m, k) x (k, n) -> (m, n)`
    pub fn matmul(&self, a: &Var, b: &Var) -> Result<Var> {
        let (m, k) = a.shape();
        let (k2, n) = b.shape();
        if k != k2 {
            return Err(Error::shape("matmul", &[k, n], &[k2, n]));
        }
        tracing::trace!(m, k, n, "matmul");

        let (na, nb) = (self.node_of(a), self.node_of(b));
        let data = a.value().dot(b.value());
        let op = self.tracks(&[na, nb]).then(|| {
            Box::new(MatmulBackward {
                a: na,
                b: nb,
                a_value: Rc::new(a.value().clone()),
                b_value: Rc::new(b.value().clone()),
            }) as Box<dyn BackwardOp>
        });
        Ok(self.emit(data, op))
    }
}

struct MatmulBackward {
    a: Option<NodeId>,
    b: Option<NodeId>,
    a_value: Rc<Array2<f32>>,
    b_value: Rc<Array2<f32>>,
}

impl BackwardOp for MatmulBackward {
    fn backward(&self, grad: &Array2<f32>) -> Vec<(NodeId, Array2<f32>)> {
        // ∂L/∂A = ∂L/∂C · Bᵀ, ∂L/∂B = Aᵀ · ∂L/∂C
        contributions([
            (self.a, self.a.map(|_| grad.dot(&self.b_value.t()))),
            (self.b, self.b.map(|_| self.a_value.t().dot(grad))),
        ])
    }

    fn name(&self) -> &'static str {
        "matmul"
    }
}
