//! Basic autograd operations: add, sub, mul, scale, bias

use crate::autograd::backward::{contributions, BackwardOp, NodeId};
use crate::autograd::{Tape, Var};
use crate::{Error, Result};
use ndarray::{Array2, Axis};
use std::rc::Rc;

fn same_shape(op: &'static str, a: &Var, b: &Var) -> Result<()> {
    if a.shape() != b.shape() {
        let (ar, ac) = a.shape();
        let (br, bc) = b.shape();
        return Err(Error::shape(op, &[ar, ac], &[br, bc]));
    }
    Ok(())
}

impl Tape {
    /// Element-wise sum of two equally shaped values
    pub fn add(&self, a: &Var, b: &Var) -> Result<Var> {
        same_shape("add", a, b)?;
        let (na, nb) = (self.node_of(a), self.node_of(b));
        let data = a.value() + b.value();
        let op = self
            .tracks(&[na, nb])
            .then(|| Box::new(AddBackward { a: na, b: nb, sign: 1.0 }) as Box<dyn BackwardOp>);
        Ok(self.emit(data, op))
    }

    /// Element-wise difference `a - b`
    pub fn sub(&self, a: &Var, b: &Var) -> Result<Var> {
        same_shape("sub", a, b)?;
        let (na, nb) = (self.node_of(a), self.node_of(b));
        let data = a.value() - b.value();
        let op = self
            .tracks(&[na, nb])
            .then(|| Box::new(AddBackward { a: na, b: nb, sign: -1.0 }) as Box<dyn BackwardOp>);
        Ok(self.emit(data, op))
    }

    /// Element-wise product
    pub fn mul(&self, a: &Var, b: &Var) -> Result<Var> {
        same_shape("mul", a, b)?;
        let (na, nb) = (self.node_of(a), self.node_of(b));
        let data = a.value() * b.value();
        let op = self.tracks(&[na, nb]).then(|| {
            Box::new(MulBackward {
                a: na,
                b: nb,
                a_value: Rc::new(a.value().clone()),
                b_value: Rc::new(b.value().clone()),
            }) as Box<dyn BackwardOp>
        });
        Ok(self.emit(data, op))
    }

    /// Element-wise product with a constant array (e.g. a dropout mask)
    pub fn mul_constant(&self, a: &Var, mask: &Array2<f32>) -> Result<Var> {
        if a.shape() != mask.dim() {
            let (r, c) = a.shape();
            return Err(Error::shape("mul_constant", &[r, c], mask.shape()));
        }
        let na = self.node_of(a);
        let data = a.value() * mask;
        let op = self.tracks(&[na]).then(|| {
            Box::new(MaskBackward {
                a: na,
                mask: mask.clone(),
            }) as Box<dyn BackwardOp>
        });
        Ok(self.emit(data, op))
    }

    /// Multiply by a scalar
    pub fn scale(&self, a: &Var, factor: f32) -> Var {
        let na = self.node_of(a);
        let data = a.value() * factor;
        let op = self
            .tracks(&[na])
            .then(|| Box::new(ScaleBackward { a: na, factor }) as Box<dyn BackwardOp>);
        self.emit(data, op)
    }

    /// Add a `(1, n)` bias row to every row of an `(m, n)` value
    pub fn add_bias(&self, x: &Var, bias: &Var) -> Result<Var> {
        let (rows, cols) = x.shape();
        if bias.shape() != (1, cols) {
            let (br, bc) = bias.shape();
            return Err(Error::shape("add_bias", &[1, cols], &[br, bc]));
        }
        let (nx, nb) = (self.node_of(x), self.node_of(bias));
        let data = x.value() + bias.value();
        let op = self
            .tracks(&[nx, nb])
            .then(|| Box::new(BiasBackward { x: nx, bias: nb, rows }) as Box<dyn BackwardOp>);
        Ok(self.emit(data, op))
    }
}

struct AddBackward {
    a: Option<NodeId>,
    b: Option<NodeId>,
    sign: f32,
}

impl BackwardOp for AddBackward {
    fn backward(&self, grad: &Array2<f32>) -> Vec<(NodeId, Array2<f32>)> {
        // ∂L/∂a = ∂L/∂out, ∂L/∂b = sign * ∂L/∂out
        contributions([
            (self.a, self.a.map(|_| grad.clone())),
            (self.b, self.b.map(|_| grad * self.sign)),
        ])
    }

    fn name(&self) -> &'static str {
        if self.sign < 0.0 {
            "sub"
        } else {
            "add"
        }
    }
}

struct MulBackward {
    a: Option<NodeId>,
    b: Option<NodeId>,
    a_value: Rc<Array2<f32>>,
    b_value: Rc<Array2<f32>>,
}

impl BackwardOp for MulBackward {
    fn backward(&self, grad: &Array2<f32>) -> Vec<(NodeId, Array2<f32>)> {
        // ∂L/∂a = ∂L/∂out * b, ∂L/∂b = ∂L/∂out * a
        contributions([
            (self.a, self.a.map(|_| grad * &*self.b_value)),
            (self.b, self.b.map(|_| grad * &*self.a_value)),
        ])
    }

    fn name(&self) -> &'static str {
        "mul"
    }
}

struct MaskBackward {
    a: Option<NodeId>,
    mask: Array2<f32>,
}

impl BackwardOp for MaskBackward {
    fn backward(&self, grad: &Array2<f32>) -> Vec<(NodeId, Array2<f32>)> {
        contributions([(self.a, Some(grad * &self.mask))])
    }

    fn name(&self) -> &'static str {
        "mul_constant"
    }
}

struct ScaleBackward {
    a: Option<NodeId>,
    factor: f32,
}

impl BackwardOp for ScaleBackward {
    fn backward(&self, grad: &Array2<f32>) -> Vec<(NodeId, Array2<f32>)> {
        contributions([(self.a, Some(grad * self.factor))])
    }

    fn name(&self) -> &'static str {
        "scale"
    }
}

struct BiasBackward {
    x: Option<NodeId>,
    bias: Option<NodeId>,
    rows: usize,
}

impl BackwardOp for BiasBackward {
    fn backward(&self, grad: &Array2<f32>) -> Vec<(NodeId, Array2<f32>)> {
        debug_assert_eq!(grad.nrows(), self.rows);
        // bias gradient sums over the broadcast rows
        contributions([
            (self.x, self.x.map(|_| grad.clone())),
            (self.bias, self.bias.map(|_| grad.sum_axis(Axis(0)).insert_axis(Axis(0)))),
        ])
    }

    fn name(&self) -> &'static str {
        "add_bias"
    }
}
