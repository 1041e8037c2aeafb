//! Activation functions: ReLU, sigmoid, softmax, clamped log

use crate::autograd::backward::{contributions, BackwardOp, NodeId};
use crate::autograd::{Tape, Var};
use ndarray::{Array2, Axis};

impl Tape {
    /// ReLU: max(0, x)
    pub fn relu(&self, x: &Var) -> Var {
        let nx = self.node_of(x);
        let data = x.value().mapv(|v| v.max(0.0));
        let op = self.tracks(&[nx]).then(|| {
            Box::new(ReluBackward {
                x: nx,
                active: x.value().mapv(|v| if v > 0.0 { 1.0 } else { 0.0 }),
            }) as Box<dyn BackwardOp>
        });
        self.emit(data, op)
    }

    /// Logistic sigmoid: 1 / (1 + e^-x)
    pub fn sigmoid(&self, x: &Var) -> Var {
        let nx = self.node_of(x);
        let data = x.value().mapv(|v| 1.0 / (1.0 + (-v).exp()));
        let op = self.tracks(&[nx]).then(|| {
            Box::new(SigmoidBackward {
                x: nx,
                output: data.clone(),
            }) as Box<dyn BackwardOp>
        });
        self.emit(data, op)
    }

    /// Row-wise softmax with max subtraction for stability
    pub fn softmax(&self, x: &Var) -> Var {
        let nx = self.node_of(x);
        let mut data = x.value().clone();
        for mut row in data.rows_mut() {
            let max = row.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
            row.mapv_inplace(|v| (v - max).exp());
            let sum: f32 = row.sum();
            row.mapv_inplace(|v| v / sum);
        }
        let op = self.tracks(&[nx]).then(|| {
            Box::new(SoftmaxBackward {
                x: nx,
                output: data.clone(),
            }) as Box<dyn BackwardOp>
        });
        self.emit(data, op)
    }

    /// Natural log of `x` clamped to `[epsilon, 1 - epsilon]`
    ///
    /// Used on probabilities; the gradient is zero where clamping applied.
    pub fn log_clamped(&self, x: &Var, epsilon: f32) -> Var {
        let nx = self.node_of(x);
        let clamped = x.value().mapv(|v| v.clamp(epsilon, 1.0 - epsilon));
        let data = clamped.mapv(f32::ln);
        let op = self.tracks(&[nx]).then(|| {
            let local = ndarray::Zip::from(x.value())
                .and(&clamped)
                .map_collect(|&raw, &c| if raw == c { 1.0 / c } else { 0.0 });
            Box::new(LogBackward { x: nx, local }) as Box<dyn BackwardOp>
        });
        self.emit(data, op)
    }
}

struct ReluBackward {
    x: Option<NodeId>,
    active: Array2<f32>,
}

impl BackwardOp for ReluBackward {
    fn backward(&self, grad: &Array2<f32>) -> Vec<(NodeId, Array2<f32>)> {
        contributions([(self.x, Some(grad * &self.active))])
    }

    fn name(&self) -> &'static str {
        "relu"
    }
}

struct SigmoidBackward {
    x: Option<NodeId>,
    output: Array2<f32>,
}

impl BackwardOp for SigmoidBackward {
    fn backward(&self, grad: &Array2<f32>) -> Vec<(NodeId, Array2<f32>)> {
        // σ'(x) = σ(x)(1 - σ(x))
        let local = self.output.mapv(|s| s * (1.0 - s));
        contributions([(self.x, Some(grad * &local))])
    }

    fn name(&self) -> &'static str {
        "sigmoid"
    }
}

struct SoftmaxBackward {
    x: Option<NodeId>,
    output: Array2<f32>,
}

impl BackwardOp for SoftmaxBackward {
    fn backward(&self, grad: &Array2<f32>) -> Vec<(NodeId, Array2<f32>)> {
        // ∂L/∂x = s ⊙ (g - Σ_j g_j s_j), per row
        let dot = (grad * &self.output)
            .sum_axis(Axis(1))
            .insert_axis(Axis(1));
        let grad_x = &self.output * &(grad - &dot);
        contributions([(self.x, Some(grad_x))])
    }

    fn name(&self) -> &'static str {
        "softmax"
    }
}

struct LogBackward {
    x: Option<NodeId>,
    local: Array2<f32>,
}

impl BackwardOp for LogBackward {
    fn backward(&self, grad: &Array2<f32>) -> Vec<(NodeId, Array2<f32>)> {
        contributions([(self.x, Some(grad * &self.local))])
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

#[cfg(test)]
mod tests {
    use crate::autograd::{Parameter, Tape};
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_relu_forward_and_grad() {
        let tape = Tape::record();
        let x = Parameter::new("x", array![[-1.0, 0.0, 2.0]]);
        let y = tape.relu(&tape.param(&x));
        assert_eq!(y.value(), &array![[0.0, 0.0, 2.0]]);
        let loss = tape.sum(&y);
        let grads = tape.gradient(&loss, &[x.clone()]).unwrap();
        assert_eq!(grads.get(&x).unwrap(), &array![[0.0, 0.0, 1.0]]);
    }

    #[test]
    fn test_sigmoid_at_zero() {
        let tape = Tape::record();
        let x = Parameter::new("x", array![[0.0]]);
        let y = tape.sigmoid(&tape.param(&x));
        assert_relative_eq!(y.scalar(), 0.5);
        let grads = tape.gradient(&y, &[x.clone()]).unwrap();
        assert_relative_eq!(grads.get(&x).unwrap()[[0, 0]], 0.25);
    }

    #[test]
    fn test_softmax_rows_sum_to_one() {
        let tape = Tape::inference();
        let x = tape.constant(array![[1.0, 2.0, 3.0], [1000.0, 1000.0, 1000.0]]);
        let y = tape.softmax(&x);
        for row in y.value().rows() {
            assert_relative_eq!(row.sum(), 1.0, epsilon = 1e-6);
        }
        assert_relative_eq!(y.value()[[1, 0]], 1.0 / 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_softmax_grad_of_sum_is_zero() {
        let tape = Tape::record();
        let x = Parameter::new("x", array![[0.5, -1.0, 2.0]]);
        let y = tape.softmax(&tape.param(&x));
        let loss = tape.sum(&y);
        let grads = tape.gradient(&loss, &[x.clone()]).unwrap();
        for g in grads.get(&x).unwrap() {
            assert_relative_eq!(*g, 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_log_clamped_stops_grad_when_clamped() {
        let tape = Tape::record();
        let x = Parameter::new("x", array![[0.0, 0.5]]);
        let y = tape.log_clamped(&tape.param(&x), 1e-7);
        assert!(y.value()[[0, 0]].is_finite());
        let loss = tape.sum(&y);
        let grads = tape.gradient(&loss, &[x.clone()]).unwrap();
        let g = grads.get(&x).unwrap();
        assert_eq!(g[[0, 0]], 0.0);
        assert_relative_eq!(g[[0, 1]], 2.0);
    }
}
