//! Indexing and layout ops: per-row gather, column concatenation

use crate::autograd::backward::{BackwardOp, NodeId};
use crate::autograd::{Tape, Var};
use crate::{Error, Result};
use ndarray::{concatenate, s, Array2, Axis};

impl Tape {
    /// Gather `x[i, columns[i]]` for every row into an `(m, 1)` value
    pub fn pick(&self, x: &Var, columns: &[usize]) -> Result<Var> {
        let (rows, cols) = x.shape();
        if columns.len() != rows {
            return Err(Error::shape("pick", &[rows], &[columns.len()]));
        }
        if let Some(&bad) = columns.iter().find(|&&c| c >= cols) {
            return Err(Error::shape("pick", &[cols], &[bad]));
        }

        let nx = self.node_of(x);
        let data = Array2::from_shape_fn((rows, 1), |(r, _)| x.value()[[r, columns[r]]]);
        let op = self.tracks(&[nx]).then(|| {
            Box::new(PickBackward {
                x: nx,
                shape: (rows, cols),
                columns: columns.to_vec(),
            }) as Box<dyn BackwardOp>
        });
        Ok(self.emit(data, op))
    }

    /// Concatenate values with equal row counts along the column axis
    pub fn concat(&self, parts: &[Var]) -> Result<Var> {
        let Some(first) = parts.first() else {
            return Err(Error::Graph("concat of zero inputs".into()));
        };
        let rows = first.shape().0;
        if let Some(bad) = parts.iter().find(|p| p.shape().0 != rows) {
            return Err(Error::shape("concat", &[rows], &[bad.shape().0]));
        }

        let views: Vec<_> = parts.iter().map(|p| p.value().view()).collect();
        let data = concatenate(Axis(1), &views).map_err(|e| Error::Graph(e.to_string()))?;

        let nodes: Vec<Option<NodeId>> = parts.iter().map(|p| self.node_of(p)).collect();
        let op = self.tracks(&nodes).then(|| {
            let widths = parts.iter().map(|p| p.shape().1).collect();
            Box::new(ConcatBackward { parts: nodes, widths }) as Box<dyn BackwardOp>
        });
        Ok(self.emit(data, op))
    }
}

struct PickBackward {
    x: Option<NodeId>,
    shape: (usize, usize),
    columns: Vec<usize>,
}

impl BackwardOp for PickBackward {
    fn backward(&self, grad: &Array2<f32>) -> Vec<(NodeId, Array2<f32>)> {
        let Some(x) = self.x else {
            return Vec::new();
        };
        let mut grad_x = Array2::zeros(self.shape);
        for (row, &col) in self.columns.iter().enumerate() {
            grad_x[[row, col]] = grad[[row, 0]];
        }
        vec![(x, grad_x)]
    }

    fn name(&self) -> &'static str {
        "pick"
    }
}

struct ConcatBackward {
    parts: Vec<Option<NodeId>>,
    widths: Vec<usize>,
}

impl BackwardOp for ConcatBackward {
    fn backward(&self, grad: &Array2<f32>) -> Vec<(NodeId, Array2<f32>)> {
        let mut offset = 0;
        let mut out = Vec::new();
        for (node, &width) in self.parts.iter().zip(&self.widths) {
            if let Some(node) = node {
                out.push((*node, grad.slice(s![.., offset..offset + width]).to_owned()));
            }
            offset += width;
        }
        out
    }

    fn name(&self) -> &'static str {
        "concat"
    }
}

#[cfg(test)]
mod tests {
    use crate::autograd::{Parameter, Tape};
    use ndarray::array;

    #[test]
    fn test_pick_gathers_per_row() {
        let tape = Tape::inference();
        let x = tape.constant(array![[0.1, 0.9], [0.7, 0.3]]);
        let y = tape.pick(&x, &[1, 0]).unwrap();
        assert_eq!(y.value(), &array![[0.9], [0.7]]);
    }

    #[test]
    fn test_pick_rejects_out_of_range() {
        let tape = Tape::inference();
        let x = tape.constant(array![[0.1, 0.9]]);
        assert!(tape.pick(&x, &[2]).is_err());
        assert!(tape.pick(&x, &[0, 1]).is_err());
    }

    #[test]
    fn test_pick_scatters_grad() {
        let tape = Tape::record();
        let x = Parameter::new("x", array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let y = tape.pick(&tape.param(&x), &[2, 0]).unwrap();
        let loss = tape.sum(&y);
        let grads = tape.gradient(&loss, &[x.clone()]).unwrap();
        assert_eq!(
            grads.get(&x).unwrap(),
            &array![[0.0, 0.0, 1.0], [1.0, 0.0, 0.0]]
        );
    }

    #[test]
    fn test_concat_splits_grad() {
        let tape = Tape::record();
        let a = Parameter::new("a", array![[1.0], [2.0]]);
        let b = Parameter::new("b", array![[3.0, 4.0], [5.0, 6.0]]);
        let y = tape.concat(&[tape.param(&a), tape.param(&b)]).unwrap();
        assert_eq!(y.value(), &array![[1.0, 3.0, 4.0], [2.0, 5.0, 6.0]]);

        let weights = tape.constant(array![[1.0, 2.0, 3.0], [1.0, 2.0, 3.0]]);
        let loss = tape.sum(&tape.mul(&y, &weights).unwrap());
        let grads = tape.gradient(&loss, &[a.clone(), b.clone()]).unwrap();
        assert_eq!(grads.get(&a).unwrap(), &array![[1.0], [1.0]]);
        assert_eq!(grads.get(&b).unwrap(), &array![[2.0, 3.0], [2.0, 3.0]]);
    }

    #[test]
    fn test_concat_rejects_row_mismatch() {
        let tape = Tape::inference();
        let a = tape.constant(array![[1.0]]);
        let b = tape.constant(array![[1.0], [2.0]]);
        assert!(tape.concat(&[a, b]).is_err());
        assert!(tape.concat(&[]).is_err());
    }
}
