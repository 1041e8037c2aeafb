//! Gradient tape: the explicit recording scope of a training step
//!
//! A [`Tape`] is created at the start of a step and consumed by
//! [`Tape::gradient`]. Values computed through a recording tape remember how
//! they were produced; values computed through [`Tape::inference`] do not.
//! Dropping a tape without calling `gradient` discards the recording and
//! leaves every parameter untouched.

use super::backward::{BackwardOp, NodeId};
use super::{Gradients, ParamId, Parameter};
use crate::{Error, Result};
use ndarray::Array2;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_TAPE_ID: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeRef {
    tape: usize,
    index: NodeId,
}

/// A value produced on a tape.
///
/// Cheap to clone: the array is reference counted.
#[derive(Clone)]
pub struct Var {
    value: Rc<Array2<f32>>,
    node: Option<NodeRef>,
}

impl Var {
    pub fn value(&self) -> &Array2<f32> {
        &self.value
    }

    pub fn shape(&self) -> (usize, usize) {
        self.value.dim()
    }

    /// First element; meaningful for `(1, 1)` values such as losses
    pub fn scalar(&self) -> f32 {
        self.value.iter().next().copied().unwrap_or(f32::NAN)
    }

    /// Whether gradients can flow back through this value
    pub fn is_tracked(&self) -> bool {
        self.node.is_some()
    }

    /// Take the array out, cloning only if it is still shared
    pub fn into_array(self) -> Array2<f32> {
        Rc::try_unwrap(self.value).unwrap_or_else(|shared| (*shared).clone())
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Var")
            .field("shape", &self.shape())
            .field("tracked", &self.is_tracked())
            .finish()
    }
}

struct Node {
    op: Option<Box<dyn BackwardOp>>,
    param: Option<Parameter>,
}

/// Recording scope for reverse-mode differentiation.
pub struct Tape {
    id: usize,
    recording: bool,
    nodes: RefCell<Vec<Node>>,
}

impl Tape {
    /// Start recording operations
    pub fn record() -> Self {
        Self::with_recording(true)
    }

    /// A tape that computes values but records nothing
    pub fn inference() -> Self {
        Self::with_recording(false)
    }

    fn with_recording(recording: bool) -> Self {
        Self {
            id: NEXT_TAPE_ID.fetch_add(1, Ordering::Relaxed),
            recording,
            nodes: RefCell::new(Vec::new()),
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Number of recorded nodes
    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wrap data that never receives a gradient (inputs, targets, masks)
    pub fn constant(&self, value: Array2<f32>) -> Var {
        Var {
            value: Rc::new(value),
            node: None,
        }
    }

    /// Read a parameter onto the tape
    pub fn param(&self, param: &Parameter) -> Var {
        let value = param.to_array();
        if !self.recording {
            return self.constant(value);
        }
        let index = self.push(Node {
            op: None,
            param: Some(param.clone()),
        });
        Var {
            value: Rc::new(value),
            node: Some(NodeRef {
                tape: self.id,
                index,
            }),
        }
    }

    /// Node index of `var` if it was recorded on this tape
    pub(crate) fn node_of(&self, var: &Var) -> Option<NodeId> {
        var.node
            .filter(|node| node.tape == self.id)
            .map(|node| node.index)
    }

    /// Whether an op over these parents must be recorded
    pub(crate) fn tracks(&self, parents: &[Option<NodeId>]) -> bool {
        self.recording && parents.iter().any(Option::is_some)
    }

    /// Produce an op result, recording `op` when one is given
    pub(crate) fn emit(&self, value: Array2<f32>, op: Option<Box<dyn BackwardOp>>) -> Var {
        let node = op.map(|op| NodeRef {
            tape: self.id,
            index: self.push(Node {
                op: Some(op),
                param: None,
            }),
        });
        Var {
            value: Rc::new(value),
            node,
        }
    }

    fn push(&self, node: Node) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(node);
        nodes.len() - 1
    }

    /// Differentiate `loss` with respect to `params`, consuming the tape.
    ///
    /// `loss` must be a `(1, 1)` value. Parameters the loss does not depend on
    /// receive a zero gradient. Repeated handles to one parameter are merged.
    pub fn gradient(self, loss: &Var, params: &[Parameter]) -> Result<Gradients> {
        if loss.shape() != (1, 1) {
            let (r, c) = loss.shape();
            return Err(Error::shape("gradient", &[1, 1], &[r, c]));
        }

        let root = self.node_of(loss);
        let nodes = self.nodes.into_inner();
        let mut param_grads: HashMap<ParamId, Array2<f32>> = HashMap::new();

        if let Some(root) = root {
            let mut grads: Vec<Option<Array2<f32>>> = (0..=root).map(|_| None).collect();
            grads[root] = Some(Array2::ones((1, 1)));

            for index in (0..=root).rev() {
                let Some(grad) = grads[index].take() else {
                    continue;
                };
                let node = &nodes[index];
                if let Some(param) = &node.param {
                    match param_grads.get_mut(&param.id()) {
                        Some(existing) => *existing += &grad,
                        None => {
                            param_grads.insert(param.id(), grad);
                        }
                    }
                    continue;
                }
                if let Some(op) = &node.op {
                    for (parent, contribution) in op.backward(&grad) {
                        match grads[parent].as_mut() {
                            Some(existing) => *existing += &contribution,
                            None => grads[parent] = Some(contribution),
                        }
                    }
                }
            }
        }

        let mut seen = Vec::with_capacity(params.len());
        let mut entries = Vec::with_capacity(params.len());
        for param in params {
            if seen.contains(&param.id()) {
                continue;
            }
            seen.push(param.id());
            let (rows, cols) = param.shape();
            let grad = param_grads
                .remove(&param.id())
                .unwrap_or_else(|| Array2::zeros((rows, cols)));
            entries.push((param.clone(), grad));
        }
        Ok(Gradients::new(entries))
    }
}

impl fmt::Debug for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tape")
            .field("recording", &self.recording)
            .field("nodes", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_inference_tape_records_nothing() {
        let tape = Tape::inference();
        let w = Parameter::new("w", array![[2.0]]);
        let v = tape.param(&w);
        assert!(!v.is_tracked());
        assert!(tape.is_empty());
    }

    #[test]
    fn test_record_tape_tracks_params() {
        let tape = Tape::record();
        let w = Parameter::new("w", array![[2.0]]);
        let v = tape.param(&w);
        assert!(v.is_tracked());
        assert_eq!(tape.len(), 1);
    }

    #[test]
    fn test_constant_is_untracked() {
        let tape = Tape::record();
        let c = tape.constant(array![[1.0, 2.0]]);
        assert!(!c.is_tracked());
        assert_eq!(c.shape(), (1, 2));
    }

    #[test]
    fn test_gradient_of_untracked_loss_is_zero() {
        let tape = Tape::record();
        let w = Parameter::new("w", array![[1.0, 2.0]]);
        let loss = tape.constant(array![[3.0]]);
        let grads = tape.gradient(&loss, &[w.clone()]).unwrap();
        assert_eq!(grads.len(), 1);
        assert_eq!(grads.get(&w).unwrap(), &array![[0.0, 0.0]]);
    }

    #[test]
    fn test_gradient_rejects_non_scalar_loss() {
        let tape = Tape::record();
        let loss = tape.constant(array![[1.0, 2.0]]);
        assert!(matches!(
            tape.gradient(&loss, &[]),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_gradient_merges_duplicate_handles() {
        let tape = Tape::record();
        let w = Parameter::new("w", array![[3.0]]);
        let a = tape.param(&w);
        let b = tape.param(&w);
        let y = tape.mul(&a, &b).unwrap();
        let grads = tape.gradient(&y, &[w.clone(), w.clone()]).unwrap();
        assert_eq!(grads.len(), 1);
        // d(w*w)/dw = 2w
        assert_eq!(grads.get(&w).unwrap()[[0, 0]], 6.0);
    }

    #[test]
    fn test_var_from_other_tape_is_constant() {
        let first = Tape::record();
        let w = Parameter::new("w", array![[1.0]]);
        let foreign = first.param(&w);

        let second = Tape::record();
        let local = second.param(&w);
        let y = second.mul(&foreign, &local).unwrap();
        let grads = second.gradient(&y, &[w.clone()]).unwrap();
        // only the local read contributes
        assert_eq!(grads.get(&w).unwrap()[[0, 0]], 1.0);
    }

    #[test]
    fn test_into_array_returns_value() {
        let tape = Tape::inference();
        let v = tape.constant(array![[4.0, 5.0]]);
        assert_eq!(v.into_array(), array![[4.0, 5.0]]);
    }
}
