//! Backward operation trait

use ndarray::Array2;

/// Index of a node on a [`Tape`](super::Tape)
pub(crate) type NodeId = usize;

/// Gradient rule of one recorded operation.
///
/// Given the gradient flowing into the op's output, returns the gradient
/// contribution for each tracked input node. Untracked inputs are omitted.
pub(crate) trait BackwardOp {
    fn backward(&self, grad: &Array2<f32>) -> Vec<(NodeId, Array2<f32>)>;

    /// Op name, used in debug output
    fn name(&self) -> &'static str;
}

/// Collect `(node, grad)` pairs for the inputs that are tracked
pub(crate) fn contributions<const N: usize>(
    pairs: [(Option<NodeId>, Option<Array2<f32>>); N],
) -> Vec<(NodeId, Array2<f32>)> {
    pairs
        .into_iter()
        .filter_map(|(node, grad)| Some((node?, grad?)))
        .collect()
}
