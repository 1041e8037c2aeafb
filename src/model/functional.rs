//! Graph of layers built from a single input

use super::Model;
use crate::autograd::{Parameter, Tape, Var};
use crate::nn::{Layer, Mode};
use crate::{Error, Result};

/// Handle to a value in a functional graph under construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRef(usize);

impl NodeRef {
    pub fn index(self) -> usize {
        self.0
    }
}

struct GraphNode {
    layer: Box<dyn Layer>,
    inputs: Vec<NodeRef>,
}

/// Incrementally wires layers into a directed acyclic graph
///
/// A node may only consume nodes created before it, so insertion order is a
/// valid evaluation order.
///
/// # Example
///
/// ```
/// use paso::model::{FunctionalBuilder, Model};
/// use paso::nn::{Activation, Concatenate, Dense};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let mut graph = FunctionalBuilder::new("wide_and_deep");
/// let x = graph.input();
/// let deep = graph.apply(Dense::new("deep", 4, 16, Activation::Relu, &mut rng), &[x]).unwrap();
/// let merged = graph.apply(Concatenate::new("merge"), &[x, deep]).unwrap();
/// let out = graph
///     .apply(Dense::new("out", 20, 3, Activation::Softmax, &mut rng), &[merged])
///     .unwrap();
/// let model = graph.build(out).unwrap();
/// assert_eq!(model.name(), "wide_and_deep");
/// ```
pub struct FunctionalBuilder {
    name: String,
    nodes: Vec<GraphNode>,
}

impl FunctionalBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
        }
    }

    /// The model input
    pub fn input(&self) -> NodeRef {
        NodeRef(0)
    }

    /// Add `layer` consuming `inputs`; returns the new node
    pub fn apply<L: Layer + 'static>(&mut self, layer: L, inputs: &[NodeRef]) -> Result<NodeRef> {
        if inputs.is_empty() {
            return Err(Error::Graph(format!(
                "layer '{}' applied to no inputs",
                layer.name()
            )));
        }
        if let Some(bad) = inputs.iter().find(|n| n.0 > self.nodes.len()) {
            return Err(Error::Graph(format!(
                "layer '{}' references unknown node {}",
                layer.name(),
                bad.0
            )));
        }
        self.nodes.push(GraphNode {
            layer: Box::new(layer),
            inputs: inputs.to_vec(),
        });
        Ok(NodeRef(self.nodes.len()))
    }

    /// Finish the graph with `output` as the prediction node
    ///
    /// Layers that do not feed `output` are dropped.
    pub fn build(self, output: NodeRef) -> Result<Functional> {
        if output.0 == 0 {
            return Err(Error::Graph("model output must be a layer node".into()));
        }
        if output.0 > self.nodes.len() {
            return Err(Error::Graph(format!("unknown output node {}", output.0)));
        }

        let mut nodes = self.nodes;
        nodes.truncate(output.0);

        // mark nodes reachable backwards from the output
        let mut live = vec![false; nodes.len()];
        live[output.0 - 1] = true;
        for i in (0..nodes.len()).rev() {
            if !live[i] {
                continue;
            }
            for input in &nodes[i].inputs {
                if input.0 > 0 {
                    live[input.0 - 1] = true;
                }
            }
        }

        let pruned = live.iter().filter(|l| !**l).count();
        if pruned > 0 {
            tracing::debug!(model = %self.name, pruned, "dropping layers not connected to output");
        }

        Ok(Functional {
            name: self.name,
            nodes,
            live,
            output,
        })
    }
}

/// A model whose layers form a graph rather than a chain
pub struct Functional {
    name: String,
    nodes: Vec<GraphNode>,
    live: Vec<bool>,
    output: NodeRef,
}

impl Functional {
    /// Names of the layers evaluated on each forward pass, in order
    pub fn layer_names(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .zip(&self.live)
            .filter(|(_, live)| **live)
            .map(|(n, _)| n.layer.name())
            .collect()
    }
}

impl Model for Functional {
    fn forward(&self, tape: &Tape, input: &Var, mode: Mode) -> Result<Var> {
        let mut values: Vec<Option<Var>> = Vec::with_capacity(self.nodes.len() + 1);
        values.push(Some(input.clone()));

        for (node, live) in self.nodes.iter().zip(&self.live) {
            if !*live {
                values.push(None);
                continue;
            }
            let inputs = node
                .inputs
                .iter()
                .map(|r| {
                    values[r.0].clone().ok_or_else(|| {
                        Error::Graph(format!("node {} was not evaluated", r.0))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            values.push(Some(node.layer.forward(tape, &inputs, mode)?));
        }

        values
            .swap_remove(self.output.0)
            .ok_or_else(|| Error::Graph("output node was not evaluated".into()))
    }

    fn trainable_parameters(&self) -> Vec<Parameter> {
        let mut params: Vec<Parameter> = Vec::new();
        for (node, _) in self.nodes.iter().zip(&self.live).filter(|(_, l)| **l) {
            for p in node.layer.parameters() {
                if !params.iter().any(|q| q.id() == p.id()) {
                    params.push(p);
                }
            }
        }
        params
    }

    fn name(&self) -> &str {
        &self.name
    }
}
