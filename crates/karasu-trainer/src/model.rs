//! GCN model over the dense normalized adjacency.

use candle_core::Tensor;
use candle_nn::{Linear, Module, VarBuilder, linear, ops};

use crate::data::Graph;

/// A model producing `(num_nodes, n_class)` logits from a graph and a node
/// feature tensor.
pub trait GraphModel {
    /// Forward pass. `train` enables training-time behavior such as dropout.
    fn forward_t(&self, graph: &Graph, features: &Tensor, train: bool)
    -> candle_core::Result<Tensor>;
}

/// Two-layer graph convolutional network.
///
/// Each layer propagates node states over the normalized adjacency before the
/// linear transform; relu and dropout sit between the layers.
pub struct Gcn {
    lin1: Linear,
    lin2: Linear,
    dropout: f32,
}

impl Gcn {
    pub fn new(
        vs: VarBuilder,
        in_dim: usize,
        hidden_dim: usize,
        n_class: usize,
        dropout: f32,
    ) -> candle_core::Result<Self> {
        Ok(Self {
            lin1: linear(in_dim, hidden_dim, vs.pp("gcn1"))?,
            lin2: linear(hidden_dim, n_class, vs.pp("gcn2"))?,
            dropout,
        })
    }
}

impl GraphModel for Gcn {
    fn forward_t(
        &self,
        graph: &Graph,
        features: &Tensor,
        train: bool,
    ) -> candle_core::Result<Tensor> {
        let mut xs = self.lin1.forward(&graph.propagate(features)?)?;
        xs = xs.relu()?;
        if train && self.dropout > 0.0 {
            xs = ops::dropout(&xs, self.dropout)?;
        }
        self.lin2.forward(&graph.propagate(&xs)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};
    use candle_nn::{VarBuilder, VarMap};

    #[test]
    fn forward_shape_is_nodes_by_classes() {
        let device = Device::Cpu;
        let varmap = VarMap::new();
        let vs = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let model = Gcn::new(vs, 3, 8, 4, 0.5).unwrap();

        let graph = Graph::from_edges(5, &[(0, 1), (1, 2), (3, 4)], &device).unwrap();
        let features = Tensor::ones((5, 3), DType::F32, &device).unwrap();

        let logits = model.forward_t(&graph, &features, false).unwrap();
        assert_eq!(logits.dims2().unwrap(), (5, 4));
    }
}
