//! Dataset loading and graph construction for node classification.

use std::path::Path;

use candle_core::{Device, Tensor};
use karasu_core::{KarasuError, Result, SupervisionSplit};
use serde::Deserialize;

/// On-disk dataset format. Labels are `null` for unlabeled nodes.
#[derive(Debug, Deserialize)]
struct RawDataset {
    num_nodes: usize,
    edges: Vec<(u32, u32)>,
    features: Vec<Vec<f32>>,
    labels: Vec<Option<u32>>,
    train_idx: Vec<u32>,
    val_idx: Vec<u32>,
    test_idx: Vec<u32>,
}

/// An undirected graph held as a dense symmetrically-normalized adjacency
/// with self-loops: `D^-1/2 (A + I) D^-1/2`.
#[derive(Debug, Clone)]
pub struct Graph {
    adj: Tensor,
    num_nodes: usize,
}

impl Graph {
    /// Build the normalized adjacency from an undirected edge list.
    pub fn from_edges(num_nodes: usize, edges: &[(u32, u32)], device: &Device) -> Result<Self> {
        if num_nodes == 0 {
            return Err(KarasuError::Dataset("graph has no nodes".into()));
        }
        let n = num_nodes;
        let mut adj = vec![0f32; n * n];
        for i in 0..n {
            adj[i * n + i] = 1.0;
        }
        for &(u, v) in edges {
            if u as usize >= n || v as usize >= n {
                return Err(KarasuError::Dataset(format!(
                    "edge ({u}, {v}) out of bounds for {n} nodes"
                )));
            }
            adj[u as usize * n + v as usize] = 1.0;
            adj[v as usize * n + u as usize] = 1.0;
        }

        let deg: Vec<f32> = (0..n).map(|i| adj[i * n..(i + 1) * n].iter().sum()).collect();
        for i in 0..n {
            for j in 0..n {
                if adj[i * n + j] > 0.0 {
                    adj[i * n + j] /= (deg[i] * deg[j]).sqrt();
                }
            }
        }

        Ok(Self {
            adj: Tensor::from_vec(adj, (n, n), device)?,
            num_nodes,
        })
    }

    /// Relocate the adjacency to another device.
    pub fn to_device(&self, device: &Device) -> Result<Self> {
        Ok(Self {
            adj: self.adj.to_device(device)?,
            num_nodes: self.num_nodes,
        })
    }

    /// One round of message passing: multiply node states by the normalized
    /// adjacency.
    pub fn propagate(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        self.adj.matmul(xs)
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }
}

/// Load a node-classification dataset from a JSON file.
///
/// Returns the graph, the `(num_nodes, feat_dim)` feature tensor and the
/// validated supervision split, all on `device`.
pub fn load_dataset<P: AsRef<Path>>(
    path: P,
    device: &Device,
) -> Result<(Graph, Tensor, SupervisionSplit)> {
    let content = std::fs::read_to_string(path.as_ref())
        .map_err(|e| KarasuError::Dataset(format!("{}: {e}", path.as_ref().display())))?;
    let raw: RawDataset = serde_json::from_str(&content)
        .map_err(|e| KarasuError::Dataset(format!("{}: {e}", path.as_ref().display())))?;

    if raw.features.len() != raw.num_nodes {
        return Err(KarasuError::Dataset(format!(
            "{} feature rows for {} nodes",
            raw.features.len(),
            raw.num_nodes
        )));
    }
    if raw.labels.len() != raw.num_nodes {
        return Err(KarasuError::Dataset(format!(
            "{} labels for {} nodes",
            raw.labels.len(),
            raw.num_nodes
        )));
    }
    let feat_dim = raw.features.first().map(Vec::len).unwrap_or(0);
    if feat_dim == 0 || raw.features.iter().any(|row| row.len() != feat_dim) {
        return Err(KarasuError::Dataset("ragged or empty feature rows".into()));
    }

    let graph = Graph::from_edges(raw.num_nodes, &raw.edges, device)?;

    let flat: Vec<f32> = raw.features.into_iter().flatten().collect();
    let features = Tensor::from_vec(flat, (raw.num_nodes, feat_dim), device)?;

    let labels: Vec<f32> = raw
        .labels
        .iter()
        .map(|l| l.map(|c| c as f32).unwrap_or(f32::NAN))
        .collect();
    let sup = SupervisionSplit::new(raw.train_idx, raw.val_idx, raw.test_idx, labels)?;

    Ok((graph, features, sup))
}
