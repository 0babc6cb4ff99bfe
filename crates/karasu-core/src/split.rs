//! Supervision split: which nodes are train/validation/test, plus labels.

use std::collections::HashSet;

use candle_core::{Device, Tensor};

use crate::error::{KarasuError, Result};

/// Host-side supervision split for a node-classification task.
///
/// The three index sequences are pairwise disjoint and together may cover all
/// or a subset of nodes. Labels are a per-node vector where `NaN` marks an
/// unlabeled node; every training node must be labeled.
#[derive(Debug, Clone)]
pub struct SupervisionSplit {
    pub train_idx: Vec<u32>,
    pub val_idx: Vec<u32>,
    pub test_idx: Vec<u32>,
    pub labels: Vec<f32>,
}

impl SupervisionSplit {
    /// Validate and build a supervision split.
    pub fn new(
        train_idx: Vec<u32>,
        val_idx: Vec<u32>,
        test_idx: Vec<u32>,
        labels: Vec<f32>,
    ) -> Result<Self> {
        let num_nodes = labels.len();
        let splits: [(&'static str, &[u32]); 3] =
            [("train", &train_idx), ("val", &val_idx), ("test", &test_idx)];

        let mut seen = HashSet::new();
        for (name, idx) in splits {
            if idx.is_empty() {
                return Err(KarasuError::EmptySplit { split: name });
            }
            for &i in idx {
                if i as usize >= num_nodes {
                    return Err(KarasuError::IndexOutOfBounds {
                        split: name,
                        index: i,
                        num_nodes,
                    });
                }
                if !seen.insert(i) {
                    return Err(KarasuError::OverlappingSplits { node: i });
                }
            }
        }

        for &i in &train_idx {
            if labels[i as usize].is_nan() {
                return Err(KarasuError::UnlabeledTrainNode { node: i });
            }
        }

        Ok(Self {
            train_idx,
            val_idx,
            test_idx,
            labels,
        })
    }

    pub fn num_nodes(&self) -> usize {
        self.labels.len()
    }

    /// Materialize index sets and label slices as tensors on `device`.
    pub fn to_device(&self, device: &Device) -> Result<SplitTensors> {
        let index = |idx: &[u32]| Tensor::from_vec(idx.to_vec(), idx.len(), device);
        let train_y: Vec<u32> = self
            .train_idx
            .iter()
            .map(|&i| self.labels[i as usize] as u32)
            .collect();

        Ok(SplitTensors {
            train_x: index(&self.train_idx)?,
            val_x: index(&self.val_idx)?,
            test_x: index(&self.test_idx)?,
            train_y: Tensor::from_vec(train_y, self.train_idx.len(), device)?,
            labels: Tensor::from_vec(self.labels.clone(), self.labels.len(), device)?,
        })
    }
}

/// Device-resident view of a [`SupervisionSplit`].
#[derive(Debug, Clone)]
pub struct SplitTensors {
    /// Training node indices, `u32`.
    pub train_x: Tensor,
    /// Validation node indices, `u32`.
    pub val_x: Tensor,
    /// Test node indices, `u32`.
    pub test_x: Tensor,
    /// Class labels of the training nodes, `u32`, aligned with `train_x`.
    pub train_y: Tensor,
    /// Full per-node label vector, `f32`, `NaN` for unlabeled nodes.
    pub labels: Tensor,
}
