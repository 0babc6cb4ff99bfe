use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during Karasu training operations.
#[derive(Debug, Error)]
pub enum KarasuError {
    /// A supervision split has no node indices.
    #[error("supervision split {split:?} is empty")]
    EmptySplit {
        /// Which split was empty ("train", "val" or "test").
        split: &'static str,
    },

    /// A split references a node index outside the graph.
    #[error("split {split:?} index {index} out of bounds for {num_nodes} nodes")]
    IndexOutOfBounds {
        split: &'static str,
        index: u32,
        num_nodes: usize,
    },

    /// The same node appears in more than one supervision split.
    #[error("node {node} appears in more than one supervision split")]
    OverlappingSplits { node: u32 },

    /// A training node carries the unlabeled sentinel.
    #[error("training node {node} has no label")]
    UnlabeledTrainNode { node: u32 },

    /// Label and prediction matrices have different shapes.
    #[error("label/prediction shape mismatch: {truth:?} vs {pred:?}")]
    ShapeMismatch {
        truth: (usize, usize),
        pred: (usize, usize),
    },

    /// The label matrix has no entries at all.
    #[error("label matrix has no entries")]
    EmptyMatrix,

    /// A column of the label matrix contains only unlabeled rows, so its
    /// accuracy is undefined.
    #[error("column {col} has no labeled rows")]
    NoLabeledRows { col: usize },

    /// The configured device string could not be resolved.
    #[error("unknown device {0:?}")]
    UnknownDevice(String),

    /// The best-model checkpoint is missing at restore time.
    #[error("checkpoint not found at {path:?}")]
    MissingCheckpoint { path: PathBuf },

    /// The run configuration could not be loaded.
    #[error("config error: {0}")]
    Config(String),

    /// The dataset file could not be loaded or is malformed.
    #[error("dataset error: {0}")]
    Dataset(String),

    /// Filesystem error while persisting checkpoints or results.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error while persisting results.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Candle ML framework error.
    #[error("tensor error: {0}")]
    Candle(#[from] candle_core::Error),
}

/// Result type alias for Karasu operations.
pub type Result<T> = std::result::Result<T, KarasuError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = KarasuError::EmptySplit { split: "val" };
        assert_eq!(err.to_string(), "supervision split \"val\" is empty");

        let err = KarasuError::NoLabeledRows { col: 2 };
        assert!(err.to_string().contains("column 2"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<KarasuError>();
    }
}
