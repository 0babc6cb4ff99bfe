//! # Karasu Trainer
//!
//! Full-batch training loop for graph node classification: dataset loading,
//! a two-layer GCN, the per-epoch trainer with early stopping, and result
//! persistence. Tensor computation and autodiff come from candle.

use candle_core::{DType, Device};
use candle_nn::{VarBuilder, VarMap};
use karasu_core::{Result, RunConfig};
use tracing::info;

pub mod data;
pub mod early_stopping;
pub mod model;
pub mod results;
pub mod trainer;

// Re-export primary API
pub use data::{Graph, load_dataset};
pub use early_stopping::EarlyStopping;
pub use model::{Gcn, GraphModel};
pub use results::{ResultRecord, save_results};
pub use trainer::{Evaluator, FullBatchTrainer, LossFn, NodeClassifier};

/// Train a GCN on the configured dataset, then evaluate and persist results.
pub fn run_training(cf: RunConfig) -> Result<()> {
    let device = cf.device()?;

    // Load on host; the trainer relocates everything to the compute device.
    let (graph, features, sup) = load_dataset(&cf.dataset_path, &Device::Cpu)?;
    let in_dim = features.dim(1)?;
    info!(
        nodes = graph.num_nodes(),
        features = in_dim,
        classes = cf.n_class,
        "dataset loaded"
    );

    let vars = VarMap::new();
    let vs = VarBuilder::from_varmap(&vars, DType::F32, &device);
    let model = Gcn::new(vs, in_dim, cf.hidden_dim, cf.n_class, cf.dropout)?;
    let stopper =
        (cf.patience > 0).then(|| EarlyStopping::new(cf.patience, cf.checkpoint_path.clone()));

    let mut trainer = FullBatchTrainer::new(model, graph, features, vars, stopper, &sup, cf)?;
    trainer.run()?;
    trainer.eval_and_save()
}
