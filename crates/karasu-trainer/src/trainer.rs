//! Training loop for graph node classification.
//!
//! [`NodeClassifier`] owns the per-epoch control flow (timing, logging,
//! early stopping, best-model restore) and leaves the actual forward/backward
//! computation to its implementors. [`FullBatchTrainer`] is the one variant:
//! a single full-graph pass per epoch, no minibatching.

use std::time::Instant;

use candle_core::Tensor;
use candle_nn::{AdamW, Optimizer, ParamsAdamW, VarMap, loss};
use karasu_core::{
    KarasuError, Result, RunConfig, SplitTensors, SupervisionSplit, logits_accuracy,
};
use tracing::info;

use crate::data::Graph;
use crate::early_stopping::EarlyStopping;
use crate::model::GraphModel;
use crate::results::{ResultRecord, save_results};

/// Loss over `(train_rows, n_class)` predictions and `u32` class labels.
pub type LossFn = fn(&Tensor, &Tensor) -> candle_core::Result<Tensor>;

/// Accuracy over `(rows, n_class)` logits and an `f32` label vector.
pub type Evaluator = fn(&Tensor, &Tensor) -> Result<f32>;

/// A trainer for node classification.
///
/// Implementors supply one training step and one inference-only evaluation;
/// the provided [`run`](NodeClassifier::run) and
/// [`eval_and_save`](NodeClassifier::eval_and_save) drive the epochs.
pub trait NodeClassifier {
    /// Exactly one training step: forward pass, loss, backward pass,
    /// optimizer update. Returns `(loss, train_accuracy)`.
    fn train_step(&mut self) -> Result<(f32, f32)>;

    /// Inference-only forward pass(es). Returns
    /// `(val_accuracy, test_accuracy)`. Must not update model parameters or
    /// accumulate gradient state.
    fn evaluate(&self) -> Result<(f32, f32)>;

    fn config(&self) -> &RunConfig;

    /// Feed the epoch's validation accuracy to the early-stopping policy.
    /// `None` when no policy is configured, otherwise whether to halt.
    fn stopper_step(&mut self, val_acc: f32, epoch: usize) -> Result<Option<bool>>;

    /// Reload the best checkpoint saved by the early-stopping policy,
    /// overwriting in-memory parameters. No-op without a policy; an error if
    /// the checkpoint file is missing.
    fn restore_best(&mut self) -> Result<()>;

    /// Epoch of the best validation accuracy, when a policy exists.
    fn best_epoch(&self) -> Option<usize>;

    /// Run the training loop, then restore the best-observed model state.
    fn run(&mut self) -> Result<()> {
        for epoch in 0..self.config().epochs {
            let t0 = Instant::now();
            let (loss, train_acc) = self.train_step()?;
            let (val_acc, test_acc) = self.evaluate()?;
            info!(
                epoch,
                time = t0.elapsed().as_secs_f32(),
                loss,
                train_acc,
                val_acc,
                test_acc,
                "epoch complete"
            );
            if let Some(true) = self.stopper_step(val_acc, epoch)? {
                info!(epoch, best_epoch = ?self.best_epoch(), "early stopping triggered");
                break;
            }
        }
        self.restore_best()
    }

    /// Evaluate once and persist the result record.
    fn eval_and_save(&self) -> Result<()> {
        let (val_acc, test_acc) = self.evaluate()?;
        let record = ResultRecord {
            val_acc: format!("{val_acc:.4}"),
            test_acc: format!("{test_acc:.4}"),
            best_epoch: self.best_epoch(),
        };
        save_results(self.config(), &record)
    }
}

/// One full forward/backward pass over the entire graph per epoch.
///
/// Construction moves the graph, features and supervision split to the
/// configured compute device.
pub struct FullBatchTrainer<M: GraphModel> {
    model: M,
    graph: Graph,
    features: Tensor,
    vars: VarMap,
    optimizer: AdamW,
    stopper: Option<EarlyStopping>,
    loss_fn: LossFn,
    evaluator: Evaluator,
    split: SplitTensors,
    cf: RunConfig,
}

impl<M: GraphModel> FullBatchTrainer<M> {
    pub fn new(
        model: M,
        graph: Graph,
        features: Tensor,
        vars: VarMap,
        stopper: Option<EarlyStopping>,
        sup: &SupervisionSplit,
        cf: RunConfig,
    ) -> Result<Self> {
        let device = cf.device()?;
        let optimizer = AdamW::new(
            vars.all_vars(),
            ParamsAdamW {
                lr: cf.lr,
                ..Default::default()
            },
        )?;
        Ok(Self {
            model,
            graph: graph.to_device(&device)?,
            features: features.to_device(&device)?,
            vars,
            optimizer,
            stopper,
            loss_fn: loss::cross_entropy,
            evaluator: logits_accuracy,
            split: sup.to_device(&device)?,
            cf,
        })
    }

    /// Replace the default cross-entropy loss.
    pub fn with_loss(mut self, loss_fn: LossFn) -> Self {
        self.loss_fn = loss_fn;
        self
    }

    /// Replace the default argmax-accuracy evaluator.
    pub fn with_evaluator(mut self, evaluator: Evaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn stopper(&self) -> Option<&EarlyStopping> {
        self.stopper.as_ref()
    }

    fn split_labels(&self, index: &Tensor) -> Result<Tensor> {
        Ok(self.split.labels.index_select(index, 0)?)
    }
}

impl<M: GraphModel> NodeClassifier for FullBatchTrainer<M> {
    fn train_step(&mut self) -> Result<(f32, f32)> {
        let logits = self.model.forward_t(&self.graph, &self.features, true)?;
        let train_logits = logits.index_select(&self.split.train_x, 0)?;
        let loss = (self.loss_fn)(&train_logits, &self.split.train_y)?;
        let train_acc = (self.evaluator)(
            &train_logits,
            &self.split_labels(&self.split.train_x)?,
        )?;
        self.optimizer.backward_step(&loss)?;
        Ok((loss.to_scalar::<f32>()?, train_acc))
    }

    fn evaluate(&self) -> Result<(f32, f32)> {
        // Detach so the eval pass carries no gradient graph.
        let logits = self
            .model
            .forward_t(&self.graph, &self.features, false)?
            .detach();
        let val_acc = (self.evaluator)(
            &logits.index_select(&self.split.val_x, 0)?,
            &self.split_labels(&self.split.val_x)?,
        )?;
        let test_acc = (self.evaluator)(
            &logits.index_select(&self.split.test_x, 0)?,
            &self.split_labels(&self.split.test_x)?,
        )?;
        Ok((val_acc, test_acc))
    }

    fn config(&self) -> &RunConfig {
        &self.cf
    }

    fn stopper_step(&mut self, val_acc: f32, epoch: usize) -> Result<Option<bool>> {
        match self.stopper.as_mut() {
            Some(stopper) => Ok(Some(stopper.step(val_acc, &self.vars, epoch)?)),
            None => Ok(None),
        }
    }

    fn restore_best(&mut self) -> Result<()> {
        let Some(stopper) = &self.stopper else {
            return Ok(());
        };
        let path = stopper.path().to_path_buf();
        if !path.exists() {
            return Err(KarasuError::MissingCheckpoint { path });
        }
        self.vars.load(&path)?;
        Ok(())
    }

    fn best_epoch(&self) -> Option<usize> {
        self.stopper.as_ref().map(EarlyStopping::best_epoch)
    }
}
