//! Early-stopping policy keyed on validation accuracy.

use std::path::{Path, PathBuf};

use candle_nn::VarMap;
use karasu_core::Result;
use tracing::debug;

/// Halts training once validation accuracy stops improving.
///
/// Each improving epoch checkpoints the parameter store to `path`; the best
/// model can be restored from there after the loop ends.
pub struct EarlyStopping {
    patience: usize,
    counter: usize,
    best_acc: f32,
    best_epoch: usize,
    path: PathBuf,
}

impl EarlyStopping {
    pub fn new<P: Into<PathBuf>>(patience: usize, path: P) -> Self {
        Self {
            patience,
            counter: 0,
            best_acc: f32::NEG_INFINITY,
            best_epoch: 0,
            path: path.into(),
        }
    }

    /// Observe one epoch's validation accuracy. Saves a checkpoint on
    /// improvement; returns `true` once `patience` epochs pass without one.
    pub fn step(&mut self, val_acc: f32, vars: &VarMap, epoch: usize) -> Result<bool> {
        if val_acc > self.best_acc {
            self.best_acc = val_acc;
            self.best_epoch = epoch;
            self.counter = 0;
            if let Some(dir) = self.path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            vars.save(&self.path)?;
            debug!(epoch, val_acc, "checkpointed new best model");
        } else {
            self.counter += 1;
        }
        Ok(self.counter >= self.patience)
    }

    /// Epoch of the best validation accuracy seen so far.
    pub fn best_epoch(&self) -> usize {
        self.best_epoch
    }

    pub fn best_acc(&self) -> f32 {
        self.best_acc
    }

    /// Location of the best-model checkpoint.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};
    use candle_nn::VarBuilder;

    fn varmap_with_one_var() -> VarMap {
        let varmap = VarMap::new();
        let vs = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        vs.get_with_hints((2, 2), "w", candle_nn::init::ZERO).unwrap();
        varmap
    }

    fn temp_checkpoint(tag: &str) -> PathBuf {
        let nonce = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "karasu_es_{tag}_{}_{nonce}.safetensors",
            std::process::id()
        ))
    }

    #[test]
    fn improvement_resets_counter_and_saves() {
        let path = temp_checkpoint("improve");
        let vars = varmap_with_one_var();
        let mut stopper = EarlyStopping::new(2, &path);

        assert!(!stopper.step(0.5, &vars, 0).unwrap());
        assert!(!stopper.step(0.4, &vars, 1).unwrap());
        assert!(!stopper.step(0.6, &vars, 2).unwrap());
        assert_eq!(stopper.best_epoch(), 2);
        assert!(path.exists());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn stops_after_patience_exhausted() {
        let path = temp_checkpoint("stop");
        let vars = varmap_with_one_var();
        let mut stopper = EarlyStopping::new(2, &path);

        assert!(!stopper.step(0.9, &vars, 0).unwrap());
        assert!(!stopper.step(0.8, &vars, 1).unwrap());
        assert!(stopper.step(0.8, &vars, 2).unwrap());
        assert_eq!(stopper.best_epoch(), 0);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn equal_accuracy_is_not_an_improvement() {
        let path = temp_checkpoint("equal");
        let vars = varmap_with_one_var();
        let mut stopper = EarlyStopping::new(1, &path);

        assert!(!stopper.step(0.7, &vars, 0).unwrap());
        assert!(stopper.step(0.7, &vars, 1).unwrap());
        std::fs::remove_file(&path).ok();
    }
}
