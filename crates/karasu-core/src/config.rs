//! Run-wide configuration, read-only for the trainer's lifetime.

use std::path::{Path, PathBuf};

use candle_core::Device;
use serde::{Deserialize, Serialize};

use crate::error::{KarasuError, Result};

/// Settings for a single training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Compute device: `"cpu"`, `"cuda"` (first GPU if available) or `"cuda:N"`.
    pub device: String,
    /// Upper bound on training epochs.
    pub epochs: usize,
    /// Number of output classes.
    pub n_class: usize,
    /// Hidden dimension of the GCN.
    pub hidden_dim: usize,
    /// AdamW learning rate.
    pub lr: f64,
    /// Dropout probability applied between GCN layers during training.
    pub dropout: f32,
    /// Early-stopping patience in epochs. Zero disables early stopping.
    pub patience: usize,
    /// Where the best-model checkpoint is written.
    pub checkpoint_path: PathBuf,
    /// Where the final result record is written.
    pub results_path: PathBuf,
    /// Node-classification dataset to train on.
    pub dataset_path: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            device: "cpu".into(),
            epochs: 200,
            n_class: 2,
            hidden_dim: 16,
            lr: 1e-2,
            dropout: 0.5,
            patience: 30,
            checkpoint_path: "checkpoints/best.safetensors".into(),
            results_path: "results/run.json".into(),
            dataset_path: "data/dataset.json".into(),
        }
    }
}

impl RunConfig {
    /// Load a configuration from a JSON file. Missing fields fall back to
    /// their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| KarasuError::Config(format!("{}: {e}", path.as_ref().display())))?;
        serde_json::from_str(&content)
            .map_err(|e| KarasuError::Config(format!("{}: {e}", path.as_ref().display())))
    }

    /// Resolve the configured device string to a candle device.
    pub fn device(&self) -> Result<Device> {
        match self.device.as_str() {
            "cpu" => Ok(Device::Cpu),
            "cuda" => Ok(Device::cuda_if_available(0)?),
            other => match other.strip_prefix("cuda:").and_then(|n| n.parse::<usize>().ok()) {
                Some(ordinal) => Ok(Device::new_cuda(ordinal)?),
                None => Err(KarasuError::UnknownDevice(other.to_string())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cf = RunConfig::default();
        assert_eq!(cf.device, "cpu");
        assert!(cf.epochs > 0);
        assert!(cf.lr > 0.0);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cf: RunConfig = serde_json::from_str(r#"{"epochs": 5, "n_class": 7}"#).unwrap();
        assert_eq!(cf.epochs, 5);
        assert_eq!(cf.n_class, 7);
        assert_eq!(cf.device, "cpu");
    }

    #[test]
    fn cpu_device_resolves() {
        let cf = RunConfig::default();
        assert!(cf.device().unwrap().is_cpu());
    }

    #[test]
    fn unknown_device_is_rejected() {
        let cf = RunConfig {
            device: "tpu".into(),
            ..Default::default()
        };
        assert!(matches!(cf.device(), Err(KarasuError::UnknownDevice(_))));
    }
}
