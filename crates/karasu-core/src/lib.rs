//! # Karasu Core
//!
//! Leaf types for the Karasu node-classification trainer: run configuration,
//! supervision splits, accuracy metrics, and the shared error type.
//!
//! ## Quick Start
//!
//! ```rust
//! use candle_core::{Device, Tensor};
//! use karasu_core::metrics::accuracy;
//!
//! let truth = Tensor::from_vec(vec![1f32, 0., 1., 1.], (4, 1), &Device::Cpu).unwrap();
//! let pred = Tensor::from_vec(vec![1f32, 0., 0., 1.], (4, 1), &Device::Cpu).unwrap();
//!
//! assert_eq!(accuracy(&truth, &pred).unwrap(), 0.75);
//! ```
pub mod config;
pub mod error;
pub mod metrics;
pub mod split;

// Re-export primary API
pub use config::RunConfig;
pub use error::{KarasuError, Result};
pub use metrics::{accuracy, logits_accuracy};
pub use split::{SplitTensors, SupervisionSplit};
