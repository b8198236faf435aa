use std::path::PathBuf;

use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result};
use crate::optim::OptimizerKind;

/// Every knob of the pipeline. `Default` holds the values the binary runs
/// with; there is no file or command-line layer on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    // data
    pub samples: usize,
    pub features: usize,
    pub seed: u64,
    /// Fraction of all rows held out for testing.
    pub test_size: f64,
    /// Fraction of the remaining rows held out for validation.
    pub validation_size: f64,

    // model
    pub l2_reg: f64,
    pub dropout_rate: f64,

    // training
    pub optimizer: OptimizerKind,
    pub learning_rate: f64,
    pub epochs: usize,
    pub batch_size: usize,
    pub early_stopping_patience: usize,
    pub lr_factor: f64,
    pub lr_patience: usize,
    pub min_lr: f64,

    /// Where the best checkpoint is written.
    pub model_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            samples: 1000,
            features: 34,
            seed: 42,
            test_size: 0.2,
            validation_size: 0.25,
            l2_reg: 0.001,
            dropout_rate: 0.3,
            optimizer: OptimizerKind::Adam,
            learning_rate: 0.001,
            epochs: 200,
            batch_size: 64,
            early_stopping_patience: 15,
            lr_factor: 0.5,
            lr_patience: 7,
            min_lr: 1e-6,
            model_path: PathBuf::from("squat_model_advanced_robust.json"),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.samples == 0 || self.features == 0 {
            return Err(NnError::config("samples and features must be at least 1"));
        }
        for (name, ratio) in [("test_size", self.test_size), ("validation_size", self.validation_size)] {
            if !(ratio > 0.0 && ratio < 1.0) {
                return Err(NnError::config(format!("{name} must be in (0, 1), got {ratio}")));
            }
        }
        if !(0.0..1.0).contains(&self.dropout_rate) {
            return Err(NnError::config(format!("dropout_rate must be in [0, 1), got {}", self.dropout_rate)));
        }
        if !(self.l2_reg >= 0.0) {
            return Err(NnError::config(format!("l2_reg must be non-negative, got {}", self.l2_reg)));
        }
        if !(self.learning_rate > 0.0) {
            return Err(NnError::config(format!("learning_rate must be positive, got {}", self.learning_rate)));
        }
        if !(self.lr_factor > 0.0 && self.lr_factor < 1.0) {
            return Err(NnError::config(format!("lr_factor must be in (0, 1), got {}", self.lr_factor)));
        }
        if !(self.min_lr.is_finite() && self.min_lr >= 0.0) {
            return Err(NnError::config(format!("min_lr must be finite and non-negative, got {}", self.min_lr)));
        }
        if self.early_stopping_patience == 0 || self.lr_patience == 0 {
            return Err(NnError::config("early_stopping_patience and lr_patience must be at least 1"));
        }
        if self.epochs == 0 || self.batch_size == 0 {
            return Err(NnError::config("epochs and batch_size must be at least 1"));
        }
        Ok(())
    }
}
