use std::fmt;

use serde::{Serialize, Deserialize};

/// Per-epoch training statistics recorded by `train_loop` and handed to
/// every callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean training loss (data loss plus L2 penalty) over the epoch's batches.
    pub train_loss: f64,
    /// Training accuracy as a fraction in [0, 1], measured in training mode.
    pub train_accuracy: f64,
    /// Validation loss, if a validation set was provided.
    pub val_loss: Option<f64>,
    /// Validation accuracy, if a validation set was provided.
    pub val_accuracy: Option<f64>,
    /// Learning rate the epoch was trained with.
    pub learning_rate: f64,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}

impl fmt::Display for EpochStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Epoch {}/{} - {}ms - loss: {:.4} - accuracy: {:.4}",
            self.epoch, self.total_epochs, self.elapsed_ms, self.train_loss, self.train_accuracy
        )?;
        if let (Some(loss), Some(acc)) = (self.val_loss, self.val_accuracy) {
            write!(f, " - val_loss: {loss:.4} - val_accuracy: {acc:.4}")?;
        }
        write!(f, " - learning_rate: {:.1e}", self.learning_rate)
    }
}
