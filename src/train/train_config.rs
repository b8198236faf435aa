use crate::loss::loss_type::LossType;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`     — maximum number of full passes over the training data
/// - `batch_size` — samples per mini-batch; the last batch may be smaller
/// - `loss_type`  — which loss function to use
/// - `seed`       — seeds batch shuffling and dropout masks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub loss_type: LossType,
    pub seed: u64,
}

impl TrainConfig {
    /// Creates a `TrainConfig` with seed 0.
    pub fn new(epochs: usize, batch_size: usize, loss_type: LossType) -> Self {
        TrainConfig { epochs, batch_size, loss_type, seed: 0 }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
