use serde::{Deserialize, Serialize};

use crate::network::spec::NetworkSpec;

/// Annotations stored next to the weights in a checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub description: Option<String>,
    /// Architecture the weights belong to.
    pub architecture: NetworkSpec,
    /// 1-based epoch at which the snapshot was taken.
    pub epoch: usize,
    /// Validation loss at that epoch.
    pub val_loss: f64,
    pub learning_rate: f64,
}
