use serde::{Serialize, Deserialize};

use crate::loss::{bce::BceLoss, mse::MseLoss};
use crate::math::matrix::Matrix;

/// Selects which loss function the training loop uses.
///
/// - `Mse`                — Mean-squared error; pair with an unbounded output.
/// - `BinaryCrossEntropy` — Binary cross-entropy; pair with Sigmoid output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    Mse,
    BinaryCrossEntropy,
}

impl LossType {
    /// Mean loss over a batch.
    pub fn loss(self, predicted: &Matrix, expected: &Matrix) -> f64 {
        match self {
            LossType::Mse                => MseLoss::loss(predicted, expected),
            LossType::BinaryCrossEntropy => BceLoss::loss(predicted, expected),
        }
    }

    /// ∂(mean loss)/∂predicted for a batch.
    pub fn derivative(self, predicted: &Matrix, expected: &Matrix) -> Matrix {
        match self {
            LossType::Mse                => MseLoss::derivative(predicted, expected),
            LossType::BinaryCrossEntropy => BceLoss::derivative(predicted, expected),
        }
    }
}
