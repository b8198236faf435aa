use rand::Rng;

use crate::activation::activation::ActivationFunction;
use crate::error::Result;
use crate::loss::loss_type::LossType;
use crate::network::network::Network;
use crate::network::spec::{LayerSpec, NetworkSpec};

/// Widths of the two hidden blocks.
pub const HIDDEN_UNITS: [usize; 2] = [128, 64];

/// Architecture of the binary classifier:
///
/// ```text
/// input → BatchNorm
///       → Dense(128, l2) → BatchNorm → ReLU → Dropout
///       → Dense(64, l2)  → BatchNorm → ReLU → Dropout
///       → Dense(1) → Sigmoid
/// ```
pub fn robust_classifier_spec(input_size: usize, l2_reg: f64, dropout_rate: f64) -> NetworkSpec {
    let mut layers = vec![LayerSpec::BatchNorm];
    for units in HIDDEN_UNITS {
        layers.extend([
            LayerSpec::Dense { units, l2: l2_reg },
            LayerSpec::BatchNorm,
            LayerSpec::Activation { function: ActivationFunction::ReLU },
            LayerSpec::Dropout { rate: dropout_rate },
        ]);
    }
    layers.extend([
        LayerSpec::Dense { units: 1, l2: 0.0 },
        LayerSpec::Activation { function: ActivationFunction::Sigmoid },
    ]);

    NetworkSpec {
        name: "advanced_robust_classifier".to_string(),
        input_size,
        layers,
        loss: LossType::BinaryCrossEntropy,
    }
}

pub fn build_robust_classifier<R: Rng + ?Sized>(
    input_size: usize,
    l2_reg: f64,
    dropout_rate: f64,
    rng: &mut R,
) -> Result<Network> {
    robust_classifier_spec(input_size, l2_reg, dropout_rate).build(rng)
}
