use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{NnError, Result};
use crate::layers::{ActivationLayer, BatchNorm, Dense, Dropout, Layer};
use crate::loss::loss_type::LossType;
use crate::network::network::Network;

/// Describes one layer in a network specification. Input widths are not
/// stored; they are chained from the previous layer when the spec is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerSpec {
    Dense { units: usize, l2: f64 },
    BatchNorm,
    Activation { function: ActivationFunction },
    Dropout { rate: f64 },
}

/// A serializable description of a network architecture plus its training
/// loss type.
///
/// The spec is stored next to the trained weights in a checkpoint so the
/// architecture can be read back without walking the weight tensors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name used in logs and checkpoint metadata.
    pub name: String,
    /// Width of the raw input.
    pub input_size: usize,
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
    /// Loss function to pair with this network during training.
    pub loss: LossType,
}

impl NetworkSpec {
    /// Instantiates the spec with freshly initialized weights.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network> {
        if self.input_size == 0 {
            return Err(NnError::config("network input size must be at least 1"));
        }

        let mut width = self.input_size;
        let mut layers = Vec::with_capacity(self.layers.len());
        for spec in &self.layers {
            let layer = match *spec {
                LayerSpec::Dense { units, l2 } => {
                    if units == 0 {
                        return Err(NnError::config("dense layer needs at least one unit"));
                    }
                    if !(l2 >= 0.0) {
                        return Err(NnError::config(format!("L2 strength must be non-negative, got {l2}")));
                    }
                    Layer::Dense(Dense::new(width, units, l2, rng))
                }
                LayerSpec::BatchNorm => Layer::BatchNorm(BatchNorm::new(width)),
                LayerSpec::Activation { function } => Layer::Activation(ActivationLayer::new(function)),
                LayerSpec::Dropout { rate } => {
                    if !(0.0..1.0).contains(&rate) {
                        return Err(NnError::config(format!("dropout rate must be in [0, 1), got {rate}")));
                    }
                    Layer::Dropout(Dropout::new(rate))
                }
            };
            width = layer.output_size(width);
            layers.push(layer);
        }

        Ok(Network::new(self.input_size, layers))
    }
}
