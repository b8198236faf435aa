use serde::{Serialize, Deserialize};

use crate::layers::{ActivationLayer, BatchNorm, Dense, Dropout, Mode};
use crate::math::matrix::Matrix;
use crate::optim::Param;

/// One stage of a sequential network.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layer {
    Dense(Dense),
    BatchNorm(BatchNorm),
    Activation(ActivationLayer),
    Dropout(Dropout),
}

impl Layer {
    pub fn forward(&mut self, input: &Matrix, mode: Mode<'_>) -> Matrix {
        match self {
            Layer::Dense(l) => l.forward(input),
            Layer::BatchNorm(l) => l.forward(input, mode),
            Layer::Activation(l) => l.forward(input),
            Layer::Dropout(l) => l.forward(input, mode),
        }
    }

    /// Backpropagates ∂L/∂output to ∂L/∂input, storing parameter gradients.
    pub fn backward(&mut self, delta: &Matrix) -> Matrix {
        match self {
            Layer::Dense(l) => l.backward(delta),
            Layer::BatchNorm(l) => l.backward(delta),
            Layer::Activation(l) => l.backward(delta),
            Layer::Dropout(l) => l.backward(delta),
        }
    }

    pub fn params_mut(&mut self) -> Vec<Param<'_>> {
        match self {
            Layer::Dense(l) => l.params_mut(),
            Layer::BatchNorm(l) => l.params_mut(),
            Layer::Activation(_) | Layer::Dropout(_) => vec![],
        }
    }

    /// Regularization term this layer adds to the loss.
    pub fn penalty(&self) -> f64 {
        match self {
            Layer::Dense(l) => l.penalty(),
            _ => 0.0,
        }
    }

    /// Trainable parameter count (running statistics excluded).
    pub fn param_count(&self) -> usize {
        match self {
            Layer::Dense(l) => l.input_size * l.units + l.units,
            Layer::BatchNorm(l) => 2 * l.features,
            Layer::Activation(_) | Layer::Dropout(_) => 0,
        }
    }

    /// Width of this layer's output given the width of its input.
    pub fn output_size(&self, input_size: usize) -> usize {
        match self {
            Layer::Dense(l) => l.units,
            _ => input_size,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Layer::Dense(l) if l.l2 > 0.0 => format!("Dense({}, l2={})", l.units, l.l2),
            Layer::Dense(l) => format!("Dense({})", l.units),
            Layer::BatchNorm(_) => "BatchNormalization".to_string(),
            Layer::Activation(l) => format!("Activation({:?})", l.function),
            Layer::Dropout(l) => format!("Dropout({})", l.rate),
        }
    }
}
