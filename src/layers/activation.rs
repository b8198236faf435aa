use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::math::matrix::Matrix;

/// Element-wise activation as a standalone layer, so it can sit after a
/// normalization layer instead of being fused into `Dense`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationLayer {
    pub function: ActivationFunction,
    #[serde(skip)]
    pre_activation: Matrix,  // z, needed for σ'(z)
}

impl ActivationLayer {
    pub fn new(function: ActivationFunction) -> ActivationLayer {
        ActivationLayer { function, pre_activation: Matrix::default() }
    }

    pub fn forward(&mut self, input: &Matrix) -> Matrix {
        self.pre_activation = input.clone();
        self.function.apply(input)
    }

    /// δ = error ⊙ σ'(z)
    pub fn backward(&self, delta: &Matrix) -> Matrix {
        delta.hadamard(&self.function.apply_derivative(&self.pre_activation))
    }
}
