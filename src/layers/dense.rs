use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;
use crate::optim::Param;

/// Fully connected layer: `y = x · W + b`, with an optional L2 kernel
/// penalty `l2 · ΣW²` that is added to the loss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dense {
    pub units: usize,
    pub input_size: usize,
    /// Shape (input_size, units).
    pub weights: Matrix,
    /// Shape (1, units).
    pub biases: Matrix,
    pub l2: f64,
    #[serde(skip)]
    input: Matrix,  // batch seen by the last forward pass, needed for ∂L/∂W
    #[serde(skip)]
    weights_grad: Matrix,
    #[serde(skip)]
    biases_grad: Matrix,
}

impl Dense {
    pub fn new<R: Rng + ?Sized>(input_size: usize, units: usize, l2: f64, rng: &mut R) -> Dense {
        Dense {
            units,
            input_size,
            weights: Matrix::glorot_uniform(input_size, units, rng),
            biases: Matrix::zeros(1, units),
            l2,
            input: Matrix::default(),
            weights_grad: Matrix::zeros(input_size, units),
            biases_grad: Matrix::zeros(1, units),
        }
    }

    pub fn forward(&mut self, input: &Matrix) -> Matrix {
        let out = input.matmul(&self.weights).add_row(&self.biases);
        self.input = input.clone();
        out
    }

    /// Stores parameter gradients and returns ∂L/∂x.
    /// `delta` is ∂L/∂y for the batch of the last forward pass.
    pub fn backward(&mut self, delta: &Matrix) -> Matrix {
        let mut weights_grad = self.input.transpose().matmul(delta);
        if self.l2 > 0.0 {
            weights_grad = weights_grad + self.weights.scale(2.0 * self.l2);
        }
        self.weights_grad = weights_grad;
        self.biases_grad = delta.sum_rows();

        delta.matmul(&self.weights.transpose())
    }

    pub fn penalty(&self) -> f64 {
        if self.l2 > 0.0 { self.l2 * self.weights.squared_sum() } else { 0.0 }
    }

    pub fn params_mut(&mut self) -> Vec<Param<'_>> {
        vec![
            Param { value: &mut self.weights, grad: &self.weights_grad },
            Param { value: &mut self.biases, grad: &self.biases_grad },
        ]
    }

    pub fn gradients(&self) -> (&Matrix, &Matrix) {
        (&self.weights_grad, &self.biases_grad)
    }
}
