use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;

/// Sigmoid outputs stay in [SIGMOID_MIN, 1 - SIGMOID_MIN], strictly inside (0, 1).
const SIGMOID_MIN: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Sigmoid,
    ReLU,
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => {
                // Split on sign so exp() never overflows.
                let s = if x >= 0.0 {
                    1.0 / (1.0 + (-x).exp())
                } else {
                    let e = x.exp();
                    e / (1.0 + e)
                };
                s.clamp(SIGMOID_MIN, 1.0 - SIGMOID_MIN)
            }
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
        }
    }

    /// Element-wise derivative evaluated at the pre-activation `x`.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => {
                let fx = self.function(x);
                fx * (1.0 - fx)
            },
            ActivationFunction::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
        }
    }

    pub fn apply(&self, m: &Matrix) -> Matrix {
        m.map(|x| self.function(x))
    }

    pub fn apply_derivative(&self, m: &Matrix) -> Matrix {
        m.map(|x| self.derivative(x))
    }
}
