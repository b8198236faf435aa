pub mod adam;
pub mod sgd;

use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;

pub use adam::Adam;
pub use sgd::Sgd;

/// A trainable tensor paired with the gradient computed by the last
/// backward pass.
pub struct Param<'a> {
    pub value: &'a mut Matrix,
    pub grad: &'a Matrix,
}

/// Updates parameters from their gradients.
///
/// `params` are always handed over in the same order (input → output), so
/// stateful optimizers may key their per-parameter state by position.
pub trait Optimizer {
    fn step(&mut self, params: Vec<Param<'_>>);
    fn learning_rate(&self) -> f64;
    fn set_learning_rate(&mut self, learning_rate: f64);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerKind {
    Adam,
    Sgd,
}

impl OptimizerKind {
    pub fn build(self, learning_rate: f64) -> Box<dyn Optimizer> {
        match self {
            OptimizerKind::Adam => Box::new(Adam::new(learning_rate)),
            OptimizerKind::Sgd => Box::new(Sgd::new(learning_rate)),
        }
    }
}
