use crate::optim::{Optimizer, Param};

pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }
}

impl Optimizer for Sgd {
    /// Plain gradient descent: `w ← w - lr · g`.
    fn step(&mut self, params: Vec<Param<'_>>) {
        for param in params {
            for (row, grad_row) in param.value.data.iter_mut().zip(param.grad.data.iter()) {
                for (w, g) in row.iter_mut().zip(grad_row.iter()) {
                    *w -= self.learning_rate * g;
                }
            }
        }
    }

    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    fn set_learning_rate(&mut self, learning_rate: f64) {
        self.learning_rate = learning_rate;
    }
}
