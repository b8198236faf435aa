use crate::math::matrix::Matrix;
use crate::optim::{Optimizer, Param};

/// Adam with bias-corrected first and second moment estimates.
///
/// Moment buffers are allocated lazily on the first step, one per parameter
/// in the order `Network::params_mut()` yields them.
pub struct Adam {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    m: Vec<Matrix>,
    v: Vec<Matrix>,
    t: i32,
}

impl Adam {
    pub fn new(learning_rate: f64) -> Adam {
        Adam {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
            m: Vec::new(),
            v: Vec::new(),
            t: 0,
        }
    }

    /// Number of update steps taken so far.
    pub fn iterations(&self) -> i32 {
        self.t
    }
}

impl Optimizer for Adam {
    fn step(&mut self, params: Vec<Param<'_>>) {
        self.t += 1;
        let bias1 = 1.0 - self.beta1.powi(self.t);
        let bias2 = 1.0 - self.beta2.powi(self.t);

        for (idx, param) in params.into_iter().enumerate() {
            if self.m.len() <= idx {
                self.m.push(Matrix::zeros(param.value.rows, param.value.cols));
                self.v.push(Matrix::zeros(param.value.rows, param.value.cols));
            }
            let (m, v) = (&mut self.m[idx], &mut self.v[idx]);

            for i in 0..param.value.rows {
                for j in 0..param.value.cols {
                    let g = param.grad.data[i][j];
                    m.data[i][j] = self.beta1 * m.data[i][j] + (1.0 - self.beta1) * g;
                    v.data[i][j] = self.beta2 * v.data[i][j] + (1.0 - self.beta2) * g * g;
                    let m_hat = m.data[i][j] / bias1;
                    let v_hat = v.data[i][j] / bias2;
                    param.value.data[i][j] -= self.learning_rate * m_hat / (v_hat.sqrt() + self.epsilon);
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
