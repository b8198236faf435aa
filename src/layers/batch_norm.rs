use serde::{Serialize, Deserialize};

use crate::layers::Mode;
use crate::math::matrix::Matrix;
use crate::optim::Param;

pub const DEFAULT_MOMENTUM: f64 = 0.99;
pub const DEFAULT_EPSILON: f64 = 1e-3;

/// Batch normalization over the feature axis.
///
/// Training mode normalizes with the batch mean and biased variance and folds
/// them into exponential running averages; evaluation mode uses the running
/// averages only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchNorm {
    pub features: usize,
    /// Shape (1, features).
    pub gamma: Matrix,
    /// Shape (1, features).
    pub beta: Matrix,
    pub running_mean: Vec<f64>,
    pub running_var: Vec<f64>,
    pub momentum: f64,
    pub epsilon: f64,
    #[serde(skip)]
    cache: Option<BatchCache>,
    #[serde(skip)]
    gamma_grad: Matrix,
    #[serde(skip)]
    beta_grad: Matrix,
}

#[derive(Debug, Clone)]
struct BatchCache {
    x_hat: Matrix,
    inv_std: Vec<f64>,
}

impl BatchNorm {
    pub fn new(features: usize) -> BatchNorm {
        BatchNorm {
            features,
            gamma: Matrix::filled(1, features, 1.0),
            beta: Matrix::zeros(1, features),
            running_mean: vec![0.0; features],
            running_var: vec![1.0; features],
            momentum: DEFAULT_MOMENTUM,
            epsilon: DEFAULT_EPSILON,
            cache: None,
            gamma_grad: Matrix::zeros(1, features),
            beta_grad: Matrix::zeros(1, features),
        }
    }

    pub fn forward(&mut self, input: &Matrix, mode: Mode<'_>) -> Matrix {
        let (mean, inv_std) = if mode.is_training() {
            let (mean, var) = input.column_mean_var();
            for j in 0..self.features {
                self.running_mean[j] = self.momentum * self.running_mean[j] + (1.0 - self.momentum) * mean[j];
                self.running_var[j] = self.momentum * self.running_var[j] + (1.0 - self.momentum) * var[j];
            }
            let inv_std: Vec<f64> = var.iter().map(|v| 1.0 / (v + self.epsilon).sqrt()).collect();
            (mean, inv_std)
        } else {
            let inv_std = self.running_var.iter().map(|v| 1.0 / (v + self.epsilon).sqrt()).collect();
            (self.running_mean.clone(), inv_std)
        };

        let x_hat = Matrix::from_data(
            input.data.iter()
                .map(|row| (0..self.features).map(|j| (row[j] - mean[j]) * inv_std[j]).collect())
                .collect(),
        );
        let out = Matrix::from_data(
            x_hat.data.iter()
                .map(|row| (0..self.features)
                    .map(|j| self.gamma.data[0][j] * row[j] + self.beta.data[0][j])
                    .collect())
                .collect(),
        );

        self.cache = if mode.is_training() { Some(BatchCache { x_hat, inv_std }) } else { None };
        out
    }

    /// Gradient through the training-mode normalization.
    ///
    /// # Panics
    /// Panics if the last forward pass was not in training mode.
    pub fn backward(&mut self, delta: &Matrix) -> Matrix {
        let cache = self.cache.as_ref()
            .expect("BatchNorm::backward() requires a training-mode forward pass");
        let n = delta.rows as f64;

        let mut gamma_grad = vec![0.0; self.features];
        let mut beta_grad = vec![0.0; self.features];
        let mut sum_dxh = vec![0.0; self.features];
        let mut sum_dxh_xh = vec![0.0; self.features];

        for (d_row, xh_row) in delta.data.iter().zip(cache.x_hat.data.iter()) {
            for j in 0..self.features {
                gamma_grad[j] += d_row[j] * xh_row[j];
                beta_grad[j] += d_row[j];
                let dxh = d_row[j] * self.gamma.data[0][j];
                sum_dxh[j] += dxh;
                sum_dxh_xh[j] += dxh * xh_row[j];
            }
        }

        let d_input = Matrix::from_data(
            delta.data.iter().zip(cache.x_hat.data.iter())
                .map(|(d_row, xh_row)| (0..self.features)
                    .map(|j| {
                        let dxh = d_row[j] * self.gamma.data[0][j];
                        cache.inv_std[j] / n * (n * dxh - sum_dxh[j] - xh_row[j] * sum_dxh_xh[j])
                    })
                    .collect())
                .collect(),
        );

        self.gamma_grad = Matrix::from_data(vec![gamma_grad]);
        self.beta_grad = Matrix::from_data(vec![beta_grad]);
        d_input
    }

    pub fn params_mut(&mut self) -> Vec<Param<'_>> {
        vec![
            Param { value: &mut self.gamma, grad: &self.gamma_grad },
            Param { value: &mut self.beta, grad: &self.beta_grad },
        ]
    }

    pub fn gradients(&self) -> (&Matrix, &Matrix) {
        (&self.gamma_grad, &self.beta_grad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn train_forward(bn: &mut BatchNorm, x: &Matrix) -> Matrix {
        let mut rng = StdRng::seed_from_u64(0);
        bn.forward(x, Mode::Train(&mut rng))
    }

    #[test]
    fn test_training_output_is_standardized() {
        let mut rng = StdRng::seed_from_u64(5);
        let x = Matrix::uniform(32, 4, &mut rng).map(|v| v * 10.0 + 3.0);
        let mut bn = BatchNorm::new(4);

        let y = train_forward(&mut bn, &x);
        let (mean, var) = y.column_mean_var();

        for j in 0..4 {
            assert!(mean[j].abs() < 1e-9);
            // ε keeps the variance a little under one.
            assert!(var[j] > 0.99 && var[j] <= 1.0);
        }
    }

    #[test]
    fn test_eval_uses_running_statistics() {
        let mut bn = BatchNorm::new(2);
        bn.running_mean = vec![1.0, -1.0];
        bn.running_var = vec![4.0 - DEFAULT_EPSILON, 1.0 - DEFAULT_EPSILON];

        let y = bn.forward(&Matrix::from_data(vec![vec![3.0, 0.0]]), Mode::Eval);

        assert!((y.data[0][0] - 1.0).abs() < 1e-12);
        assert!((y.data[0][1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_running_statistics_follow_momentum() {
        let mut bn = BatchNorm::new(1);
        let x = Matrix::column(vec![1.0, 3.0]);

        train_forward(&mut bn, &x);

        assert!((bn.running_mean[0] - 0.02).abs() < 1e-12);
        assert!((bn.running_var[0] - (0.99 + 0.01 * 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_input_gradient_matches_finite_differences() {
        let mut rng = StdRng::seed_from_u64(9);
        let x = Matrix::uniform(6, 3, &mut rng);
        let r = Matrix::uniform(6, 3, &mut rng);
        let mut bn = BatchNorm::new(3);
        bn.gamma = Matrix::from_data(vec![vec![1.5, 0.5, -1.0]]);

        train_forward(&mut bn, &x);
        let dx = bn.backward(&r);

        let weighted_sum = |bn: &mut BatchNorm, x: &Matrix| -> f64 {
            train_forward(bn, x).hadamard(&r).data.iter().flatten().sum()
        };

        let h = 1e-6;
        for i in 0..6 {
            for j in 0..3 {
                let mut plus = x.clone();
                plus.data[i][j] += h;
                let mut minus = x.clone();
                minus.data[i][j] -= h;
                let numeric = (weighted_sum(&mut bn, &plus) - weighted_sum(&mut bn, &minus)) / (2.0 * h);
                assert!((numeric - dx.data[i][j]).abs() < 1e-5, "mismatch at ({i}, {j})");
            }
        }
    }

    #[test]
    fn test_gamma_and_beta_gradients_match_finite_differences() {
        let mut rng = StdRng::seed_from_u64(10);
        let x = Matrix::uniform(7, 3, &mut rng);
        let r = Matrix::uniform(7, 3, &mut rng);
        let mut bn = BatchNorm::new(3);
        bn.gamma = Matrix::from_data(vec![vec![0.8, -1.2, 2.0]]);
        bn.beta = Matrix::from_data(vec![vec![0.1, 0.0, -0.3]]);

        train_forward(&mut bn, &x);
        bn.backward(&r);
        let (gamma_grad, beta_grad) = {
            let (g, b) = bn.gradients();
            (g.clone(), b.clone())
        };

        let weighted_sum = |bn: &mut BatchNorm| -> f64 {
            train_forward(bn, &x).hadamard(&r).data.iter().flatten().sum()
        };

        let h = 1e-6;
        for j in 0..3 {
            let original = bn.gamma.data[0][j];
            bn.gamma.data[0][j] = original + h;
            let plus = weighted_sum(&mut bn);
            bn.gamma.data[0][j] = original - h;
            let minus = weighted_sum(&mut bn);
            bn.gamma.data[0][j] = original;
            assert!(((plus - minus) / (2.0 * h) - gamma_grad.data[0][j]).abs() < 1e-5, "gamma {j}");

            let original = bn.beta.data[0][j];
            bn.beta.data[0][j] = original + h;
            let plus = weighted_sum(&mut bn);
            bn.beta.data[0][j] = original - h;
            let minus = weighted_sum(&mut bn);
            bn.beta.data[0][j] = original;
            assert!(((plus - minus) / (2.0 * h) - beta_grad.data[0][j]).abs() < 1e-5, "beta {j}");
        }
    }
}
