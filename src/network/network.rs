use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::layers::{Layer, Mode};
use crate::loss::{bce::BceLoss, loss_type::LossType};
use crate::math::matrix::Matrix;
use crate::optim::Param;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub input_size: usize,
    pub layers: Vec<Layer>,
}

impl Network {
    pub fn new(input_size: usize, layers: Vec<Layer>) -> Network {
        Network { input_size, layers }
    }

    /// Forward pass over a batch (one sample per row); caches what each layer
    /// needs for backprop.
    pub fn forward(&mut self, input: &Matrix, mut mode: Mode<'_>) -> Matrix {
        let mut current = input.clone();
        for layer in &mut self.layers {
            current = layer.forward(&current, mode.reborrow());
        }
        current
    }

    /// Inference-mode forward pass: running batch-norm statistics, no dropout.
    pub fn predict(&mut self, input: &Matrix) -> Matrix {
        self.forward(input, Mode::Eval)
    }

    /// Backward pass from ∂L/∂output; leaves gradients in every layer.
    pub fn backward(&mut self, delta: &Matrix) -> Matrix {
        let mut current = delta.clone();
        for layer in self.layers.iter_mut().rev() {
            current = layer.backward(&current);
        }
        current
    }

    /// Backward pass seeded from `loss` evaluated on the last forward pass.
    ///
    /// Binary cross-entropy after a trailing sigmoid is differentiated w.r.t.
    /// the logit instead, and the sigmoid layer is passed over, so a saturated
    /// wrong prediction still propagates `(p - y) / n`.
    pub fn backward_loss(&mut self, output: &Matrix, expected: &Matrix, loss: LossType) -> Matrix {
        if loss == LossType::BinaryCrossEntropy {
            if let Some((Layer::Activation(last), rest)) = self.layers.split_last_mut() {
                if last.function == ActivationFunction::Sigmoid {
                    let mut current = BceLoss::logit_derivative(output, expected);
                    for layer in rest.iter_mut().rev() {
                        current = layer.backward(&current);
                    }
                    return current;
                }
            }
        }
        self.backward(&loss.derivative(output, expected))
    }

    pub fn params_mut(&mut self) -> Vec<Param<'_>> {
        self.layers.iter_mut().flat_map(Layer::params_mut).collect()
    }

    /// Sum of every layer's regularization term.
    pub fn penalty(&self) -> f64 {
        self.layers.iter().map(Layer::penalty).sum()
    }

    pub fn param_count(&self) -> usize {
        self.layers.iter().map(Layer::param_count).sum()
    }

    pub fn output_size(&self) -> usize {
        self.layers.iter().fold(self.input_size, |size, layer| layer.output_size(size))
    }

    /// One line per layer with its output width and parameter count.
    pub fn summary(&self) -> String {
        let mut lines = vec![format!("Input({})", self.input_size)];
        let mut width = self.input_size;
        for layer in &self.layers {
            width = layer.output_size(width);
            lines.push(format!("{:<28} -> {:>4}  params: {}", layer.describe(), width, layer.param_count()));
        }
        lines.push(format!("Total params: {}", self.param_count()));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{ActivationLayer, BatchNorm, Dense};
    use rand::{rngs::StdRng, SeedableRng};

    /// Dense(l2) → BatchNorm → ReLU → Dense → Sigmoid, without dropout so the
    /// training-mode forward pass is deterministic.
    fn small_network(rng: &mut StdRng) -> Network {
        Network::new(3, vec![
            Layer::Dense(Dense::new(3, 5, 0.05, rng)),
            Layer::BatchNorm(BatchNorm::new(5)),
            Layer::Activation(ActivationLayer::new(ActivationFunction::ReLU)),
            Layer::Dense(Dense::new(5, 1, 0.02, rng)),
            Layer::Activation(ActivationLayer::new(ActivationFunction::Sigmoid)),
        ])
    }

    fn objective(network: &mut Network, x: &Matrix, y: &Matrix) -> f64 {
        let mut rng = StdRng::seed_from_u64(0);
        let out = network.forward(x, Mode::Train(&mut rng));
        LossType::BinaryCrossEntropy.loss(&out, y) + network.penalty()
    }

    fn nudge(network: &mut Network, param: usize, i: usize, j: usize, h: f64) {
        let mut params = network.params_mut();
        params[param].value.data[i][j] += h;
    }

    #[test]
    fn test_gradients_with_penalty_match_finite_differences() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut network = small_network(&mut rng);
        let x = Matrix::uniform(8, 3, &mut rng).map(|v| 4.0 * v - 2.0);
        let y = Matrix::column(vec![1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0]);

        let mut train_rng = StdRng::seed_from_u64(0);
        let out = network.forward(&x, Mode::Train(&mut train_rng));
        network.backward_loss(&out, &y, LossType::BinaryCrossEntropy);
        let analytic: Vec<Matrix> = network.params_mut().into_iter().map(|p| p.grad.clone()).collect();
        assert_eq!(analytic.len(), 6);

        let h = 1e-6;
        for (k, grad) in analytic.iter().enumerate() {
            for i in 0..grad.rows {
                for j in 0..grad.cols {
                    nudge(&mut network, k, i, j, h);
                    let plus = objective(&mut network, &x, &y);
                    nudge(&mut network, k, i, j, -2.0 * h);
                    let minus = objective(&mut network, &x, &y);
                    nudge(&mut network, k, i, j, h);

                    let numeric = (plus - minus) / (2.0 * h);
                    let tolerance = 1e-5 * grad.data[i][j].abs().max(1.0);
                    assert!(
                        (numeric - grad.data[i][j]).abs() < tolerance,
                        "param {k} ({i}, {j}): numeric {numeric}, analytic {}", grad.data[i][j]
                    );
                }
            }
        }
    }

    #[test]
    fn test_saturated_wrong_output_still_gets_gradient() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut dense = Dense::new(1, 1, 0.0, &mut rng);
        dense.weights = Matrix::from_data(vec![vec![40.0]]);
        let mut network = Network::new(1, vec![
            Layer::Dense(dense),
            Layer::Activation(ActivationLayer::new(ActivationFunction::Sigmoid)),
        ]);
        let x = Matrix::column(vec![1.0]);
        let y = Matrix::column(vec![0.0]);

        let out = network.predict(&x);
        assert!(LossType::BinaryCrossEntropy.loss(&out, &y) > 27.0);
        network.backward_loss(&out, &y, LossType::BinaryCrossEntropy);

        let grads: Vec<f64> = network.params_mut().iter().map(|p| p.grad.data[0][0]).collect();
        assert!((grads[0] - 1.0).abs() < 1e-9, "weight gradient {}", grads[0]);
        assert!((grads[1] - 1.0).abs() < 1e-9, "bias gradient {}", grads[1]);
    }

    #[test]
    fn test_mse_backprops_through_the_sigmoid() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut network = small_network(&mut rng);
        let x = Matrix::uniform(4, 3, &mut rng);
        let y = Matrix::column(vec![1.0, 0.0, 1.0, 0.0]);

        let mut train_rng = StdRng::seed_from_u64(0);
        let out = network.forward(&x, Mode::Train(&mut train_rng));
        let via_loss = network.backward_loss(&out, &y, LossType::Mse);
        let direct = network.backward(&LossType::Mse.derivative(&out, &y));

        assert_eq!(via_loss, direct);
    }
}
