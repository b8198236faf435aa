use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::layers::Mode;
use crate::math::matrix::Matrix;

/// Inverted dropout: during training each unit is zeroed with probability
/// `rate` and survivors are scaled by `1 / (1 - rate)`, so evaluation is a
/// plain pass-through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dropout {
    pub rate: f64,
    #[serde(skip)]
    mask: Matrix,
}

impl Dropout {
    pub fn new(rate: f64) -> Dropout {
        Dropout { rate, mask: Matrix::default() }
    }

    pub fn forward(&mut self, input: &Matrix, mode: Mode<'_>) -> Matrix {
        let rng = match mode {
            Mode::Train(rng) if self.rate > 0.0 => rng,
            _ => {
                self.mask = Matrix::filled(input.rows, input.cols, 1.0);
                return input.clone();
            }
        };

        let scale = 1.0 / (1.0 - self.rate);
        let mut mask = Matrix::zeros(input.rows, input.cols);
        for row in mask.data.iter_mut() {
            for m in row.iter_mut() {
                if rng.gen::<f64>() >= self.rate {
                    *m = scale;
                }
            }
        }

        let out = input.hadamard(&mask);
        self.mask = mask;
        out
    }

    pub fn backward(&self, delta: &Matrix) -> Matrix {
        delta.hadamard(&self.mask)
    }
}
