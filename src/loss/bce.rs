use crate::math::matrix::Matrix;

pub struct BceLoss;

/// Predictions are clamped to [EPS, 1 - EPS] before the logarithms.
const EPS: f64 = 1e-12;

fn clamp(p: f64) -> f64 {
    p.clamp(EPS, 1.0 - EPS)
}

impl BceLoss {
    /// Scalar BCE over every entry: -mean(y·log(p) + (1-y)·log(1-p)), p clamped.
    pub fn loss(predicted: &Matrix, expected: &Matrix) -> f64 {
        let n = (predicted.rows * predicted.cols) as f64;
        predicted.data.iter().flatten().zip(expected.data.iter().flatten())
            .map(|(&p, y)| {
                let p = clamp(p);
                -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
            })
            .sum::<f64>() / n
    }

    /// Gradient of the mean w.r.t. the probabilities: (p - y) / (p · (1 - p)) / n
    pub fn derivative(predicted: &Matrix, expected: &Matrix) -> Matrix {
        let n = (predicted.rows * predicted.cols) as f64;
        zip_map(predicted, expected, |p, y| {
            let p = clamp(p);
            (p - y) / (p * (1.0 - p)) / n
        })
    }

    /// Gradient of the combined Sigmoid + BCE w.r.t. the pre-sigmoid logits.
    ///
    /// Composed together the sigmoid Jacobian cancels and the gradient
    /// simplifies to `(p - y) / n`, which stays informative when the sigmoid
    /// saturates. The sigmoid layer itself must then be skipped on the way
    /// back (see `Network::backward_loss`).
    pub fn logit_derivative(predicted: &Matrix, expected: &Matrix) -> Matrix {
        let n = (predicted.rows * predicted.cols) as f64;
        zip_map(predicted, expected, |p, y| (p - y) / n)
    }
}

fn zip_map(predicted: &Matrix, expected: &Matrix, f: impl Fn(f64, f64) -> f64) -> Matrix {
    Matrix::from_data(
        predicted.data.iter().zip(expected.data.iter())
            .map(|(p_row, y_row)| p_row.iter().zip(y_row.iter()).map(|(&p, &y)| f(p, y)).collect())
            .collect(),
    )
}
