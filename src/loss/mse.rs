use crate::math::matrix::Matrix;

pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE: mean((predicted - expected)²)
    pub fn loss(predicted: &Matrix, expected: &Matrix) -> f64 {
        let n = (predicted.rows * predicted.cols) as f64;
        (predicted.clone() - expected.clone()).squared_sum() / n
    }

    /// Gradient of the mean: 2 · (predicted - expected) / n
    pub fn derivative(predicted: &Matrix, expected: &Matrix) -> Matrix {
        let n = (predicted.rows * predicted.cols) as f64;
        (predicted.clone() - expected.clone()).scale(2.0 / n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mse_value_and_gradient() {
        let p = Matrix::column(vec![1.0, 3.0]);
        let y = Matrix::column(vec![0.0, 1.0]);
        assert!((MseLoss::loss(&p, &y) - 2.5).abs() < 1e-12);
        assert_eq!(MseLoss::derivative(&p, &y).data, vec![vec![1.0], vec![2.0]]);
    }
}
