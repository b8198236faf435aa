use serde::{Serialize, Deserialize};

use crate::data::dataset::Dataset;
use crate::error::{NnError, Result};
use crate::loss::loss_type::LossType;
use crate::math::matrix::Matrix;
use crate::network::network::Network;

/// Loss and accuracy of a network on one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Mean data loss plus the network's regularization penalty.
    pub loss: f64,
    /// Fraction of samples classified correctly, in [0, 1].
    pub accuracy: f64,
    pub samples: usize,
}

/// Runs `data` through `network` in inference mode.
pub fn evaluate(network: &mut Network, data: &Dataset, loss_type: LossType) -> Result<Evaluation> {
    if data.is_empty() {
        return Err(NnError::dataset("cannot evaluate on an empty dataset"));
    }
    if data.feature_count() != network.input_size {
        return Err(NnError::dataset(format!(
            "network expects {} features, dataset has {}",
            network.input_size,
            data.feature_count()
        )));
    }

    let predicted = network.predict(&data.features);
    Ok(Evaluation {
        loss: loss_type.loss(&predicted, &data.labels) + network.penalty(),
        accuracy: binary_accuracy(&predicted, &data.labels),
        samples: data.len(),
    })
}

/// Fraction of entries where `predicted > 0.5` agrees with `expected > 0.5`.
pub fn binary_accuracy(predicted: &Matrix, expected: &Matrix) -> f64 {
    let total = predicted.rows * predicted.cols;
    if total == 0 {
        return 0.0;
    }
    let correct = predicted.data.iter().flatten()
        .zip(expected.data.iter().flatten())
        .filter(|(p, y)| (**p > 0.5) == (**y > 0.5))
        .count();
    correct as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::builder::build_robust_classifier;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_binary_accuracy_thresholds_at_half() {
        let p = Matrix::column(vec![0.9, 0.2, 0.51, 0.5]);
        let y = Matrix::column(vec![1.0, 0.0, 0.0, 0.0]);
        assert_eq!(binary_accuracy(&p, &y), 0.75);
        assert_eq!(binary_accuracy(&Matrix::default(), &Matrix::default()), 0.0);
    }

    #[test]
    fn test_evaluate_reports_penalized_loss() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut network = build_robust_classifier(5, 0.01, 0.3, &mut rng).unwrap();
        let data = Dataset::new(
            Matrix::uniform(40, 5, &mut rng),
            Matrix::column((0..40).map(|i| (i % 2) as f64).collect()),
        )
        .unwrap();

        let eval = evaluate(&mut network, &data, LossType::BinaryCrossEntropy).unwrap();
        let predicted = network.predict(&data.features);
        let data_loss = LossType::BinaryCrossEntropy.loss(&predicted, &data.labels);

        assert_eq!(eval.samples, 40);
        assert!((0.0..=1.0).contains(&eval.accuracy));
        assert!(network.penalty() > 0.0);
        assert!((eval.loss - data_loss - network.penalty()).abs() < 1e-12);

        // Inference mode is deterministic.
        let again = evaluate(&mut network, &data, LossType::BinaryCrossEntropy).unwrap();
        assert_eq!(eval, again);
    }

    #[test]
    fn test_evaluate_rejects_wrong_width_and_empty_data() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut network = build_robust_classifier(5, 0.0, 0.0, &mut rng).unwrap();
        let wide = Dataset::new(Matrix::zeros(3, 6), Matrix::zeros(3, 1)).unwrap();
        let empty = Dataset::new(Matrix::default(), Matrix::default()).unwrap();

        assert!(evaluate(&mut network, &wide, LossType::BinaryCrossEntropy).is_err());
        assert!(evaluate(&mut network, &empty, LossType::BinaryCrossEntropy).is_err());
    }
}
