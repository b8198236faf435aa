use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;

/// Row-aligned features and labels: row `i` of `labels` belongs to row `i`
/// of `features`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub features: Matrix,
    pub labels: Matrix,
}

impl Dataset {
    pub fn new(features: Matrix, labels: Matrix) -> Result<Dataset> {
        if features.rows != labels.rows {
            return Err(NnError::dataset(format!(
                "features have {} rows but labels have {}",
                features.rows, labels.rows
            )));
        }
        Ok(Dataset { features, labels })
    }

    pub fn len(&self) -> usize {
        self.features.rows
    }

    pub fn is_empty(&self) -> bool {
        self.features.rows == 0
    }

    pub fn feature_count(&self) -> usize {
        self.features.cols
    }

    /// Gathers the given rows of both matrices, keeping them aligned.
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: self.features.select_rows(indices),
            labels: self.labels.select_rows(indices),
        }
    }
}
