use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;

/// Added to every column range so constant columns do not divide by zero.
pub const NORMALIZE_EPSILON: f64 = 1e-8;

/// Per-column min-max scaling to [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub min: Vec<f64>,
    pub max: Vec<f64>,
}

impl MinMaxScaler {
    /// Records the per-column extremes of `data`.
    pub fn fit(data: &Matrix) -> Result<MinMaxScaler> {
        if data.rows == 0 || data.cols == 0 {
            return Err(NnError::dataset("cannot fit a scaler on an empty matrix"));
        }
        Ok(MinMaxScaler { min: data.column_min(), max: data.column_max() })
    }

    /// `(x - min) / (max - min + ε)` column by column.
    ///
    /// # Panics
    /// Panics if `data` does not have the column count seen by `fit`.
    pub fn transform(&self, data: &Matrix) -> Matrix {
        assert_eq!(data.cols, self.min.len(), "scaler was fitted on a different width");
        Matrix::from_data(
            data.data.iter()
                .map(|row| row.iter().enumerate()
                    .map(|(j, x)| (x - self.min[j]) / (self.max[j] - self.min[j] + NORMALIZE_EPSILON))
                    .collect())
                .collect(),
        )
    }

    pub fn fit_transform(data: &Matrix) -> Result<(MinMaxScaler, Matrix)> {
        let scaler = MinMaxScaler::fit(data)?;
        let scaled = scaler.transform(data);
        Ok((scaler, scaled))
    }
}
