use rand::Rng;

use crate::data::dataset::Dataset;
use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;

/// Generates `rows` samples of `features` uniform values in [0, 1) and an
/// independent 0/1 label per sample.
///
/// The labels carry no relationship to the features; this is placeholder
/// data standing in for real recordings.
pub fn synthesize<R: Rng + ?Sized>(rows: usize, features: usize, rng: &mut R) -> Result<Dataset> {
    if rows == 0 || features == 0 {
        return Err(NnError::dataset(format!(
            "cannot synthesize a {rows}×{features} dataset"
        )));
    }

    let x = Matrix::uniform(rows, features, rng);
    let y = Matrix::column((0..rows).map(|_| rng.gen_range(0..2u8) as f64).collect());
    Dataset::new(x, y)
}
