use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::debug;

use crate::data::dataset::Dataset;
use crate::error::{NnError, Result};

/// Train / validation / test partitions of one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Splits {
    pub train: Dataset,
    pub validation: Dataset,
    pub test: Dataset,
}

impl Splits {
    pub fn sizes(&self) -> (usize, usize, usize) {
        (self.train.len(), self.validation.len(), self.test.len())
    }
}

/// Shuffles row indices with `seed` and cuts them into `(train, test)`.
///
/// The test side gets `ceil(test_size · n)` rows; both sides must end up
/// non-empty.
pub fn train_test_split(data: &Dataset, test_size: f64, seed: u64) -> Result<(Dataset, Dataset)> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(NnError::config(format!("test_size must be in (0, 1), got {test_size}")));
    }

    let n = data.len();
    // Tolerance keeps ratios like 0.25 of 800 from rounding up past 200.
    let n_test = (test_size * n as f64 - 1e-9).ceil() as usize;
    let n_train = n.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(NnError::dataset(format!(
            "splitting {n} rows with test_size {test_size} leaves an empty partition"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));
    let (train_idx, test_idx) = indices.split_at(n_train);

    debug!(n_train, n_test, seed, "split rows");
    Ok((data.select(train_idx), data.select(test_idx)))
}

/// Splits off `test_size` of `data` as the test set, then `validation_size`
/// of the remainder as the validation set; both cuts use the same seed.
///
/// With `test_size = 0.2` and `validation_size = 0.25` this is a
/// 60 / 20 / 20 split.
pub fn three_way_split(data: &Dataset, validation_size: f64, test_size: f64, seed: u64) -> Result<Splits> {
    let (train_val, test) = train_test_split(data, test_size, seed)?;
    let (train, validation) = train_test_split(&train_val, validation_size, seed)?;
    Ok(Splits { train, validation, test })
}
