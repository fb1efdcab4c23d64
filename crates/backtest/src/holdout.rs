//! Train/test holdout splits.

use crate::error::{BacktestError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn check_fraction(name: &str, fraction: f64) -> Result<()> {
    if !(fraction > 0.0 && fraction < 1.0) {
        return Err(BacktestError::InvalidConfig(format!(
            "{name} must lie strictly between 0 and 1, got {fraction}"
        )));
    }
    Ok(())
}

/// Index splitting `len` points so that `floor(len * train_fraction)` train.
///
/// Both sides must be non-empty.
pub fn split_index(len: usize, train_fraction: f64) -> Result<usize> {
    check_fraction("split_percentage", train_fraction)?;
    let index = (len as f64 * train_fraction).floor() as usize;
    if index == 0 || index >= len {
        return Err(BacktestError::InsufficientData {
            required: 2,
            actual: len,
        });
    }
    Ok(index)
}

/// Chronological split: the first `floor(len * train_fraction)` items train.
pub fn chronological_split<T>(data: &[T], train_fraction: f64) -> Result<(&[T], &[T])> {
    let index = split_index(data.len(), train_fraction)?;
    Ok(data.split_at(index))
}

/// Seeded random split of `0..len` into `(train, test)` index sets.
///
/// The test set holds `ceil(len * test_fraction)` indices.
pub fn shuffled_split(len: usize, test_fraction: f64, seed: u64) -> Result<(Vec<usize>, Vec<usize>)> {
    check_fraction("test fraction", test_fraction)?;
    // Absorb representation error from fractions computed as `1 - split`
    let n_test = (len as f64 * test_fraction - 1e-9).ceil() as usize;
    if n_test == 0 || n_test >= len {
        return Err(BacktestError::InsufficientData {
            required: 2,
            actual: len,
        });
    }

    let mut indices: Vec<usize> = (0..len).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));
    let train = indices.split_off(n_test);
    Ok((train, indices))
}
