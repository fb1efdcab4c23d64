//! Feature engineering for the next-day return regressor
//!
//! Each usable day becomes one row `[SMA50, SMA200, mean volume over 5 days]`
//! of adjusted closes and volumes. The target is the following day's simple
//! return; the last day has no successor and takes the mean of the other
//! targets. Days before every feature is defined are dropped.

use crate::error::{BacktestError, Result};
use serde::Serialize;

/// Short moving-average window
pub const SHORT_WINDOW: usize = 50;
/// Long moving-average window
pub const LONG_WINDOW: usize = 200;
/// Volume averaging window
pub const VOLUME_WINDOW: usize = 5;

/// Feature rows and their targets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureSet {
    /// `[sma_short, sma_long, volume_mean]` per day
    pub rows: Vec<Vec<f64>>,
    /// Next-day return per row
    pub targets: Vec<f64>,
}

impl FeatureSet {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Copy out the rows and targets at `indices`.
    pub fn select(&self, indices: &[usize]) -> (Vec<Vec<f64>>, Vec<f64>) {
        indices
            .iter()
            .map(|&i| (self.rows[i].clone(), self.targets[i]))
            .unzip()
    }
}

/// Trailing mean over `window` values; `None` until the window is full.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    let mut sum = 0.0;
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            sum += v;
            if i >= window {
                sum -= values[i - window];
            }
            (i + 1 >= window).then(|| sum / window as f64)
        })
        .collect()
}

/// Build the regressor dataset from adjusted closes and volumes.
pub fn forest_features(adj_close: &[f64], volume: &[f64]) -> Result<FeatureSet> {
    if adj_close.len() != volume.len() {
        return Err(BacktestError::LengthMismatch {
            left: adj_close.len(),
            right: volume.len(),
        });
    }
    // Two usable days are needed so the imputed target is defined
    let required = LONG_WINDOW + 1;
    if adj_close.len() < required {
        return Err(BacktestError::InsufficientData {
            required,
            actual: adj_close.len(),
        });
    }

    let short = rolling_mean(adj_close, SHORT_WINDOW);
    let long = rolling_mean(adj_close, LONG_WINDOW);
    let volume_mean = rolling_mean(volume, VOLUME_WINDOW);

    let mut rows = Vec::new();
    let mut returns = Vec::new();
    for i in 1..adj_close.len() {
        if let (Some(s), Some(l), Some(v)) = (short[i], long[i], volume_mean[i]) {
            rows.push(vec![s, l, v]);
            returns.push(adj_close[i] / adj_close[i - 1] - 1.0);
        }
    }

    let mut targets: Vec<f64> = returns.iter().skip(1).copied().collect();
    let mean = targets.iter().sum::<f64>() / targets.len() as f64;
    targets.push(mean);

    Ok(FeatureSet { rows, targets })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_mean() {
        let means = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(means, vec![None, Some(1.5), Some(2.5), Some(3.5)]);
        assert_eq!(rolling_mean(&[1.0], 0), vec![None]);
    }

    #[test]
    fn test_forest_features_shape() {
        let closes: Vec<f64> = (0..210).map(|i| 100.0 + i as f64).collect();
        let volumes = vec![1000.0; 210];
        let set = forest_features(&closes, &volumes).unwrap();

        // Rows start where the 200-day average is first defined
        assert_eq!(set.len(), 11);
        assert_eq!(set.targets.len(), 11);
        assert!(set.rows.iter().all(|r| r.len() == 3 && r[2] == 1000.0));

        let first = &set.rows[0];
        let sma_long: f64 = closes[..200].iter().sum::<f64>() / 200.0;
        let sma_short: f64 = closes[150..200].iter().sum::<f64>() / 50.0;
        assert!((first[1] - sma_long).abs() < 1e-9);
        assert!((first[0] - sma_short).abs() < 1e-9);
    }

    #[test]
    fn test_targets_are_next_day_returns() {
        let closes: Vec<f64> = (0..203).map(|i| 100.0 + i as f64).collect();
        let volumes = vec![1.0; 203];
        let set = forest_features(&closes, &volumes).unwrap();

        assert_eq!(set.len(), 4);
        let r200 = closes[200] / closes[199] - 1.0;
        let r201 = closes[201] / closes[200] - 1.0;
        let r202 = closes[202] / closes[201] - 1.0;
        assert!((set.targets[0] - r200).abs() < 1e-12);
        assert!((set.targets[2] - r202).abs() < 1e-12);
        // Last target imputed with the mean of the others
        assert!((set.targets[3] - (r200 + r201 + r202) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_forest_features_preconditions() {
        assert!(matches!(
            forest_features(&[1.0; 200], &[1.0; 200]),
            Err(BacktestError::InsufficientData {
                required: 201,
                actual: 200
            })
        ));
        assert!(matches!(
            forest_features(&[1.0; 3], &[1.0; 2]),
            Err(BacktestError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_select() {
        let set = FeatureSet {
            rows: vec![vec![1.0], vec![2.0], vec![3.0]],
            targets: vec![10.0, 20.0, 30.0],
        };
        let (rows, targets) = set.select(&[2, 0]);
        assert_eq!(rows, vec![vec![3.0], vec![1.0]]);
        assert_eq!(targets, vec![30.0, 10.0]);
    }
}
