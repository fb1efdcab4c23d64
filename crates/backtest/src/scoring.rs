//! Forecast scoring.

use crate::error::{BacktestError, Result};

fn check_pair(a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        return Err(BacktestError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    if a.is_empty() {
        return Err(BacktestError::EmptyInput);
    }
    Ok(())
}

/// Mean Squared Error
///
/// Average of squared elementwise differences. Symmetric in its arguments.
///
/// # Example
///
/// ```rust
/// use backtest::mean_squared_error;
///
/// let mse = mean_squared_error(&[1.0, 2.0, 3.0], &[1.0, 2.0, 4.0]).unwrap();
/// assert!((mse - 1.0 / 3.0).abs() < 1e-12);
/// ```
pub fn mean_squared_error(a: &[f64], b: &[f64]) -> Result<f64> {
    check_pair(a, b)?;
    let sum: f64 = a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum();
    Ok(sum / a.len() as f64)
}

/// Coefficient of determination of `predicted` against `actual`.
///
/// A constant `actual` scores 1.0 when matched exactly and 0.0 otherwise.
pub fn r_squared(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_tot: f64 = actual.iter().map(|y| (y - mean).powi(2)).sum();
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(y, p)| (y - p).powi(2))
        .sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mse_known_value() {
        let mse = mean_squared_error(&[1.0, 2.0, 3.0], &[1.0, 2.0, 4.0]).unwrap();
        assert!((mse - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_mse_identity_and_symmetry() {
        let a = [3.5, -1.0, 7.25, 0.0];
        let b = [3.0, 1.0, 7.0, -2.0];
        assert_eq!(mean_squared_error(&a, &a).unwrap(), 0.0);
        assert_eq!(
            mean_squared_error(&a, &b).unwrap(),
            mean_squared_error(&b, &a).unwrap()
        );
    }

    #[test]
    fn test_mse_preconditions() {
        assert_eq!(
            mean_squared_error(&[1.0, 2.0], &[1.0]),
            Err(BacktestError::LengthMismatch { left: 2, right: 1 })
        );
        assert_eq!(mean_squared_error(&[], &[]), Err(BacktestError::EmptyInput));
    }

    #[test]
    fn test_r_squared() {
        let actual = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(r_squared(&actual, &actual).unwrap(), 1.0);
        // Predicting the mean scores zero
        assert!(r_squared(&actual, &[2.5; 4]).unwrap().abs() < 1e-12);
        assert!(r_squared(&actual, &[4.0, 3.0, 2.0, 1.0]).unwrap() < 0.0);
    }

    #[test]
    fn test_r_squared_constant_actual() {
        assert_eq!(r_squared(&[2.0, 2.0], &[2.0, 2.0]).unwrap(), 1.0);
        assert_eq!(r_squared(&[2.0, 2.0], &[2.0, 3.0]).unwrap(), 0.0);
        assert_eq!(r_squared(&[], &[]), Err(BacktestError::EmptyInput));
    }
}
