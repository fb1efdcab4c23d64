//! Forecasting past the end of a series.

use crate::config::MAX_HORIZON;
use crate::error::{BacktestError, Result};
use algorithm::{Predictor, TsError};

/// Fit `model` once on the last `train_len` points and forecast `horizon` steps.
pub fn project<P: Predictor>(
    series: &[f64],
    train_len: usize,
    horizon: usize,
    mut model: P,
) -> Result<Vec<f64>> {
    if train_len == 0 || horizon == 0 {
        return Err(BacktestError::InvalidConfig(
            "training length and horizon must be at least 1".to_string(),
        ));
    }
    if horizon > MAX_HORIZON {
        return Err(BacktestError::InvalidConfig(format!(
            "horizon must be at most {}",
            MAX_HORIZON
        )));
    }
    if series.len() < train_len {
        return Err(BacktestError::InsufficientData {
            required: train_len,
            actual: series.len(),
        });
    }

    let recent = &series[series.len() - train_len..];
    model.fit(recent)?;
    let mut forecast = model.predict(horizon)?;
    if forecast.len() < horizon {
        return Err(TsError::NumericalError(format!(
            "expected {} forecasts, got {}",
            horizon,
            forecast.len()
        ))
        .into());
    }
    forecast.truncate(horizon);
    tracing::debug!(train_len, horizon, "projected series");
    Ok(forecast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use algorithm::regression::LinearRegression;

    #[test]
    fn test_projection_uses_recent_points() {
        // Flat history followed by a ramp: only the ramp should be fitted
        let mut series = vec![0.0; 50];
        series.extend((0..20).map(|x| 100.0 + x as f64));
        let forecast = project(&series, 20, 3, LinearRegression::new()).unwrap();
        assert_eq!(forecast.len(), 3);
        assert!((forecast[0] - 120.0).abs() < 1e-9);
        assert!((forecast[2] - 122.0).abs() < 1e-9);
    }

    #[test]
    fn test_projection_short_series() {
        let result = project(&[1.0, 2.0], 5, 1, LinearRegression::new());
        assert_eq!(
            result,
            Err(BacktestError::InsufficientData {
                required: 5,
                actual: 2
            })
        );
    }

    #[test]
    fn test_projection_rejects_oversized_horizon() {
        let series: Vec<f64> = (0..20).map(|x| x as f64).collect();
        let result = project(&series, 10, 1 << 40, LinearRegression::new());
        assert!(matches!(result, Err(BacktestError::InvalidConfig(_))));

        let at_limit = project(&series, 10, MAX_HORIZON, LinearRegression::new()).unwrap();
        assert_eq!(at_limit.len(), MAX_HORIZON);
    }

    #[test]
    fn test_projection_zero_horizon() {
        let result = project(&[1.0, 2.0, 3.0], 3, 0, LinearRegression::new());
        assert!(matches!(result, Err(BacktestError::InvalidConfig(_))));
    }
}
