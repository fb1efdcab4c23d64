//! Ordinary least squares trend regression
//!
//! Fits `y = intercept + slope * x`. As a [`Predictor`] the regressor is the
//! position in the window (0, 1, 2, ...); [`LinearRegression::fit_points`]
//! accepts an explicit regressor such as calendar days since the first quote,
//! which keeps irregular trading calendars on a true time axis.

use crate::error::{ensure_finite, Result, TsError};
use crate::Predictor;
use serde::{Deserialize, Serialize};

/// Linear Regression model for time series
///
/// # Example
///
/// ```rust
/// use algorithm::regression::LinearRegression;
/// use algorithm::Predictor;
///
/// let data = vec![10.0, 12.0, 14.0, 16.0, 18.0, 20.0];
/// let mut model = LinearRegression::new();
/// model.fit(&data).unwrap();
///
/// let forecast = model.predict(3).unwrap();
/// assert!((forecast[0] - 22.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinearRegression {
    intercept: f64,
    slope: f64,
    /// Regressor value following the last fitted observation
    next_x: f64,
    r_squared: f64,
    fitted: bool,
}

impl LinearRegression {
    /// Create a new linear regression model
    pub fn new() -> Self {
        Self::default()
    }

    /// Slope (trend per regressor unit)
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Intercept
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// In-sample coefficient of determination
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    /// Fit against an explicit regressor.
    pub fn fit_points(&mut self, x: &[f64], y: &[f64]) -> Result<()> {
        if x.len() != y.len() {
            return Err(TsError::InvalidData(format!(
                "Regressor has {} values but target has {}",
                x.len(),
                y.len()
            )));
        }
        if y.len() < 2 {
            return Err(TsError::InsufficientData {
                required: 2,
                actual: y.len(),
            });
        }
        ensure_finite(x)?;
        ensure_finite(y)?;

        let n = y.len() as f64;
        let mean_x = x.iter().sum::<f64>() / n;
        let mean_y = y.iter().sum::<f64>() / n;

        let sxx: f64 = x.iter().map(|&xi| (xi - mean_x).powi(2)).sum();
        let sxy: f64 = x
            .iter()
            .zip(y)
            .map(|(&xi, &yi)| (xi - mean_x) * (yi - mean_y))
            .sum();

        if sxx.abs() < 1e-10 {
            return Err(TsError::NumericalError(
                "Singular matrix in regression".to_string(),
            ));
        }

        self.slope = sxy / sxx;
        self.intercept = mean_y - self.slope * mean_x;

        let ss_tot: f64 = y.iter().map(|&yi| (yi - mean_y).powi(2)).sum();
        let ss_res: f64 = x
            .iter()
            .zip(y)
            .map(|(&xi, &yi)| (yi - (self.intercept + self.slope * xi)).powi(2))
            .sum();
        self.r_squared = if ss_tot > 1e-10 {
            1.0 - ss_res / ss_tot
        } else {
            1.0
        };

        self.next_x = x.iter().cloned().fold(f64::NEG_INFINITY, f64::max) + 1.0;
        self.fitted = true;
        Ok(())
    }

    /// Predict value at a specific regressor value
    pub fn predict_at(&self, x: f64) -> Result<f64> {
        if !self.fitted {
            return Err(TsError::NotFitted);
        }
        Ok(self.intercept + self.slope * x)
    }

    /// Predict values at several regressor values
    pub fn predict_points(&self, x: &[f64]) -> Result<Vec<f64>> {
        x.iter().map(|&xi| self.predict_at(xi)).collect()
    }
}

impl Predictor for LinearRegression {
    fn fit(&mut self, data: &[f64]) -> Result<()> {
        let x: Vec<f64> = (0..data.len()).map(|i| i as f64).collect();
        self.fit_points(&x, data)
    }

    fn predict(&self, steps: usize) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(TsError::NotFitted);
        }
        Ok((0..steps)
            .map(|i| self.intercept + self.slope * (self.next_x + i as f64))
            .collect())
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}
