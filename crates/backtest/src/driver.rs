//! Rolling-window backtest driver
//!
//! Every iteration trains a fresh forecaster on one training window, asks it
//! for `H` forecasts and keeps the first as the forecast point for the
//! position right after the window. Forecast points are scored against the
//! observed values `series[T..T+K]`.
//!
//! ```rust
//! use algorithm::regression::LinearRegression;
//! use backtest::{run_backtest, BacktestConfig};
//!
//! let series: Vec<f64> = (1..=120).map(f64::from).collect();
//! let config = BacktestConfig::expanding(100, 1, 20);
//! let result = run_backtest(&series, &config, || Ok(LinearRegression::new())).unwrap();
//!
//! assert_eq!(result.forecasts.len(), 20);
//! assert_eq!(result.expected, series[100..120].to_vec());
//! assert!(result.mse < 1e-12);
//! ```

use crate::config::BacktestConfig;
use crate::error::{BacktestError, Result};
use crate::scoring::mean_squared_error;
use crate::window::Window;
use algorithm::{Predictor, TsError};
use ndarray::Array2;
use serde::Serialize;
use tracing::Level;

/// Every forecast produced by a backtest, one row per iteration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastMatrix {
    values: Array2<f64>,
}

impl ForecastMatrix {
    fn from_rows(rows: Vec<Vec<f64>>, horizon: usize) -> Result<Self> {
        let iterations = rows.len();
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        let values = Array2::from_shape_vec((iterations, horizon), flat)
            .map_err(|e| BacktestError::InvalidConfig(e.to_string()))?;
        Ok(Self { values })
    }

    /// `(iterations, horizon)`
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Forecasts made at one iteration.
    pub fn row(&self, iteration: usize) -> Option<Vec<f64>> {
        (iteration < self.values.nrows()).then(|| self.values.row(iteration).to_vec())
    }

    /// Rows as nested vectors.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.values.outer_iter().map(|row| row.to_vec()).collect()
    }

    /// Underlying matrix.
    pub fn as_array(&self) -> &Array2<f64> {
        &self.values
    }
}

/// Outcome of [`run_backtest`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResult {
    /// First forecast of every iteration
    pub forecasts: Vec<f64>,
    /// Observed values the forecasts are scored against
    pub expected: Vec<f64>,
    /// Mean squared error of `forecasts` against `expected`
    pub mse: f64,
    /// Training window used at every iteration
    pub windows: Vec<Window>,
    /// All `H` forecasts of every iteration
    #[serde(skip)]
    pub matrix: ForecastMatrix,
}

/// Run a rolling-window backtest.
///
/// `factory` builds a fresh forecaster for every iteration. The length guard
/// runs before the factory is ever called, and any construction, fit or
/// predict failure aborts the whole run.
pub fn run_backtest<P, F>(
    series: &[f64],
    config: &BacktestConfig,
    mut factory: F,
) -> Result<BacktestResult>
where
    P: Predictor,
    F: FnMut() -> algorithm::Result<P>,
{
    config.validate()?;
    let required = config.required_len();
    if series.len() < required {
        return Err(BacktestError::InsufficientData {
            required,
            actual: series.len(),
        });
    }

    let (train_len, horizon, iterations) = (config.train_len, config.horizon, config.iterations);
    tracing::debug!(
        train_len,
        horizon,
        iterations,
        policy = ?config.policy,
        "starting backtest"
    );

    let mut forecasts = Vec::with_capacity(iterations);
    let mut rows = Vec::with_capacity(iterations);
    let mut windows = Vec::with_capacity(iterations);

    for iteration in 0..iterations {
        let window = config.policy.window(train_len, iteration);
        let mut model = factory()?;
        model.fit(window.slice(series))?;
        if let Some(level) = config.fit_log_level {
            log_fit(level, iteration, &window);
        }

        let mut row = model.predict(horizon)?;
        if row.len() < horizon {
            return Err(TsError::NumericalError(format!(
                "expected {} forecasts, got {}",
                horizon,
                row.len()
            ))
            .into());
        }
        row.truncate(horizon);

        forecasts.push(row[0]);
        rows.push(row);
        windows.push(window);
    }

    let expected = series[train_len..required].to_vec();
    let mse = mean_squared_error(&forecasts, &expected)?;
    tracing::debug!(iterations, mse, "backtest finished");

    Ok(BacktestResult {
        forecasts,
        expected,
        mse,
        windows,
        matrix: ForecastMatrix::from_rows(rows, horizon)?,
    })
}

fn log_fit(level: Level, iteration: usize, window: &Window) {
    let (start, len) = (window.start, window.len);
    if level == Level::ERROR {
        tracing::error!(iteration, start, len, "fitted forecaster");
    } else if level == Level::WARN {
        tracing::warn!(iteration, start, len, "fitted forecaster");
    } else if level == Level::INFO {
        tracing::info!(iteration, start, len, "fitted forecaster");
    } else if level == Level::DEBUG {
        tracing::debug!(iteration, start, len, "fitted forecaster");
    } else {
        tracing::trace!(iteration, start, len, "fitted forecaster");
    }
}
