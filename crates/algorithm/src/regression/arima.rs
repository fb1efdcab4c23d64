//! ARIMA (AutoRegressive Integrated Moving Average) forecaster
//!
//! - **AR**: past values of the differenced series, estimated from the
//!   Yule-Walker equations via the Levinson-Durbin recursion
//! - **I**: `d` rounds of differencing, undone level by level on forecast
//! - **MA**: lagged residual terms estimated from residual autocorrelation
//!
//! The mean of the differenced series is kept as a drift term, so a trending
//! price series keeps trending in the forecast.
//!
//! ## Example
//!
//! ```rust
//! use algorithm::regression::Arima;
//! use algorithm::Predictor;
//!
//! let data: Vec<f64> = (1..=50).map(|x| x as f64 + (x as f64 * 0.7).sin()).collect();
//! let mut model = Arima::default();
//! model.fit(&data).unwrap();
//! assert_eq!(model.predict(1).unwrap().len(), 1);
//! ```

use crate::error::{ensure_finite, Result, TsError};
use crate::Predictor;
use serde::{Deserialize, Serialize};

/// Largest AR or MA order accepted
const MAX_ORDER: usize = 10;
/// Largest differencing order accepted
const MAX_DIFFERENCING: usize = 2;

/// `(p, d, q)` order of an ARIMA model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArimaOrder {
    /// AR order
    pub p: usize,
    /// Differencing order
    pub d: usize,
    /// MA order
    pub q: usize,
}

impl Default for ArimaOrder {
    /// The (5, 1, 0) order used for daily closing prices.
    fn default() -> Self {
        Self { p: 5, d: 1, q: 0 }
    }
}

/// ARIMA model for time series forecasting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arima {
    order: ArimaOrder,
    ar_coeffs: Vec<f64>,
    ma_coeffs: Vec<f64>,
    /// Mean of the differenced series
    constant: f64,
    /// Last value of the series at each differencing level, outermost first
    tails: Vec<f64>,
    /// Differenced data
    differenced: Vec<f64>,
    /// In-sample residuals on the differenced scale
    residuals: Vec<f64>,
    fitted: bool,
}

impl Default for Arima {
    fn default() -> Self {
        Self::unchecked(ArimaOrder::default())
    }
}

impl Arima {
    /// Create a new unfitted ARIMA(p, d, q) model
    ///
    /// # Arguments
    ///
    /// * `p` - Order of autoregressive component (0-10)
    /// * `d` - Degree of differencing (0-2)
    /// * `q` - Order of moving average component (0-10)
    pub fn new(p: usize, d: usize, q: usize) -> Result<Self> {
        Self::with_order(ArimaOrder { p, d, q })
    }

    /// Create a new unfitted model from an order triple
    pub fn with_order(order: ArimaOrder) -> Result<Self> {
        if order.p > MAX_ORDER {
            return Err(TsError::invalid_parameter("p", "AR order must be <= 10"));
        }
        if order.d > MAX_DIFFERENCING {
            return Err(TsError::invalid_parameter(
                "d",
                "Differencing order must be <= 2",
            ));
        }
        if order.q > MAX_ORDER {
            return Err(TsError::invalid_parameter("q", "MA order must be <= 10"));
        }
        Ok(Self::unchecked(order))
    }

    fn unchecked(order: ArimaOrder) -> Self {
        Self {
            order,
            ar_coeffs: vec![0.0; order.p],
            ma_coeffs: vec![0.0; order.q],
            constant: 0.0,
            tails: Vec::new(),
            differenced: Vec::new(),
            residuals: Vec::new(),
            fitted: false,
        }
    }

    /// Model order
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// AR coefficients
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coeffs
    }

    /// MA coefficients
    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coeffs
    }

    /// Minimum number of observations `fit` accepts
    pub fn min_observations(&self) -> usize {
        self.order.p + self.order.d + self.order.q + 10
    }

    /// Difference `d` times, remembering the last value of every level.
    fn difference(data: &[f64], order: usize) -> (Vec<f64>, Vec<f64>) {
        let mut tails = Vec::with_capacity(order);
        let mut current = data.to_vec();
        for _ in 0..order {
            tails.push(*current.last().unwrap_or(&0.0));
            current = current.windows(2).map(|w| w[1] - w[0]).collect();
        }
        (current, tails)
    }

    /// Integrate differenced-scale forecasts back to the original scale.
    fn undifference(&self, forecasts: &[f64]) -> Vec<f64> {
        let mut result = forecasts.to_vec();
        for &tail in self.tails.iter().rev() {
            let mut level = tail;
            for value in result.iter_mut() {
                level += *value;
                *value = level;
            }
        }
        result
    }

    /// Yule-Walker AR estimate via Levinson-Durbin.
    fn estimate_ar_coefficients(&self, centered: &[f64]) -> Vec<f64> {
        let p = self.order.p;
        if p == 0 {
            return Vec::new();
        }

        let n = centered.len();
        let autocov: Vec<f64> = (0..=p)
            .map(|k| {
                (k..n).map(|i| centered[i] * centered[i - k]).sum::<f64>() / n as f64
            })
            .collect();

        let mut phi = vec![0.0; p];
        let mut error = autocov[0];
        if error.abs() < 1e-12 {
            return phi;
        }

        for k in 0..p {
            let mut acc = autocov[k + 1];
            for j in 0..k {
                acc -= phi[j] * autocov[k - j];
            }
            let reflection = acc / error;
            let previous = phi.clone();
            phi[k] = reflection;
            for j in 0..k {
                phi[j] = previous[j] - reflection * previous[k - 1 - j];
            }
            error *= 1.0 - reflection * reflection;
            if error <= 1e-12 {
                break;
            }
        }

        phi
    }

    /// MA coefficients from the residual autocorrelation, clamped for invertibility.
    fn estimate_ma_coefficients(&self, residuals: &[f64]) -> Vec<f64> {
        let q = self.order.q;
        if q == 0 || residuals.is_empty() {
            return vec![0.0; q];
        }

        let n = residuals.len();
        let mean = residuals.iter().sum::<f64>() / n as f64;
        let centered: Vec<f64> = residuals.iter().map(|x| x - mean).collect();
        let variance = centered.iter().map(|x| x * x).sum::<f64>() / n as f64;
        if variance.abs() < 1e-12 {
            return vec![0.0; q];
        }

        (0..q)
            .map(|k| {
                let cov = ((k + 1)..n)
                    .map(|i| centered[i] * centered[i - k - 1])
                    .sum::<f64>()
                    / n as f64;
                (cov / variance).clamp(-0.99, 0.99)
            })
            .collect()
    }
}

impl Predictor for Arima {
    fn fit(&mut self, data: &[f64]) -> Result<()> {
        let required = self.min_observations();
        if data.len() < required {
            return Err(TsError::InsufficientData {
                required,
                actual: data.len(),
            });
        }
        ensure_finite(data)?;

        let (differenced, tails) = Self::difference(data, self.order.d);
        let n = differenced.len();
        self.constant = differenced.iter().sum::<f64>() / n as f64;

        let centered: Vec<f64> = differenced.iter().map(|x| x - self.constant).collect();
        self.ar_coeffs = self.estimate_ar_coefficients(&centered);

        let p = self.order.p;
        let mut residuals = vec![0.0; n];
        for i in p..n {
            let fitted: f64 = (0..p).map(|j| self.ar_coeffs[j] * centered[i - j - 1]).sum();
            residuals[i] = centered[i] - fitted;
        }
        self.ma_coeffs = self.estimate_ma_coefficients(&residuals[p..]);

        self.differenced = differenced;
        self.residuals = residuals;
        self.tails = tails;
        self.fitted = true;
        Ok(())
    }

    fn predict(&self, steps: usize) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(TsError::NotFitted);
        }
        if steps == 0 {
            return Ok(Vec::new());
        }

        let n = self.differenced.len();
        let mut extended: Vec<f64> = self
            .differenced
            .iter()
            .map(|x| x - self.constant)
            .collect();
        let mut shocks = self.residuals.clone();

        for _ in 0..steps {
            let len = extended.len();
            let ar: f64 = (0..self.order.p)
                .map(|j| self.ar_coeffs[j] * extended[len - j - 1])
                .sum();
            let ma: f64 = (0..self.order.q)
                .filter(|&j| shocks.len() > j)
                .map(|j| self.ma_coeffs[j] * shocks[shocks.len() - j - 1])
                .sum();
            extended.push(ar + ma);
            // Future shocks have zero expectation
            shocks.push(0.0);
        }

        let forecasts: Vec<f64> = extended[n..].iter().map(|x| x + self.constant).collect();
        Ok(self.undifference(&forecasts))
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}
