//! Forecasting models for stock price series
//!
//! Every model implements [`Predictor`], the fit/forecast capability the
//! backtest driver is generic over:
//!
//! - [`reservoir`]: Echo state network (reservoir computing)
//! - [`regression`]: ARIMA, ordinary least squares
//! - [`ml`]: Regression trees and random forests over feature rows
//!
//! ## Example
//!
//! ```rust
//! use algorithm::prelude::*;
//!
//! let data: Vec<f64> = (1..=40).map(|x| x as f64).collect();
//! let mut model = Arima::new(1, 1, 0).unwrap();
//! model.fit(&data).unwrap();
//! let forecast = model.predict(3).unwrap();
//! assert_eq!(forecast.len(), 3);
//! ```

mod error;
mod linalg;
pub mod ml;
pub mod regression;
pub mod reservoir;

pub use error::{Result, TsError};

/// Common trait for all time series predictors
///
/// Follows the fit-predict pattern: `fit` consumes a training window and
/// `predict` forecasts the given number of steps past its end.
pub trait Predictor {
    /// Fit the model to historical data
    fn fit(&mut self, data: &[f64]) -> Result<()>;

    /// Predict future values
    fn predict(&self, steps: usize) -> Result<Vec<f64>>;

    /// Check if the model has been fitted
    fn is_fitted(&self) -> bool;
}

impl<P: Predictor + ?Sized> Predictor for Box<P> {
    fn fit(&mut self, data: &[f64]) -> Result<()> {
        (**self).fit(data)
    }

    fn predict(&self, steps: usize) -> Result<Vec<f64>> {
        (**self).predict(steps)
    }

    fn is_fitted(&self) -> bool {
        (**self).is_fitted()
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::Predictor;
    pub use crate::ml::{DecisionTree, ForestConfig, RandomForest, TreeConfig};
    pub use crate::regression::{Arima, LinearRegression};
    pub use crate::reservoir::{EchoStateNetwork, EsnConfig};
    pub use crate::{Result, TsError};
}
