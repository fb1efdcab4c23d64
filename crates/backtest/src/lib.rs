//! Rolling-window backtesting for price forecasters
//!
//! - [`run_backtest`] - retrain on a fixed or expanding window and collect forecasts
//! - [`mean_squared_error`], [`r_squared`] - scoring
//! - [`project`] - forecast past the end of a series
//! - [`holdout`] - chronological and seeded random splits
//! - [`features`] - next-day return dataset for tree ensembles

pub mod config;
pub mod driver;
pub mod error;
pub mod features;
pub mod holdout;
pub mod projection;
pub mod scoring;
pub mod window;

pub use config::{BacktestConfig, MAX_HORIZON};
pub use driver::{run_backtest, BacktestResult, ForecastMatrix};
pub use error::{BacktestError, Result};
pub use projection::project;
pub use scoring::{mean_squared_error, r_squared};
pub use window::{Window, WindowPolicy};
