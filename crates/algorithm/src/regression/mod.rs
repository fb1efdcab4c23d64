//! Regression and statistical models for time series forecasting
//!
//! - **ARIMA**: AutoRegressive Integrated Moving Average
//! - **Linear Regression**: least squares trend over time

pub mod arima;
pub mod linear;

pub use arima::{Arima, ArimaOrder};
pub use linear::LinearRegression;
