//! Request and response bodies.

use data::{DataError, FetchRequest};
use serde::{Deserialize, Serialize};

fn default_reservoir_size() -> usize {
    500
}

fn default_spectral_radius() -> f64 {
    1.2
}

fn default_noise() -> f64 {
    0.005
}

fn default_window() -> usize {
    5
}

fn default_arima_split() -> f64 {
    0.66
}

/// `POST /grab_data`
#[derive(Debug, Clone, Deserialize)]
pub struct GrabDataRequest {
    pub symbol: String,
    pub start_date: String,
    pub end_date: String,
    /// Interval code such as `1d`
    pub intervals: String,
}

/// A list of values under `result`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesResponse {
    pub result: Vec<f64>,
}

/// `POST /run_echo` and `POST /future_pred`
#[derive(Debug, Clone, Deserialize)]
pub struct EchoRequest {
    /// Price series, oldest first
    pub data: Vec<f64>,
    #[serde(default = "default_reservoir_size")]
    pub reservoir_size: usize,
    #[serde(default = "default_spectral_radius")]
    pub spectral_radius: f64,
    #[serde(default = "default_noise")]
    pub noise: f64,
    /// Forecast horizon
    #[serde(default = "default_window")]
    pub window: usize,
}

/// Echo state network backtest outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EchoResponse {
    pub mse: f64,
    /// First forecast of every iteration
    pub predictions: Vec<f64>,
    /// Every forecast of every iteration
    pub forecasts: Vec<Vec<f64>>,
}

/// Holdout evaluation over a fetched series.
#[derive(Debug, Clone, Deserialize)]
pub struct StockRequest {
    pub stock_symbol: String,
    pub start_date: String,
    pub end_date: String,
    pub interval: String,
    /// Share of the series used for training
    pub split_percentage: f64,
}

impl StockRequest {
    /// Series this request evaluates on.
    pub fn fetch_request(&self) -> Result<FetchRequest, DataError> {
        FetchRequest::parse(&self.stock_symbol, &self.start_date, &self.end_date, &self.interval)
    }
}

/// `POST /run_arima`; the split defaults to 0.66.
#[derive(Debug, Clone, Deserialize)]
pub struct ArimaRequest {
    pub stock_symbol: String,
    pub start_date: String,
    pub end_date: String,
    pub interval: String,
    #[serde(default = "default_arima_split")]
    pub split_percentage: f64,
}

impl ArimaRequest {
    /// Series this request evaluates on.
    pub fn fetch_request(&self) -> Result<FetchRequest, DataError> {
        FetchRequest::parse(&self.stock_symbol, &self.start_date, &self.end_date, &self.interval)
    }
}

/// Predictions scored against the held-out segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldoutResponse {
    pub predictions: Vec<f64>,
    pub expected: Vec<f64>,
    pub mse: f64,
}

/// Random forest evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestResponse {
    pub predictions: Vec<f64>,
    pub actual_values: Vec<f64>,
    pub mse: f64,
    pub r2: f64,
}

/// `POST /mse`
#[derive(Debug, Clone, Deserialize)]
pub struct MseRequest {
    pub prediction: Vec<f64>,
    pub actual: Vec<f64>,
}

/// A single number under `result`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalarResponse {
    pub result: f64,
}
