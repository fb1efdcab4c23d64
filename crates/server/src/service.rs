//! Forecasting pipelines behind the endpoints
//!
//! Everything here blocks: market data is fetched synchronously and models
//! are fitted on the calling thread. Handlers run these on tokio's blocking
//! pool.

use crate::error::ApiError;
use crate::schema::{
    ArimaRequest, EchoRequest, EchoResponse, ForestResponse, GrabDataRequest, HoldoutResponse,
    MseRequest, StockRequest,
};
use algorithm::ml::{ForestConfig, RandomForest};
use algorithm::regression::{Arima, LinearRegression};
use algorithm::reservoir::{EchoStateNetwork, EsnConfig};
use backtest::features::forest_features;
use backtest::holdout::{shuffled_split, split_index};
use backtest::{mean_squared_error, project, r_squared, run_backtest, BacktestConfig, BacktestError};
use data::{
    adj_closing_prices, closing_prices, day_offsets, volumes, DataSource, FetchRequest, Quote,
};
use tracing::Level;

/// Training-window length of the echo state network backtest and projection
pub const ECHO_TRAIN_LEN: usize = 100;
/// Iterations of the echo state network backtest
pub const ECHO_ITERATIONS: usize = 100;
/// Seed of the random forest and its shuffled holdout
pub const FOREST_SEED: u64 = 42;

fn fetch(source: &dyn DataSource, request: &FetchRequest) -> Result<Vec<Quote>, ApiError> {
    let quotes = source.fetch_request(request)?;
    tracing::debug!(
        source = source.name(),
        symbol = %request.symbol,
        interval = %request.interval,
        count = quotes.len(),
        "fetched series"
    );
    Ok(quotes)
}

fn esn_config(req: &EchoRequest) -> EsnConfig {
    EsnConfig::default()
        .with_reservoir_size(req.reservoir_size)
        .with_spectral_radius(req.spectral_radius)
        .with_noise(req.noise)
}

/// Closing prices of a symbol.
pub fn grab_data(source: &dyn DataSource, req: &GrabDataRequest) -> Result<Vec<f64>, ApiError> {
    let request = FetchRequest::parse(&req.symbol, &req.start_date, &req.end_date, &req.intervals)?;
    let quotes = fetch(source, &request)?;
    Ok(closing_prices(&quotes))
}

/// Fixed-window echo state network backtest over the first
/// `ECHO_TRAIN_LEN + ECHO_ITERATIONS` points.
pub fn run_echo(req: &EchoRequest) -> Result<EchoResponse, ApiError> {
    let config = esn_config(req);
    config.validate()?;

    let backtest = BacktestConfig::new(ECHO_TRAIN_LEN, req.window, ECHO_ITERATIONS)
        .with_fit_log_level(Some(Level::DEBUG));
    let result = run_backtest(&req.data, &backtest, || EchoStateNetwork::new(config.clone()))?;

    tracing::info!(
        reservoir = req.reservoir_size,
        window = req.window,
        mse = result.mse,
        "echo state network backtest"
    );
    Ok(EchoResponse {
        mse: result.mse,
        forecasts: result.matrix.to_rows(),
        predictions: result.forecasts,
    })
}

/// Forecast `window` steps past the end of the series.
pub fn future_pred(req: &EchoRequest) -> Result<Vec<f64>, ApiError> {
    let model = EchoStateNetwork::new(esn_config(req))?;
    let forecast = project(&req.data, ECHO_TRAIN_LEN, req.window, model)?;
    tracing::info!(window = req.window, "echo state network projection");
    Ok(forecast)
}

/// Linear trend over calendar days, scored on the chronological holdout.
pub fn run_linear_regression(
    source: &dyn DataSource,
    req: &StockRequest,
) -> Result<HoldoutResponse, ApiError> {
    let quotes = fetch(source, &req.fetch_request()?)?;
    let days = day_offsets(&quotes);
    let prices = adj_closing_prices(&quotes);

    let split = split_index(prices.len(), req.split_percentage)?;
    let mut model = LinearRegression::new();
    model.fit_points(&days[..split], &prices[..split])?;

    let predictions = model.predict_points(&days[split..])?;
    let expected = prices[split..].to_vec();
    let mse = mean_squared_error(&expected, &predictions)?;

    tracing::info!(
        symbol = %req.stock_symbol,
        train = split,
        test = expected.len(),
        mse,
        "linear regression holdout"
    );
    Ok(HoldoutResponse {
        predictions,
        expected,
        mse,
    })
}

/// One-step ARIMA(5,1,0) forecasts over an expanding window.
pub fn run_arima(source: &dyn DataSource, req: &ArimaRequest) -> Result<HoldoutResponse, ApiError> {
    let quotes = fetch(source, &req.fetch_request()?)?;
    let prices = adj_closing_prices(&quotes);

    let size = split_index(prices.len(), req.split_percentage)?;
    let required = Arima::default().min_observations();
    if size < required {
        return Err(BacktestError::InsufficientData {
            required,
            actual: size,
        }
        .into());
    }

    let config = BacktestConfig::expanding(size, 1, prices.len() - size)
        .with_fit_log_level(Some(Level::DEBUG));
    let result = run_backtest(&prices, &config, || Ok(Arima::default()))?;

    tracing::info!(
        symbol = %req.stock_symbol,
        train = size,
        test = result.forecasts.len(),
        mse = result.mse,
        "arima backtest"
    );
    Ok(HoldoutResponse {
        predictions: result.forecasts,
        expected: result.expected,
        mse: result.mse,
    })
}

/// Random forest on moving-average features predicting next-day returns.
pub fn run_rf(source: &dyn DataSource, req: &StockRequest) -> Result<ForestResponse, ApiError> {
    let quotes = fetch(source, &req.fetch_request()?)?;
    let dataset = forest_features(&adj_closing_prices(&quotes), &volumes(&quotes))?;

    let (train, test) = shuffled_split(dataset.len(), 1.0 - req.split_percentage, FOREST_SEED)?;
    let (train_rows, train_targets) = dataset.select(&train);
    let (test_rows, actual_values) = dataset.select(&test);

    let mut forest = RandomForest::new(ForestConfig {
        seed: FOREST_SEED,
        ..ForestConfig::default()
    })?;
    forest.fit(&train_rows, &train_targets)?;
    let predictions = forest.predict(&test_rows)?;

    let mse = mean_squared_error(&actual_values, &predictions)?;
    let r2 = r_squared(&actual_values, &predictions)?;

    tracing::info!(
        symbol = %req.stock_symbol,
        rows = dataset.len(),
        mse,
        r2,
        "random forest holdout"
    );
    Ok(ForestResponse {
        predictions,
        actual_values,
        mse,
        r2,
    })
}

/// Mean squared error of two lists.
pub fn mse(req: &MseRequest) -> Result<f64, ApiError> {
    Ok(mean_squared_error(&req.prediction, &req.actual)?)
}
