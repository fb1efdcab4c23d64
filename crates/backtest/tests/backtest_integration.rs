//! Backtests over the real forecasters

use algorithm::prelude::*;
use backtest::holdout::split_index;
use backtest::{
    mean_squared_error, project, run_backtest, BacktestConfig, BacktestError, WindowPolicy,
};

fn ramp(n: usize) -> Vec<f64> {
    (1..=n).map(|x| x as f64).collect()
}

#[test]
fn test_ramp_scored_against_following_points() {
    let series = ramp(120);
    let config = BacktestConfig::expanding(100, 1, 20);
    let result = run_backtest(&series, &config, || Ok(LinearRegression::new())).unwrap();

    assert_eq!(result.forecasts.len(), 20);
    assert_eq!(result.expected, series[100..120].to_vec());
    assert!(result.mse >= 0.0);
    assert!(result.mse < 1e-12);
    assert_eq!(result.windows.last().map(|w| w.len), Some(119));
}

#[test]
fn test_fixed_window_ramp_scored_against_following_points() {
    let series = ramp(120);
    let config = BacktestConfig::new(100, 1, 20);
    let result = run_backtest(&series, &config, || Ok(LinearRegression::new())).unwrap();

    assert_eq!(result.forecasts.len(), 20);
    assert_eq!(result.expected, series[100..120].to_vec());
    assert!(result.mse < 1e-12);
    assert!(result.windows.iter().all(|w| w.len == 100));
    assert_eq!(result.windows.last().map(|w| w.start), Some(19));
}

#[test]
fn test_multi_step_horizon_needs_only_train_plus_iterations() {
    // Only the first forecast of each row is scored, so H adds no length
    let series = ramp(120);
    for policy in [WindowPolicy::Fixed, WindowPolicy::Expanding] {
        let config = BacktestConfig::new(100, 5, 20).with_policy(policy);
        assert_eq!(config.required_len(), series.len());

        let result = run_backtest(&series, &config, || Ok(LinearRegression::new())).unwrap();
        assert_eq!(result.forecasts.len(), 20);
        assert_eq!(result.matrix.shape(), (20, 5));
        assert_eq!(result.expected, series[100..120].to_vec());
        // Last row runs past the end of the series
        let last = result.matrix.row(19).unwrap();
        assert!((last[4] - 124.0).abs() < 1e-9);
    }

    let short = run_backtest(&ramp(119), &BacktestConfig::new(100, 5, 20), || {
        Ok(LinearRegression::new())
    });
    assert_eq!(
        short.unwrap_err(),
        BacktestError::InsufficientData {
            required: 120,
            actual: 119
        }
    );
}

#[test]
fn test_arima_expanding_on_trend() {
    let series: Vec<f64> = (0..80).map(|x| 50.0 + 0.5 * x as f64).collect();
    let size = split_index(series.len(), 0.66).unwrap();
    let config = BacktestConfig::expanding(size, 1, series.len() - size);

    let result = run_backtest(&series, &config, || Ok(Arima::default())).unwrap();
    assert_eq!(result.forecasts.len(), series.len() - size);
    assert_eq!(result.expected, series[size..].to_vec());
    assert!(result.mse < 1e-9);
}

#[test]
fn test_esn_fixed_window_shapes() {
    let series: Vec<f64> = (0..60).map(|i| 10.0 + (i as f64 * 0.3).sin()).collect();
    let esn_config = EsnConfig::default()
        .with_reservoir_size(30)
        .with_spectral_radius(0.9);
    let config = BacktestConfig::new(40, 3, 20).with_policy(WindowPolicy::Fixed);

    let result = run_backtest(&series, &config, || {
        EchoStateNetwork::new(esn_config.clone())
    })
    .unwrap();

    assert_eq!(result.matrix.shape(), (20, 3));
    assert!(result.windows.iter().all(|w| w.len == 40));
    assert!(result.forecasts.iter().all(|f| f.is_finite()));
    let rescored = mean_squared_error(&result.forecasts, &result.expected).unwrap();
    assert_eq!(rescored, result.mse);
}

#[test]
fn test_identical_seeds_give_identical_backtests() {
    let series: Vec<f64> = (0..50).map(|i| 5.0 + (i as f64 * 0.2).cos()).collect();
    let esn_config = EsnConfig::default().with_reservoir_size(20);
    let config = BacktestConfig::new(30, 2, 10).with_fit_log_level(None);

    let run = || {
        run_backtest(&series, &config, || EchoStateNetwork::new(esn_config.clone())).unwrap()
    };
    assert_eq!(run().forecasts, run().forecasts);
}

#[test]
fn test_insufficient_series() {
    let config = BacktestConfig::new(100, 1, 10);
    let result = run_backtest(&ramp(50), &config, || Ok(Arima::default()));
    assert_eq!(
        result,
        Err(BacktestError::InsufficientData {
            required: 110,
            actual: 50
        })
    );
}

#[test]
fn test_project_with_esn() {
    let series: Vec<f64> = (0..150).map(|i| 20.0 + (i as f64 * 0.1).sin()).collect();
    let model = EchoStateNetwork::new(EsnConfig::default().with_reservoir_size(40)).unwrap();
    let forecast = project(&series, 100, 5, model).unwrap();
    assert_eq!(forecast.len(), 5);
    assert!(forecast.iter().all(|f| f.is_finite()));
}
