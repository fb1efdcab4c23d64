//! Backtest error types.

use algorithm::TsError;
use thiserror::Error;

/// Errors raised while backtesting, scoring or projecting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BacktestError {
    /// Series shorter than the configuration needs
    #[error("Insufficient data: required {required}, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Compared sequences differ in length
    #[error("Length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// Nothing to score
    #[error("Empty input")]
    EmptyInput,

    /// Configuration rejected before any work was done
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A forecaster failed to construct, fit or predict
    #[error("Model fit failed: {0}")]
    ModelFit(#[from] TsError),
}

/// Result type for backtest operations.
pub type Result<T> = std::result::Result<T, BacktestError>;
