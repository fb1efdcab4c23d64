//! Backtest configuration.

use crate::error::{BacktestError, Result};
use crate::window::WindowPolicy;
use serde::{Deserialize, Serialize};
use tracing::Level;

/// Largest number of forecasts requested per fit.
pub const MAX_HORIZON: usize = 1_000;

/// Rolling-window backtest settings.
///
/// # Example
///
/// ```rust
/// use backtest::{BacktestConfig, WindowPolicy};
///
/// let config = BacktestConfig::new(100, 5, 100)
///     .with_policy(WindowPolicy::Expanding)
///     .with_fit_log_level(None);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Training-window length `T`
    pub train_len: usize,
    /// Forecasts requested per iteration `H`
    pub horizon: usize,
    /// Number of iterations `K`
    pub iterations: usize,
    /// Window movement between iterations
    #[serde(default)]
    pub policy: WindowPolicy,
    /// Level of the per-iteration fit event; `None` keeps fits silent
    #[serde(skip, default = "default_fit_log_level")]
    pub fit_log_level: Option<Level>,
}

fn default_fit_log_level() -> Option<Level> {
    Some(Level::TRACE)
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            train_len: 100,
            horizon: 5,
            iterations: 100,
            policy: WindowPolicy::Fixed,
            fit_log_level: default_fit_log_level(),
        }
    }
}

impl BacktestConfig {
    /// Fixed-window configuration with the given `T`, `H` and `K`.
    pub fn new(train_len: usize, horizon: usize, iterations: usize) -> Self {
        Self {
            train_len,
            horizon,
            iterations,
            ..Self::default()
        }
    }

    /// Expanding-window configuration with the given `T`, `H` and `K`.
    pub fn expanding(train_len: usize, horizon: usize, iterations: usize) -> Self {
        Self::new(train_len, horizon, iterations).with_policy(WindowPolicy::Expanding)
    }

    /// Set the window policy.
    pub fn with_policy(mut self, policy: WindowPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the level of per-iteration fit events.
    pub fn with_fit_log_level(mut self, level: Option<Level>) -> Self {
        self.fit_log_level = level;
        self
    }

    /// Shortest series this configuration can run on (`T + K`).
    pub fn required_len(&self) -> usize {
        self.train_len.saturating_add(self.iterations)
    }

    /// Reject zero lengths and horizons above [`MAX_HORIZON`].
    pub fn validate(&self) -> Result<()> {
        if self.train_len == 0 {
            return Err(BacktestError::InvalidConfig(
                "training window length must be at least 1".to_string(),
            ));
        }
        if self.horizon == 0 {
            return Err(BacktestError::InvalidConfig(
                "horizon must be at least 1".to_string(),
            ));
        }
        if self.horizon > MAX_HORIZON {
            return Err(BacktestError::InvalidConfig(format!(
                "horizon must be at most {}",
                MAX_HORIZON
            )));
        }
        if self.iterations == 0 {
            return Err(BacktestError::InvalidConfig(
                "iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BacktestConfig::default();
        assert_eq!(config.train_len, 100);
        assert_eq!(config.horizon, 5);
        assert_eq!(config.iterations, 100);
        assert_eq!(config.policy, WindowPolicy::Fixed);
        assert_eq!(config.required_len(), 200);
    }

    #[test]
    fn test_validate_rejects_zeroes() {
        assert!(BacktestConfig::new(0, 1, 1).validate().is_err());
        assert!(BacktestConfig::new(1, 0, 1).validate().is_err());
        assert!(BacktestConfig::new(1, 1, 0).validate().is_err());
        assert!(BacktestConfig::new(1, 1, 1).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_oversized_horizon() {
        assert!(BacktestConfig::new(100, MAX_HORIZON, 20).validate().is_ok());
        assert!(matches!(
            BacktestConfig::new(100, MAX_HORIZON + 1, 20).validate(),
            Err(BacktestError::InvalidConfig(_))
        ));
        assert!(BacktestConfig::new(100, 1 << 40, 20).validate().is_err());
    }

    #[test]
    fn test_required_len_saturates() {
        let config = BacktestConfig::new(usize::MAX, 1, 10);
        assert_eq!(config.required_len(), usize::MAX);
    }

    #[test]
    fn test_deserialize_without_policy() {
        let config: BacktestConfig =
            serde_json::from_str(r#"{"train_len":10,"horizon":1,"iterations":3}"#).unwrap();
        assert_eq!(config, BacktestConfig::new(10, 1, 3));
    }
}
