//! Price quote types.

use serde::{Deserialize, Serialize};

/// A single price quote (OHLCV bar).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Unix timestamp (seconds)
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Adjusted closing price (accounts for splits/dividends)
    pub adj_close: f64,
    /// Trading volume
    pub volume: u64,
}

impl Quote {
    /// Create a new Quote.
    pub fn new(
        timestamp: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        adj_close: f64,
        volume: u64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            adj_close,
            volume,
        }
    }

    /// Bar date as `YYYY-MM-DD` (UTC).
    pub fn date_string(&self) -> String {
        chrono::DateTime::from_timestamp(self.timestamp, 0)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}
