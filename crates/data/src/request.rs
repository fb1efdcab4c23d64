//! Fetch request description.

use crate::error::Result;
use crate::model::Interval;
use serde::{Deserialize, Serialize};

/// What to fetch from a data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Stock symbol (e.g., "AAPL", "MSFT")
    pub symbol: String,
    /// Start date in YYYY-MM-DD format
    pub start_date: String,
    /// End date in YYYY-MM-DD format (exclusive)
    pub end_date: String,
    /// Time interval for bars
    #[serde(default)]
    pub interval: Interval,
}

impl FetchRequest {
    /// Create a new fetch request.
    pub fn new(symbol: &str, start_date: &str, end_date: &str, interval: Interval) -> Self {
        Self {
            symbol: symbol.to_string(),
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
            interval,
        }
    }

    /// Create a request from an interval code such as `1d` or `1wk`.
    pub fn parse(symbol: &str, start_date: &str, end_date: &str, interval: &str) -> Result<Self> {
        Ok(Self::new(symbol, start_date, end_date, interval.parse()?))
    }

    /// Create a daily fetch request.
    pub fn daily(symbol: &str, start_date: &str, end_date: &str) -> Self {
        Self::new(symbol, start_date, end_date, Interval::Daily)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_defaults_to_daily() {
        let request: FetchRequest = serde_json::from_str(
            r#"{"symbol":"AAPL","start_date":"2024-01-01","end_date":"2024-02-01"}"#,
        )
        .unwrap();
        assert_eq!(request, FetchRequest::daily("AAPL", "2024-01-01", "2024-02-01"));
    }

    #[test]
    fn test_parse_interval_code() {
        let request = FetchRequest::parse("MSFT", "2024-01-01", "2024-06-01", "1wk").unwrap();
        assert_eq!(request.interval, Interval::Weekly);
        assert_eq!(
            FetchRequest::parse("MSFT", "2024-01-01", "2024-06-01", "2d"),
            Err(crate::error::DataError::InvalidInterval("2d".to_string()))
        );
    }
}
