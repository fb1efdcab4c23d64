//! Yahoo Finance chart API client
//!
//! # Example
//!
//! ```rust,no_run
//! use data::{closing_prices, DataSource, Interval, YahooFinance};
//!
//! let quotes = YahooFinance::new()
//!     .fetch_sync("AAPL", "2024-01-01", "2024-12-01", Interval::Daily)
//!     .unwrap();
//! println!("Got {} price points", closing_prices(&quotes).len());
//! ```

use crate::contract::DataSource;
use crate::error::{DataError, Result};
use crate::model::{Interval, Quote};
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

/// Default chart endpoint.
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Error code Yahoo reports for unknown symbols.
const NOT_FOUND_CODE: &str = "Not Found";

/// Yahoo Finance API response structures
#[derive(Debug, Deserialize)]
struct YahooResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjClose>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    adjclose: Vec<Option<f64>>,
}

/// Client settings.
#[derive(Debug, Clone)]
pub struct YahooConfig {
    /// Chart endpoint, without trailing slash
    pub base_url: String,
    /// User agent sent with every request
    pub user_agent: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Yahoo Finance client
#[derive(Debug, Clone, Default)]
pub struct YahooFinance {
    config: YahooConfig,
}

impl YahooFinance {
    /// Create a client against the public endpoint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client with explicit settings.
    pub fn with_config(config: YahooConfig) -> Self {
        Self { config }
    }

    /// Point the client at another chart endpoint.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Client settings.
    pub fn config(&self) -> &YahooConfig {
        &self.config
    }

    fn build_url(&self, symbol: &str, start: i64, end: i64, interval: Interval) -> String {
        format!(
            "{}/{}?period1={}&period2={}&interval={}",
            self.config.base_url,
            symbol,
            start,
            end,
            interval.code()
        )
    }

    /// Parse a chart API body into quotes.
    ///
    /// Rows missing any OHLCV field are skipped; a missing adjusted close
    /// falls back to the close.
    pub fn parse_response(&self, json: &str) -> Result<Vec<Quote>> {
        let response: YahooResponse =
            serde_json::from_str(json).map_err(|e| DataError::ParseError(e.to_string()))?;

        if let Some(error) = response.chart.error {
            if error.code == NOT_FOUND_CODE {
                return Err(DataError::NoData);
            }
            return Err(DataError::ApiError {
                code: error.code,
                description: error.description,
            });
        }

        let results = response.chart.result.ok_or(DataError::NoData)?;
        let data = results.first().ok_or(DataError::NoData)?;

        let quote_data = data.indicators.quote.first().ok_or(DataError::NoData)?;
        let adj_close_data = data.indicators.adjclose.as_ref().and_then(|a| a.first());

        let quotes: Vec<Quote> = data
            .timestamp
            .iter()
            .enumerate()
            .filter_map(|(i, &timestamp)| {
                let open = quote_data.open.get(i).copied().flatten()?;
                let high = quote_data.high.get(i).copied().flatten()?;
                let low = quote_data.low.get(i).copied().flatten()?;
                let close = quote_data.close.get(i).copied().flatten()?;
                let volume = quote_data.volume.get(i).copied().flatten()?;
                let adj_close = adj_close_data
                    .and_then(|a| a.adjclose.get(i).copied().flatten())
                    .unwrap_or(close);
                Some(Quote::new(timestamp, open, high, low, close, adj_close, volume))
            })
            .collect();

        if quotes.is_empty() {
            return Err(DataError::NoData);
        }

        Ok(quotes)
    }
}

impl DataSource for YahooFinance {
    fn name(&self) -> &str {
        "yahoo"
    }

    fn fetch_sync(
        &self,
        symbol: &str,
        start_date: &str,
        end_date: &str,
        interval: Interval,
    ) -> Result<Vec<Quote>> {
        let (start, end) = parse_range(start_date, end_date)?;
        let url = self.build_url(symbol, start, end, interval);
        tracing::debug!(%symbol, %interval, %url, "fetching quotes");

        let client = reqwest::blocking::Client::builder()
            .user_agent(self.config.user_agent.as_str())
            .timeout(self.config.timeout)
            .build()
            .map_err(|e| DataError::RequestFailed(e.to_string()))?;

        let response = client
            .get(&url)
            .send()
            .map_err(|e| DataError::RequestFailed(e.to_string()))?;

        let text = response
            .text()
            .map_err(|e| DataError::RequestFailed(e.to_string()))?;

        let quotes = self.parse_response(&text)?;
        tracing::debug!(%symbol, count = quotes.len(), "fetched quotes");
        Ok(quotes)
    }
}

/// Parse a `YYYY-MM-DD` date to a Unix timestamp at UTC midnight.
pub fn parse_date(date: &str) -> Result<i64> {
    let parsed = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| DataError::InvalidDate(format!("{date}: {e}")))?;
    let midnight = parsed
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| DataError::InvalidDate(date.to_string()))?;
    Ok(midnight.and_utc().timestamp())
}

/// Parse a date range; the end must come after the start.
pub fn parse_range(start_date: &str, end_date: &str) -> Result<(i64, i64)> {
    let start = parse_date(start_date)?;
    let end = parse_date(end_date)?;
    if end <= start {
        return Err(DataError::InvalidDate(format!(
            "end date {end_date} must be after start date {start_date}"
        )));
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_valid() {
        assert_eq!(parse_date("2024-01-01").unwrap(), 1704067200);
        assert!(parse_date("2024-06-15").unwrap() > 1704067200);
    }

    #[test]
    fn test_parse_date_leap_year() {
        let feb28 = parse_date("2024-02-28").unwrap();
        let feb29 = parse_date("2024-02-29").unwrap();
        let mar01 = parse_date("2024-03-01").unwrap();

        assert_eq!(feb29 - feb28, 86400);
        assert_eq!(mar01 - feb29, 86400);
        assert!(parse_date("2023-02-29").is_err());
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date("2024/01/01").is_err());
        assert!(parse_date("2024").is_err());
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("abcd-01-01").is_err());
    }

    #[test]
    fn test_parse_range_order() {
        assert!(parse_range("2024-01-01", "2024-02-01").is_ok());
        assert!(matches!(
            parse_range("2024-02-01", "2024-01-01"),
            Err(DataError::InvalidDate(_))
        ));
        assert!(parse_range("2024-01-01", "2024-01-01").is_err());
    }

    #[test]
    fn test_build_url() {
        let client = YahooFinance::new();
        let url = client.build_url("AAPL", 1704067200, 1733011200, Interval::Weekly);
        assert_eq!(
            url,
            "https://query1.finance.yahoo.com/v8/finance/chart/AAPL?period1=1704067200&period2=1733011200&interval=1wk"
        );
    }

    #[test]
    fn test_custom_base_url() {
        let client = YahooFinance::new().with_base_url("http://localhost:9000/chart/");
        let url = client.build_url("BRK.B", 0, 100, Interval::Daily);
        assert!(url.starts_with("http://localhost:9000/chart/BRK.B?"));
    }

    #[test]
    fn test_parse_response_valid() {
        let client = YahooFinance::new();
        let json = r#"{"chart":{"result":[{"timestamp":[1704067200,1704153600,1704240000],"indicators":{"quote":[{"open":[185.0,186.0,187.0],"high":[186.0,187.0,188.0],"low":[184.0,185.0,186.0],"close":[185.5,186.5,187.5],"volume":[1000000,1100000,1200000]}],"adjclose":[{"adjclose":[185.2,186.2,187.2]}]}}],"error":null}}"#;
        let quotes = client.parse_response(json).unwrap();
        assert_eq!(quotes.len(), 3);
        assert_eq!(quotes[0].close, 185.5);
        assert_eq!(quotes[0].adj_close, 185.2);
    }

    #[test]
    fn test_parse_response_skips_nulls() {
        let client = YahooFinance::new();
        let json = r#"{"chart":{"result":[{"timestamp":[1704067200,1704153600,1704240000],"indicators":{"quote":[{"open":[185.0,null,187.0],"high":[186.0,null,188.0],"low":[184.0,null,186.0],"close":[185.5,null,187.5],"volume":[1000000,null,1200000]}]}}],"error":null}}"#;
        let quotes = client.parse_response(json).unwrap();
        assert_eq!(quotes.len(), 2);
        // No adjclose block: adjusted close falls back to close
        assert_eq!(quotes[1].adj_close, 187.5);
    }

    #[test]
    fn test_parse_response_not_found_is_no_data() {
        let client = YahooFinance::new();
        let json = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert_eq!(client.parse_response(json), Err(DataError::NoData));
    }

    #[test]
    fn test_parse_response_api_error() {
        let client = YahooFinance::new();
        let json = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid input - interval=2d is not supported"}}}"#;
        assert!(matches!(
            client.parse_response(json),
            Err(DataError::ApiError { .. })
        ));
    }

    #[test]
    fn test_parse_response_no_data() {
        let client = YahooFinance::new();
        let json = r#"{"chart":{"result":[],"error":null}}"#;
        assert_eq!(client.parse_response(json), Err(DataError::NoData));
    }

    #[test]
    fn test_parse_response_invalid_json() {
        let client = YahooFinance::new();
        assert!(matches!(
            client.parse_response("not json"),
            Err(DataError::ParseError(_))
        ));
    }

    #[test]
    fn test_invalid_date_fails_before_request() {
        // Unroutable base URL: the date check must fail first
        let client = YahooFinance::new().with_base_url("http://127.0.0.1:1");
        assert!(matches!(
            client.fetch_sync("AAPL", "01/01/2024", "2024-02-01", Interval::Daily),
            Err(DataError::InvalidDate(_))
        ));
    }
}
