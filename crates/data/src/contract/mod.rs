//! Data source trait and an in-memory implementation.

use crate::error::{DataError, Result};
use crate::model::{Interval, Quote};
use crate::request::FetchRequest;
use std::collections::HashMap;

/// Trait for data sources that can fetch historical price data.
///
/// Calls block; async callers run them on a blocking thread.
pub trait DataSource: Send + Sync {
    /// Data source name.
    fn name(&self) -> &str;

    /// Fetch historical data synchronously.
    fn fetch_sync(
        &self,
        symbol: &str,
        start_date: &str,
        end_date: &str,
        interval: Interval,
    ) -> Result<Vec<Quote>>;

    /// Fetch the quotes described by a request.
    fn fetch_request(&self, request: &FetchRequest) -> Result<Vec<Quote>> {
        self.fetch_sync(
            &request.symbol,
            &request.start_date,
            &request.end_date,
            request.interval,
        )
    }
}

/// Data source backed by quotes held in memory.
///
/// Quotes are filtered by the requested date range; unknown symbols and
/// empty ranges report [`DataError::NoData`] like a remote provider would.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    series: HashMap<String, Vec<Quote>>,
}

impl InMemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register quotes for a symbol, replacing any previous ones.
    pub fn with_quotes(mut self, symbol: &str, mut quotes: Vec<Quote>) -> Self {
        quotes.sort_by_key(|q| q.timestamp);
        self.series.insert(symbol.to_uppercase(), quotes);
        self
    }

    /// Register a daily series built from closing prices, starting at `start_date`.
    pub fn with_closes(self, symbol: &str, start_date: &str, closes: &[f64]) -> Result<Self> {
        let start = crate::yahoo::parse_date(start_date)?;
        let quotes = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Quote::new(start + i as i64 * 86_400, c, c, c, c, c, 1_000_000))
            .collect();
        Ok(self.with_quotes(symbol, quotes))
    }

    /// Registered symbols.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }
}

impl DataSource for InMemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch_sync(
        &self,
        symbol: &str,
        start_date: &str,
        end_date: &str,
        _interval: Interval,
    ) -> Result<Vec<Quote>> {
        let (start, end) = crate::yahoo::parse_range(start_date, end_date)?;
        let quotes: Vec<Quote> = self
            .series
            .get(&symbol.to_uppercase())
            .ok_or(DataError::NoData)?
            .iter()
            .filter(|q| q.timestamp >= start && q.timestamp < end)
            .cloned()
            .collect();

        if quotes.is_empty() {
            return Err(DataError::NoData);
        }
        Ok(quotes)
    }
}
