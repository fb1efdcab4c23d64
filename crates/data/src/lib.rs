//! Market data for price-series forecasting
//!
//! - [`DataSource`] - blocking provider contract
//! - [`YahooFinance`] - Yahoo Finance chart API client
//! - [`InMemorySource`] - quotes held in memory (tests, offline runs)
//! - helpers to turn quotes into series ([`closing_prices`], [`day_offsets`], ...)

pub mod contract;
pub mod error;
pub mod model;
pub mod request;
pub mod yahoo;

pub use contract::{DataSource, InMemorySource};
pub use error::{DataError, Result};
pub use model::{
    adj_closing_prices, closing_prices, daily_returns, day_offsets, volumes, Interval, Quote,
};
pub use request::FetchRequest;
pub use yahoo::{parse_date, YahooConfig, YahooFinance, DEFAULT_BASE_URL};
