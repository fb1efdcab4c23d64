//! Price data model types.

mod interval;
mod quote;
mod utils;

pub use interval::Interval;
pub use quote::Quote;
pub use utils::{adj_closing_prices, closing_prices, daily_returns, day_offsets, volumes};
