//! Market data acquisition.

pub mod provider;
pub mod yahoo;

pub use provider::{DataError, MarketDataProvider};
pub use yahoo::YahooProvider;
