//! stockview core: market data domain types, provider, and display transforms.
//!
//! This crate turns a ticker's daily price history and descriptive info
//! record into four shapes:
//! - a chart payload of parallel date/price/volume series
//! - a most-recent-first table of the last 30 sessions with daily change
//! - a CSV export of the full series with derived change columns
//! - a fully populated metrics summary of formatted display strings
//!
//! Data comes from a [`data::MarketDataProvider`]; [`data::YahooProvider`]
//! is the production implementation.

pub mod analyzer;
pub mod config;
pub mod data;
pub mod domain;
pub mod format;
pub mod logging;
pub mod transform;

pub use analyzer::{csv_filename, Analysis, AnalyzeError, CsvExport, StockAnalyzer};
pub use config::{AppConfig, ConfigError, ProviderConfig};
pub use data::{DataError, MarketDataProvider, YahooProvider};
pub use domain::{InfoRecord, InfoValue, Period, PriceBar, PriceSeries};
pub use transform::{
    ChartPayload, CsvRow, CsvTable, MetricsSummary, Outcome, TableRow, TransformError,
    Transformer,
};
