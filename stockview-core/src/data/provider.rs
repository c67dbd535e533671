//! Data provider trait and structured error types.
//!
//! The MarketDataProvider trait abstracts over data sources so the analyzer
//! can run against Yahoo Finance in production and an in-memory fixture in tests.

use crate::domain::{InfoRecord, Period, PriceSeries, SeriesError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} for {symbol}")]
    Http { status: u16, symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("invalid price series: {0}")]
    InvalidSeries(#[from] SeriesError),

    #[error("data error: {0}")]
    Other(String),
}

/// Source of price history and descriptive info for a symbol.
///
/// Implementations do no caching and no retrying; every call is an
/// independent fetch.
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Daily bars covering `period`. An unknown symbol may yield an empty series.
    fn history(&self, symbol: &str, period: Period) -> Result<PriceSeries, DataError>;

    /// Descriptive key/value record for `symbol`.
    fn info(&self, symbol: &str) -> Result<InfoRecord, DataError>;
}
