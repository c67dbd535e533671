//! Market data transformer: provider data into chart, table, CSV and metrics shapes.
//!
//! Every operation is total: a failure while shaping output is logged inside
//! the transformer's span and degrades to a well-formed placeholder value.
//! [`Outcome`] keeps the distinction between "legitimately empty" and
//! "failed and defaulted" visible to callers and tests.

pub mod chart;
pub mod export;
pub mod metrics;
pub mod table;

pub use chart::ChartPayload;
pub use export::{CsvRow, CsvTable};
pub use metrics::MetricsSummary;
pub use table::TableRow;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::Span;

/// Number of most recent bars shown in the table.
pub const TABLE_WINDOW: usize = 30;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransformError {
    #[error("non-finite {field} price on {date}")]
    NonFinite { date: NaiveDate, field: &'static str },

    #[error("info record unavailable: {0}")]
    InfoUnavailable(String),

    #[error("csv serialization failed: {0}")]
    Serialize(String),
}

/// Result of a transformer operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The transform ran to completion (the value may still be empty).
    Computed(T),
    /// The transform failed; `value` is the placeholder handed to the caller.
    Fallback { value: T, error: TransformError },
}

impl<T> Outcome<T> {
    pub fn value(&self) -> &T {
        match self {
            Outcome::Computed(v) | Outcome::Fallback { value: v, .. } => v,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Outcome::Computed(v) | Outcome::Fallback { value: v, .. } => v,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Outcome::Fallback { .. })
    }

    pub fn error(&self) -> Option<&TransformError> {
        match self {
            Outcome::Computed(_) => None,
            Outcome::Fallback { error, .. } => Some(error),
        }
    }
}

/// Stateless apart from the logging span it reports failures under.
#[derive(Debug, Clone)]
pub struct Transformer {
    span: Span,
    symbol: Option<String>,
    table_window: usize,
}

impl Transformer {
    pub fn new(span: Span) -> Self {
        Self {
            span,
            symbol: None,
            table_window: TABLE_WINDOW,
        }
    }

    /// A copy whose failures are reported for `symbol`, under a child span.
    pub fn for_symbol(&self, symbol: &str) -> Self {
        Self {
            span: tracing::info_span!(parent: &self.span, "request", symbol),
            symbol: Some(symbol.to_string()),
            table_window: self.table_window,
        }
    }

    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    pub fn with_table_window(mut self, window: usize) -> Self {
        self.table_window = window;
        self
    }

    pub fn table_window(&self) -> usize {
        self.table_window
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    fn settle<T>(
        &self,
        operation: &'static str,
        symbol: Option<&str>,
        result: Result<T, TransformError>,
        placeholder: impl FnOnce() -> T,
    ) -> Outcome<T> {
        match result {
            Ok(value) => Outcome::Computed(value),
            Err(error) => {
                let _entered = self.span.enter();
                tracing::error!(
                    operation,
                    symbol = symbol.or(self.symbol.as_deref()).unwrap_or("-"),
                    %error,
                    "transform failed, returning placeholder"
                );
                Outcome::Fallback {
                    value: placeholder(),
                    error,
                }
            }
        }
    }
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new(tracing::info_span!("transformer"))
    }
}

/// Round half away from zero to two decimal places.
pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Percent move from open to close, `None` when open is zero.
pub(crate) fn percent_change(open: f64, close: f64) -> Option<f64> {
    if open == 0.0 {
        None
    } else {
        Some(round2((close - open) / open * 100.0))
    }
}

pub(crate) fn check_finite(bar: &crate::domain::PriceBar) -> Result<(), TransformError> {
    match bar.first_non_finite() {
        Some(field) => Err(TransformError::NonFinite {
            date: bar.date,
            field,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::{PriceBar, PriceSeries};
    use chrono::NaiveDate;

    /// `n` consecutive calendar days from 2024-01-01 with a gentle uptrend.
    pub fn series(n: usize) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = (0..n)
            .map(|i| {
                let base = 100.0 + i as f64;
                PriceBar {
                    date: start + chrono::Duration::days(i as i64),
                    open: base,
                    high: base + 2.347,
                    low: base - 1.111,
                    close: base + 1.006,
                    volume: 1_000_000 + i as u64,
                }
            })
            .collect();
        PriceSeries::new(bars).unwrap()
    }
}
