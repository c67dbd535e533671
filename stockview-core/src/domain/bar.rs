//! PriceBar and PriceSeries: the daily market data unit and its ordered container.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Daily OHLCV record for one trading date.
///
/// Prices are stored as delivered by the provider. A bar the provider only
/// partially filled carries NaN in the missing price fields; the transforms
/// treat such a bar as malformed input rather than silently formatting NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// Returns the first OHLC field that is NaN or infinite, by name.
    pub fn first_non_finite(&self) -> Option<&'static str> {
        [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|(name, _)| name)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("dates out of order: {previous} is followed by {next}")]
    OutOfOrder { previous: NaiveDate, next: NaiveDate },

    #[error("duplicate date: {0}")]
    DuplicateDate(NaiveDate),
}

/// Bars ordered strictly ascending by date.
///
/// The ordering invariant is checked once at construction; every transform
/// relies on it for the most-recent-first table and the date-indexed CSV.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        for pair in bars.windows(2) {
            let (previous, next) = (pair[0].date, pair[1].date);
            if previous == next {
                return Err(SeriesError::DuplicateDate(next));
            }
            if previous > next {
                return Err(SeriesError::OutOfOrder { previous, next });
            }
        }
        Ok(Self { bars })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// The trailing `n` bars (all of them when the series is shorter).
    pub fn tail(&self, n: usize) -> &[PriceBar] {
        let start = self.bars.len().saturating_sub(n);
        &self.bars[start..]
    }
}
