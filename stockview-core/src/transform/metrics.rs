//! Formatted metrics summary for a symbol's info record.

use super::{Outcome, TransformError, Transformer};
use crate::data::DataError;
use crate::domain::{InfoRecord, InfoValue};
use crate::format::{
    format_currency, format_large_number, format_percentage, format_ratio, NOT_AVAILABLE,
};
use serde::{Deserialize, Serialize};

/// The fourteen display strings, always fully populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub symbol: String,
    pub company_name: String,
    pub sector: String,
    pub industry: String,
    pub current_price: String,
    pub market_cap: String,
    pub pe_ratio: String,
    pub eps: String,
    pub dividend_yield: String,
    pub beta: String,
    #[serde(rename = "52_week_high")]
    pub week_52_high: String,
    #[serde(rename = "52_week_low")]
    pub week_52_low: String,
    pub volume: String,
    pub avg_volume: String,
}

impl MetricsSummary {
    pub const KEYS: [&'static str; 14] = [
        "symbol",
        "company_name",
        "sector",
        "industry",
        "current_price",
        "market_cap",
        "pe_ratio",
        "eps",
        "dividend_yield",
        "beta",
        "52_week_high",
        "52_week_low",
        "volume",
        "avg_volume",
    ];

    /// Every field "N/A" except the symbol.
    pub fn unavailable(symbol: &str) -> Self {
        let na = || NOT_AVAILABLE.to_string();
        Self {
            symbol: symbol.to_string(),
            company_name: na(),
            sector: na(),
            industry: na(),
            current_price: na(),
            market_cap: na(),
            pe_ratio: na(),
            eps: na(),
            dividend_yield: na(),
            beta: na(),
            week_52_high: na(),
            week_52_low: na(),
            volume: na(),
            avg_volume: na(),
        }
    }

    /// Key/value pairs in display order.
    pub fn entries(&self) -> [(&'static str, &str); 14] {
        [
            (Self::KEYS[0], self.symbol.as_str()),
            (Self::KEYS[1], self.company_name.as_str()),
            (Self::KEYS[2], self.sector.as_str()),
            (Self::KEYS[3], self.industry.as_str()),
            (Self::KEYS[4], self.current_price.as_str()),
            (Self::KEYS[5], self.market_cap.as_str()),
            (Self::KEYS[6], self.pe_ratio.as_str()),
            (Self::KEYS[7], self.eps.as_str()),
            (Self::KEYS[8], self.dividend_yield.as_str()),
            (Self::KEYS[9], self.beta.as_str()),
            (Self::KEYS[10], self.week_52_high.as_str()),
            (Self::KEYS[11], self.week_52_low.as_str()),
            (Self::KEYS[12], self.volume.as_str()),
            (Self::KEYS[13], self.avg_volume.as_str()),
        ]
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries()
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }
}

/// Descriptive text fields pass through; numbers are shown as-is.
fn display_text(value: &InfoValue) -> String {
    match value {
        InfoValue::Text(s) if !s.is_empty() => s.clone(),
        InfoValue::Number(n) if n.is_finite() => n.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn build(symbol: &str, info: &InfoRecord, current_price: Option<f64>) -> MetricsSummary {
    let price = match current_price {
        Some(p) if p.is_finite() => InfoValue::Number(p),
        _ => info.get("currentPrice").clone(),
    };
    MetricsSummary {
        symbol: symbol.to_string(),
        company_name: display_text(info.get("longName")),
        sector: display_text(info.get("sector")),
        industry: display_text(info.get("industry")),
        current_price: format_currency(&price),
        market_cap: format_large_number(info.get("marketCap")),
        pe_ratio: format_ratio(info.get("trailingPE")),
        eps: format_currency(info.get("trailingEps")),
        dividend_yield: format_percentage(info.get("dividendYield")),
        beta: format_ratio(info.get("beta")),
        week_52_high: format_currency(info.get("fiftyTwoWeekHigh")),
        week_52_low: format_currency(info.get("fiftyTwoWeekLow")),
        volume: format_large_number(info.get("volume")),
        avg_volume: format_large_number(info.get("averageVolume")),
    }
}

impl Transformer {
    /// Format the info record into the fixed metrics summary.
    ///
    /// `current_price` is the freshly fetched latest close when one is
    /// available; otherwise the record's cached `currentPrice` is used.
    /// A failed info lookup yields the all-"N/A" summary for `symbol`.
    pub fn summarize_metrics(
        &self,
        symbol: &str,
        info: Result<&InfoRecord, &DataError>,
        current_price: Option<f64>,
    ) -> Outcome<MetricsSummary> {
        let result = info
            .map(|record| build(symbol, record, current_price))
            .map_err(|e| TransformError::InfoUnavailable(e.to_string()));
        self.settle("summarize_metrics", Some(symbol), result, || {
            MetricsSummary::unavailable(symbol)
        })
    }
}
