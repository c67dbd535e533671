//! Recent-window table rows, most recent first.

use super::{check_finite, percent_change, round2, Outcome, TransformError, Transformer};
use crate::domain::PriceSeries;
use crate::format::{group_thousands, NOT_AVAILABLE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Comma-grouped, e.g. `52,164,700`.
    pub volume: String,
    pub change: f64,
    /// Two decimals with a trailing `%`, or `N/A` when the open was zero.
    pub change_percent: String,
}

fn build(series: &PriceSeries, window: usize) -> Result<Vec<TableRow>, TransformError> {
    let mut rows = Vec::with_capacity(window.min(series.len()));
    for bar in series.tail(window).iter().rev() {
        check_finite(bar)?;
        let change_percent = match percent_change(bar.open, bar.close) {
            Some(pct) => format!("{pct:.2}%"),
            None => NOT_AVAILABLE.to_string(),
        };
        rows.push(TableRow {
            date: bar.date.format("%Y-%m-%d").to_string(),
            open: round2(bar.open),
            high: round2(bar.high),
            low: round2(bar.low),
            close: round2(bar.close),
            volume: group_thousands(bar.volume),
            change: round2(bar.close - bar.open),
            change_percent,
        });
    }
    Ok(rows)
}

impl Transformer {
    /// The trailing window of bars as display rows, newest first.
    pub fn prepare_table(&self, series: &PriceSeries) -> Outcome<Vec<TableRow>> {
        self.settle(
            "prepare_table",
            None,
            build(series, self.table_window),
            Vec::new,
        )
    }
}
