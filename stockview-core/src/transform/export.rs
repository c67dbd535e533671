//! CSV export table: the full series plus `Change` and `Change %` columns.
//!
//! Values stay numeric (rounded to cents) so the file is machine-readable;
//! `Change %` is left blank for a zero open.

use super::{check_finite, percent_change, round2, Outcome, TransformError, Transformer};
use crate::domain::PriceSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const CSV_HEADER: [&str; 8] = [
    "Date", "Open", "High", "Low", "Close", "Volume", "Change", "Change %",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Volume")]
    pub volume: u64,
    #[serde(rename = "Change")]
    pub change: f64,
    #[serde(rename = "Change %")]
    pub change_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTable {
    pub rows: Vec<CsvRow>,
}

impl CsvTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Comma-separated text with a header row and the date as first column.
    pub fn to_csv_string(&self) -> Result<String, TransformError> {
        let ser = |e: csv::Error| TransformError::Serialize(e.to_string());
        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.write_record(CSV_HEADER).map_err(ser)?;
        for r in &self.rows {
            wtr.write_record([
                &r.date.format("%Y-%m-%d").to_string(),
                &format!("{:.2}", r.open),
                &format!("{:.2}", r.high),
                &format!("{:.2}", r.low),
                &format!("{:.2}", r.close),
                &r.volume.to_string(),
                &format!("{:.2}", r.change),
                &r.change_percent.map(|p| format!("{p:.2}")).unwrap_or_default(),
            ])
            .map_err(ser)?;
        }
        let data = wtr
            .into_inner()
            .map_err(|e| TransformError::Serialize(e.to_string()))?;
        String::from_utf8(data).map_err(|e| TransformError::Serialize(e.to_string()))
    }

    /// Parse text produced by [`CsvTable::to_csv_string`].
    pub fn from_csv_str(text: &str) -> Result<Self, TransformError> {
        let mut rdr = csv::Reader::from_reader(text.as_bytes());
        let rows = rdr
            .deserialize()
            .collect::<Result<Vec<CsvRow>, _>>()
            .map_err(|e| TransformError::Serialize(e.to_string()))?;
        Ok(Self { rows })
    }
}

fn build(series: &PriceSeries) -> Result<CsvTable, TransformError> {
    let rows = series
        .bars()
        .iter()
        .map(|bar| {
            check_finite(bar)?;
            Ok(CsvRow {
                date: bar.date,
                open: round2(bar.open),
                high: round2(bar.high),
                low: round2(bar.low),
                close: round2(bar.close),
                volume: bar.volume,
                change: round2(bar.close - bar.open),
                change_percent: percent_change(bar.open, bar.close),
            })
        })
        .collect::<Result<Vec<_>, TransformError>>()?;
    Ok(CsvTable { rows })
}

impl Transformer {
    /// Full-length export table in input order.
    pub fn prepare_csv(&self, series: &PriceSeries) -> Outcome<CsvTable> {
        self.settle("prepare_csv", None, build(series), CsvTable::default)
    }
}
