//! Request-scoped orchestration: fetch from the provider, then transform.
//!
//! Provider failures of any kind collapse to "no data"; transform failures
//! are already absorbed by the [`Transformer`]. The only errors surfaced to a
//! caller are the two user-facing ones in [`AnalyzeError`] plus CSV
//! serialization.

use crate::data::MarketDataProvider;
use crate::domain::{normalize_symbol, Period, PriceSeries};
use crate::transform::{
    ChartPayload, MetricsSummary, Outcome, TableRow, TransformError, Transformer,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info_span, warn};

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("Please enter a valid stock symbol.")]
    EmptySymbol,

    #[error("Could not fetch data for symbol: {symbol}. Please check if the symbol is correct.")]
    NoData { symbol: String },

    #[error("CSV export failed: {0}")]
    Export(#[from] TransformError),
}

/// Everything a page needs for one symbol and period.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub symbol: String,
    pub period: Period,
    pub metrics: MetricsSummary,
    pub chart: ChartPayload,
    pub table: Vec<TableRow>,
    /// Transform failures that were replaced by placeholders.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// A CSV file ready to hand to a download or write to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

/// `{SYMBOL}_{PERIOD}_stock_data.csv`
pub fn csv_filename(symbol: &str, period: Period) -> String {
    format!("{symbol}_{period}_stock_data.csv")
}

pub struct StockAnalyzer<P> {
    provider: P,
    transformer: Transformer,
}

impl<P: MarketDataProvider> StockAnalyzer<P> {
    pub fn new(provider: P) -> Self {
        let transformer = Transformer::new(info_span!("transformer", provider = provider.name()));
        Self {
            provider,
            transformer,
        }
    }

    pub fn with_transformer(provider: P, transformer: Transformer) -> Self {
        Self {
            provider,
            transformer,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn transformer(&self) -> &Transformer {
        &self.transformer
    }

    /// Price history for `symbol`, or `None` when the provider has nothing.
    pub fn get_stock_data(&self, symbol: &str, period: Period) -> Option<PriceSeries> {
        match self.provider.history(symbol, period) {
            Ok(series) if series.is_empty() => {
                warn!(symbol, %period, "no data found for symbol");
                None
            }
            Ok(series) => Some(series),
            Err(e) => {
                error!(symbol, %period, error = %e, "error fetching data");
                None
            }
        }
    }

    /// Metrics summary, priced at the latest one-day close when available.
    pub fn get_financial_metrics(&self, symbol: &str) -> Outcome<MetricsSummary> {
        let info = self.provider.info(symbol);
        let latest_close = match self.provider.history(symbol, Period::OneDay) {
            Ok(series) => series.last().map(|bar| bar.close),
            Err(e) => {
                debug!(symbol, error = %e, "no fresh price, using cached quote");
                None
            }
        };
        self.transformer
            .summarize_metrics(symbol, info.as_ref(), latest_close)
    }

    /// Normalised symbol and its non-empty series.
    fn fetch(
        &self,
        raw_symbol: &str,
        period: Period,
    ) -> Result<(String, PriceSeries), AnalyzeError> {
        let symbol = normalize_symbol(raw_symbol).ok_or(AnalyzeError::EmptySymbol)?;
        let series = self
            .get_stock_data(&symbol, period)
            .ok_or_else(|| AnalyzeError::NoData {
                symbol: symbol.clone(),
            })?;
        Ok((symbol, series))
    }

    /// Full analysis for a raw user-supplied symbol.
    pub fn analyze(&self, raw_symbol: &str, period: Period) -> Result<Analysis, AnalyzeError> {
        let span = info_span!("analyze", symbol = raw_symbol.trim(), %period);
        let _entered = span.enter();

        let (symbol, series) = self.fetch(raw_symbol, period)?;
        let transformer = self.transformer.for_symbol(&symbol);

        let mut warnings = Vec::new();
        let metrics = collect(self.get_financial_metrics(&symbol), &mut warnings);
        let chart = collect(transformer.prepare_chart(&series), &mut warnings);
        let table = collect(transformer.prepare_table(&series), &mut warnings);

        Ok(Analysis {
            symbol,
            period,
            metrics,
            chart,
            table,
            warnings,
        })
    }

    /// Chart payload only; skips the info lookups `analyze` makes.
    pub fn chart(
        &self,
        raw_symbol: &str,
        period: Period,
    ) -> Result<Outcome<ChartPayload>, AnalyzeError> {
        let span = info_span!("chart", symbol = raw_symbol.trim(), %period);
        let _entered = span.enter();

        let (symbol, series) = self.fetch(raw_symbol, period)?;
        Ok(self.transformer.for_symbol(&symbol).prepare_chart(&series))
    }

    /// CSV export of the full series under the conventional filename.
    pub fn export_csv(&self, raw_symbol: &str, period: Period) -> Result<CsvExport, AnalyzeError> {
        let span = info_span!("export_csv", symbol = raw_symbol.trim(), %period);
        let _entered = span.enter();

        let (symbol, series) = self.fetch(raw_symbol, period)?;
        let content = self
            .transformer
            .for_symbol(&symbol)
            .prepare_csv(&series)
            .value()
            .to_csv_string()?;
        Ok(CsvExport {
            filename: csv_filename(&symbol, period),
            content,
        })
    }
}

fn collect<T>(outcome: Outcome<T>, warnings: &mut Vec<String>) -> T {
    if let Some(e) = outcome.error() {
        warnings.push(e.to_string());
    }
    outcome.into_value()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_convention() {
        assert_eq!(csv_filename("AAPL", Period::OneYear), "AAPL_1y_stock_data.csv");
        assert_eq!(csv_filename("MSFT", Period::YearToDate), "MSFT_ytd_stock_data.csv");
    }

    #[test]
    fn user_facing_messages() {
        assert_eq!(
            AnalyzeError::EmptySymbol.to_string(),
            "Please enter a valid stock symbol."
        );
        assert_eq!(
            AnalyzeError::NoData {
                symbol: "ZZZZ".into()
            }
            .to_string(),
            "Could not fetch data for symbol: ZZZZ. Please check if the symbol is correct."
        );
    }
}
