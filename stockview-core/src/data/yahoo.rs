//! Yahoo Finance data provider.
//!
//! Daily OHLCV bars come from the v8 chart API (`range=<period>`); the info
//! record comes from the v10 quote-summary API, which needs a session cookie
//! and a crumb token obtained immediately before the call.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes; any deviation surfaces as `DataError::ResponseFormatChanged`.

use super::provider::{DataError, MarketDataProvider};
use crate::config::ProviderConfig;
use crate::domain::{InfoRecord, InfoValue, Period, PriceBar, PriceSeries};
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Quote-summary modules whose fields are flattened into the info record.
/// Earlier modules win when two of them carry the same key.
const SUMMARY_MODULES: [&str; 5] = [
    "financialData",
    "price",
    "summaryDetail",
    "defaultKeyStatistics",
    "summaryProfile",
];

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// Yahoo Finance v10 quote-summary response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    quote_summary: SummaryResult,
}

#[derive(Debug, Deserialize)]
struct SummaryResult {
    result: Option<Vec<serde_json::Map<String, serde_json::Value>>>,
    error: Option<ApiError>,
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    config: ProviderConfig,
}

impl YahooProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .cookie_store(true)
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!("{}/{symbol}", self.config.chart_base_url.trim_end_matches('/'))
    }

    fn summary_url(&self, symbol: &str) -> String {
        format!("{}/{symbol}", self.config.summary_base_url.trim_end_matches('/'))
    }

    fn send(
        &self,
        symbol: &str,
        request: reqwest::blocking::RequestBuilder,
    ) -> Result<reqwest::blocking::Response, DataError> {
        let resp = request
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(DataError::AuthenticationRequired(
                "Yahoo Finance rejected the session".into(),
            ));
        }
        // The chart API answers unknown symbols with 404 and a JSON error body.
        if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::Http {
                status: status.as_u16(),
                symbol: symbol.to_string(),
            });
        }
        Ok(resp)
    }

    /// Prime the cookie jar and fetch a crumb for the quote-summary call.
    fn crumb(&self) -> Result<String, DataError> {
        // The cookie endpoint answers with an error status but still sets the cookie.
        if let Err(e) = self.client.get(&self.config.cookie_url).send() {
            warn!(error = %e, "cookie endpoint unreachable");
        }
        let resp = self
            .client
            .get(&self.config.crumb_url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(DataError::AuthenticationRequired(format!(
                "crumb endpoint returned {}",
                resp.status()
            )));
        }
        let crumb = resp
            .text()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        let crumb = crumb.trim();
        if crumb.is_empty() || crumb.contains(' ') {
            return Err(DataError::AuthenticationRequired(
                "no crumb in response".into(),
            ));
        }
        Ok(crumb.to_string())
    }
}

/// Parse the chart API response into a series.
fn parse_chart(symbol: &str, resp: ChartResponse) -> Result<PriceSeries, DataError> {
    let Some(result) = resp.chart.result else {
        return match resp.chart.error {
            Some(err) if err.code == "Not Found" => Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            }),
            Some(err) => Err(DataError::ResponseFormatChanged(format!(
                "{}: {}",
                err.code, err.description
            ))),
            None => Err(DataError::ResponseFormatChanged(
                "empty result with no error".into(),
            )),
        };
    };

    let Some(data) = result.into_iter().next() else {
        return Ok(PriceSeries::empty());
    };

    // A symbol with no trades in range comes back without timestamps.
    let Some(timestamps) = data.timestamp else {
        return Ok(PriceSeries::empty());
    };

    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

    let offset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
    let mut bars: Vec<PriceBar> = Vec::with_capacity(timestamps.len());

    for (i, &ts) in timestamps.iter().enumerate() {
        let date = exchange_date(ts, offset).ok_or_else(|| {
            DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
        })?;

        let open = quote.open.get(i).copied().flatten();
        let high = quote.high.get(i).copied().flatten();
        let low = quote.low.get(i).copied().flatten();
        let close = quote.close.get(i).copied().flatten();
        let volume = quote.volume.get(i).copied().flatten();

        // Skip bars where all OHLCV are None (holidays/non-trading days)
        if open.is_none() && high.is_none() && low.is_none() && close.is_none() && volume.is_none()
        {
            continue;
        }

        let bar = PriceBar {
            date,
            open: open.unwrap_or(f64::NAN),
            high: high.unwrap_or(f64::NAN),
            low: low.unwrap_or(f64::NAN),
            close: close.unwrap_or(f64::NAN),
            volume: volume.unwrap_or(0),
        };

        // During market hours the live bar can repeat the last session date.
        match bars.last_mut() {
            Some(prev) if prev.date == bar.date => *prev = bar,
            _ => bars.push(bar),
        }
    }

    Ok(PriceSeries::new(bars)?)
}

fn exchange_date(ts: i64, gmtoffset: i64) -> Option<NaiveDate> {
    chrono::DateTime::from_timestamp(ts + gmtoffset, 0).map(|dt| dt.naive_utc().date())
}

/// Flatten the quote-summary modules into one record.
///
/// Yahoo wraps numbers as `{"raw": 1.23, "fmt": "1.23"}`; the raw value is
/// kept. Empty objects (`{}`) mean "not reported" and read as missing.
fn parse_summary(symbol: &str, resp: SummaryResponse) -> Result<InfoRecord, DataError> {
    if let Some(err) = resp.quote_summary.error {
        return Err(if err.code == "Not Found" {
            DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            }
        } else {
            DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
        });
    }

    let modules = resp
        .quote_summary
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| DataError::SymbolNotFound {
            symbol: symbol.to_string(),
        })?;

    let mut record = InfoRecord::new();
    for module in SUMMARY_MODULES {
        let Some(serde_json::Value::Object(fields)) = modules.get(module) else {
            continue;
        };
        for (key, value) in fields {
            if !matches!(record.get(key), InfoValue::Missing) {
                continue;
            }
            let value = match value {
                serde_json::Value::Object(wrapped) => {
                    wrapped.get("raw").cloned().unwrap_or(serde_json::Value::Null)
                }
                other => other.clone(),
            };
            let value = InfoValue::from(value);
            if value != InfoValue::Missing {
                record.insert(key.clone(), value);
            }
        }
    }
    Ok(record)
}

impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn history(&self, symbol: &str, period: Period) -> Result<PriceSeries, DataError> {
        debug!(symbol, %period, "fetching history");
        let request = self.client.get(self.chart_url(symbol)).query(&[
            ("range", period.as_str()),
            ("interval", "1d"),
            ("includeAdjustedClose", "true"),
        ]);
        let chart: ChartResponse = self.send(symbol, request)?.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse chart for {symbol}: {e}"))
        })?;
        parse_chart(symbol, chart)
    }

    fn info(&self, symbol: &str) -> Result<InfoRecord, DataError> {
        debug!(symbol, "fetching info");
        let crumb = self.crumb()?;
        let request = self
            .client
            .get(self.summary_url(symbol))
            .header("referer", "https://finance.yahoo.com/")
            .query(&[
                ("modules", SUMMARY_MODULES.join(",").as_str()),
                ("crumb", crumb.as_str()),
            ]);
        let summary: SummaryResponse = self.send(symbol, request)?.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse summary for {symbol}: {e}"))
        })?;
        parse_summary(symbol, summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(json: &str) -> ChartResponse {
        serde_json::from_str(json).unwrap()
    }

    fn summary(json: &str) -> SummaryResponse {
        serde_json::from_str(json).unwrap()
    }

    const CHART_OK: &str = r#"{"chart":{"result":[{
        "meta":{"symbol":"AAPL","gmtoffset":-14400},
        "timestamp":[1704205800,1704292200,1704378600,1704465000],
        "indicators":{"quote":[{
            "open":[187.15,184.22,null,181.99],
            "high":[188.44,185.88,null,182.76],
            "low":[183.89,183.43,null,180.17],
            "close":[185.64,184.25,null,181.18],
            "volume":[82488700,58414500,null,62303300]
        }],"adjclose":[{"adjclose":[184.9,183.5,null,180.4]}]}
    }],"error":null}}"#;

    #[test]
    fn parses_bars_and_skips_empty_days() {
        let series = parse_chart("AAPL", chart(CHART_OK)).unwrap();
        assert_eq!(series.len(), 3);
        let first = &series.bars()[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(first.open, 187.15);
        assert_eq!(first.volume, 82_488_700);
        assert_eq!(
            series.last().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
        );
    }

    #[test]
    fn partial_bar_keeps_nan() {
        let json = r#"{"chart":{"result":[{"timestamp":[1704205800],
            "indicators":{"quote":[{"open":[1.0],"high":[null],"low":[0.5],"close":[0.9],"volume":[10]}]}}],
            "error":null}}"#;
        let series = parse_chart("X", chart(json)).unwrap();
        assert!(series.bars()[0].high.is_nan());
    }

    #[test]
    fn repeated_session_date_keeps_latest() {
        let json = r#"{"chart":{"result":[{"timestamp":[1704205800,1704225600],
            "indicators":{"quote":[{"open":[1.0,1.0],"high":[2.0,2.5],"low":[0.5,0.5],"close":[1.5,2.2],"volume":[10,20]}]}}],
            "error":null}}"#;
        let series = parse_chart("X", chart(json)).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.bars()[0].close, 2.2);
    }

    #[test]
    fn no_timestamps_is_empty_series() {
        let json = r#"{"chart":{"result":[{"meta":{},"indicators":{"quote":[{}]}}],"error":null}}"#;
        assert!(parse_chart("X", chart(json)).unwrap().is_empty());
    }

    #[test]
    fn not_found_error_maps_to_symbol_not_found() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = parse_chart("ZZZZ", chart(json)).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { symbol } if symbol == "ZZZZ"));
    }

    #[test]
    fn other_api_error_is_format_change() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid input"}}}"#;
        let err = parse_chart("X", chart(json)).unwrap_err();
        assert!(matches!(err, DataError::ResponseFormatChanged(_)));
    }

    #[test]
    fn summary_flattens_raw_values() {
        let json = r#"{"quoteSummary":{"result":[{
            "price":{"longName":"Apple Inc.","marketCap":{"raw":2.95e12,"fmt":"2.95T"}},
            "summaryProfile":{"sector":"Technology","industry":"Consumer Electronics"},
            "summaryDetail":{"trailingPE":{"raw":29.4},"dividendYield":{},"beta":{"raw":1.29},
                             "marketCap":{"raw":1.0}},
            "defaultKeyStatistics":{"trailingEps":{"raw":6.43},"beta":{"raw":9.9}},
            "financialData":{"currentPrice":{"raw":189.25,"fmt":"189.25"}}
        }],"error":null}}"#;
        let record = parse_summary("AAPL", summary(json)).unwrap();
        assert_eq!(record.text("longName"), Some("Apple Inc."));
        assert_eq!(record.text("sector"), Some("Technology"));
        assert_eq!(record.get("marketCap"), &InfoValue::Number(2.95e12));
        assert_eq!(record.get("trailingPE"), &InfoValue::Number(29.4));
        assert_eq!(record.get("trailingEps"), &InfoValue::Number(6.43));
        assert_eq!(record.get("beta"), &InfoValue::Number(1.29));
        assert_eq!(record.get("currentPrice"), &InfoValue::Number(189.25));
        assert_eq!(record.get("dividendYield"), &InfoValue::Missing);
    }

    #[test]
    fn summary_not_found() {
        let json = r#"{"quoteSummary":{"result":null,"error":{"code":"Not Found","description":"Quote not found for symbol: ZZZZ"}}}"#;
        let err = parse_summary("ZZZZ", summary(json)).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { .. }));
    }

    #[test]
    fn urls_join_base_and_symbol() {
        let provider = YahooProvider::new(ProviderConfig {
            chart_base_url: "http://localhost:9/chart/".into(),
            ..ProviderConfig::default()
        })
        .unwrap();
        assert_eq!(provider.chart_url("MSFT"), "http://localhost:9/chart/MSFT");
        assert!(provider.summary_url("MSFT").ends_with("/MSFT"));
    }
}
