//! Property tests for the transformer contract.
//!
//! Uses proptest to verify:
//! 1. Chart sequences match the input length and labels ascend
//! 2. The table holds at most 30 rows, newest first
//! 3. Table change columns follow from open and close
//! 4. CSV export survives serialization and re-parsing
//! 5. The metrics summary is total over arbitrary info records

use chrono::NaiveDate;
use proptest::prelude::*;
use stockview_core::{
    CsvTable, InfoRecord, InfoValue, MetricsSummary, PriceBar, PriceSeries, Transformer,
};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (0.5..2000.0_f64).prop_map(|p| (p * 10_000.0).round() / 10_000.0)
}

fn arb_bar_fields() -> impl Strategy<Value = (u8, f64, f64, u64)> {
    (1u8..5, arb_price(), arb_price(), 0u64..5_000_000_000)
}

fn arb_series() -> impl Strategy<Value = PriceSeries> {
    prop::collection::vec(arb_bar_fields(), 0..90).prop_map(|fields| {
        let mut date = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
        let bars = fields
            .into_iter()
            .map(|(gap, open, close, volume)| {
                date += chrono::Duration::days(gap as i64);
                PriceBar {
                    date,
                    open,
                    high: open.max(close) * 1.01,
                    low: open.min(close) * 0.99,
                    close,
                    volume,
                }
            })
            .collect();
        PriceSeries::new(bars).unwrap()
    })
}

fn arb_info_value() -> impl Strategy<Value = InfoValue> {
    prop_oneof![
        Just(InfoValue::Missing),
        Just(InfoValue::Text("N/A".into())),
        Just(InfoValue::Number(f64::NAN)),
        any::<f64>().prop_map(InfoValue::Number),
        "[a-zA-Z0-9 .,%-]{0,12}".prop_map(InfoValue::Text),
    ]
}

fn arb_info() -> impl Strategy<Value = InfoRecord> {
    let keys = [
        "longName",
        "sector",
        "industry",
        "marketCap",
        "trailingPE",
        "trailingEps",
        "dividendYield",
        "beta",
        "fiftyTwoWeekHigh",
        "fiftyTwoWeekLow",
        "volume",
        "averageVolume",
        "currentPrice",
    ];
    prop::collection::vec(prop::option::of(arb_info_value()), keys.len()).prop_map(
        move |values| {
            keys.iter()
                .zip(values)
                .filter_map(|(k, v)| v.map(|v| (k.to_string(), v)))
                .collect()
        },
    )
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

proptest! {
    #[test]
    fn chart_lengths_match_and_labels_ascend(series in arb_series()) {
        let chart = Transformer::default().prepare_chart(&series).into_value();
        prop_assert_eq!(chart.labels.len(), series.len());
        prop_assert_eq!(chart.prices.len(), series.len());
        prop_assert_eq!(chart.volumes.len(), series.len());
        prop_assert_eq!(chart.highs.len(), series.len());
        prop_assert_eq!(chart.lows.len(), series.len());
        prop_assert_eq!(chart.opens.len(), series.len());
        for label in &chart.labels {
            prop_assert!(NaiveDate::parse_from_str(label, "%Y-%m-%d").is_ok());
            prop_assert_eq!(label.len(), 10);
        }
        for pair in chart.labels.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn table_is_bounded_and_newest_first(series in arb_series()) {
        let rows = Transformer::default().prepare_table(&series).into_value();
        prop_assert_eq!(rows.len(), series.len().min(30));
        if let Some(last) = series.last() {
            prop_assert_eq!(&rows[0].date, &last.date.format("%Y-%m-%d").to_string());
        }
        for pair in rows.windows(2) {
            prop_assert!(pair[0].date > pair[1].date);
        }
    }

    #[test]
    fn table_change_columns_follow_open_and_close(series in arb_series()) {
        let rows = Transformer::default().prepare_table(&series).into_value();
        for (row, bar) in rows.iter().zip(series.bars().iter().rev()) {
            prop_assert_eq!(row.change, round2(bar.close - bar.open));
            let pct: f64 = row.change_percent.trim_end_matches('%').parse().unwrap();
            let expected = round2((bar.close - bar.open) / bar.open * 100.0);
            prop_assert!((pct - expected).abs() < 1e-9, "{} vs {}", pct, expected);
            prop_assert!(row.change_percent.ends_with('%'));
        }
    }

    #[test]
    fn csv_round_trip_preserves_prices_and_changes(series in arb_series()) {
        let table = Transformer::default().prepare_csv(&series).into_value();
        prop_assert_eq!(table.len(), series.len());
        let text = table.to_csv_string().unwrap();
        let parsed = CsvTable::from_csv_str(&text).unwrap();
        prop_assert_eq!(parsed.len(), series.len());
        for (row, bar) in parsed.rows.iter().zip(series.bars()) {
            prop_assert_eq!(row.date, bar.date);
            prop_assert_eq!(row.open, round2(bar.open));
            prop_assert_eq!(row.high, round2(bar.high));
            prop_assert_eq!(row.low, round2(bar.low));
            prop_assert_eq!(row.close, round2(bar.close));
            prop_assert_eq!(row.volume, bar.volume);
            prop_assert_eq!(row.change, round2(bar.close - bar.open));
            prop_assert_eq!(
                row.change_percent,
                Some(round2((bar.close - bar.open) / bar.open * 100.0))
            );
        }
    }

    #[test]
    fn metrics_summary_is_total(info in arb_info(), price in prop::option::of(any::<f64>())) {
        let out = Transformer::default().summarize_metrics("TEST", Ok(&info), price);
        prop_assert!(!out.is_fallback());
        let summary = out.into_value();
        prop_assert_eq!(summary.symbol.as_str(), "TEST");
        for key in MetricsSummary::KEYS {
            let value = summary.get(key);
            prop_assert!(value.is_some());
            prop_assert!(!value.unwrap_or_default().is_empty());
        }
    }
}
