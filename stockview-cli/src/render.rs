//! Plain-text rendering of an analysis for the terminal.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};
use stockview_core::{Analysis, ChartPayload, CsvExport, MetricsSummary, TableRow};

const TABLE_HEADER: [&str; 8] = [
    "Date", "Open", "High", "Low", "Close", "Volume", "Change", "Change %",
];

fn label(key: &str) -> String {
    match key {
        "pe_ratio" => "P/E Ratio".to_string(),
        "eps" => "EPS".to_string(),
        "52_week_high" => "52 Week High".to_string(),
        "52_week_low" => "52 Week Low".to_string(),
        "avg_volume" => "Avg Volume".to_string(),
        other => other
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" "),
    }
}

/// One `Label: value` line per metric, labels padded to a column.
pub fn metrics_block(metrics: &MetricsSummary) -> String {
    let entries: Vec<(String, &str)> = metrics
        .entries()
        .into_iter()
        .map(|(key, value)| (label(key), value))
        .collect();
    let width = entries.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (l, value) in entries {
        let _ = writeln!(out, "{l:<width$}  {value}");
    }
    out
}

/// Right-aligned columns, newest row first as produced by the transformer.
pub fn table_block(rows: &[TableRow]) -> String {
    let cells: Vec<[String; 8]> = rows
        .iter()
        .map(|r| {
            [
                r.date.clone(),
                format!("{:.2}", r.open),
                format!("{:.2}", r.high),
                format!("{:.2}", r.low),
                format!("{:.2}", r.close),
                r.volume.clone(),
                format!("{:.2}", r.change),
                r.change_percent.clone(),
            ]
        })
        .collect();

    let mut widths = TABLE_HEADER.map(str::len);
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = TABLE_HEADER
        .iter()
        .zip(widths)
        .map(|(h, w)| format!("{h:>w$}"))
        .collect();
    let _ = writeln!(out, "{}", header.join("  "));
    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(c, w)| format!("{c:>w$}"))
            .collect();
        let _ = writeln!(out, "{}", line.join("  "));
    }
    out
}

/// Pretty JSON of the whole analysis.
pub fn analysis_json(analysis: &Analysis) -> Result<String> {
    serde_json::to_string_pretty(analysis).context("serializing analysis as JSON")
}

/// Compact JSON of the chart payload, one line for piping.
pub fn chart_json(chart: &ChartPayload) -> Result<String> {
    serde_json::to_string(chart).context("serializing chart as JSON")
}

/// Write the export under its conventional filename inside `dir`.
pub fn write_export(export: &CsvExport, dir: &Path) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(&export.filename);
    std::fs::write(&path, &export.content)?;
    Ok(path)
}
