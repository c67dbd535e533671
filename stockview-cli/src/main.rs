//! StockView CLI: analyze a symbol, dump chart data, or export CSV.
//!
//! Commands:
//! - `analyze`: key metrics plus the recent-days table
//! - `chart`: the chart payload as JSON
//! - `export`: write `{SYMBOL}_{PERIOD}_stock_data.csv`

mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use stockview_core::config::AppConfig;
use stockview_core::logging::init_logging;
use stockview_core::transform::Transformer;
use stockview_core::{Period, StockAnalyzer, YahooProvider};

#[derive(Parser)]
#[command(name = "stockview", about = "StockView CLI: stock metrics, charts and CSV export")]
struct Cli {
    /// Path to a TOML config file. Falls back to $STOCKVIEW_CONFIG, then defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show key metrics and the most recent trading days.
    Analyze {
        /// Ticker symbol (e.g., AAPL).
        symbol: String,

        /// Period token: 1d 5d 1mo 3mo 6mo 1y 2y 5y 10y ytd max.
        #[arg(long)]
        period: Option<String>,

        /// Print the full analysis as JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the chart payload as JSON.
    Chart {
        /// Ticker symbol (e.g., AAPL).
        symbol: String,

        /// Period token. Defaults to the configured period.
        #[arg(long)]
        period: Option<String>,
    },
    /// Write the full series as CSV.
    Export {
        /// Ticker symbol (e.g., AAPL).
        symbol: String,

        /// Period token. Defaults to the configured period.
        #[arg(long)]
        period: Option<String>,

        /// Output directory. Defaults to the current directory.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    init_logging(&config.logging.clone().from_env())?;

    let provider = YahooProvider::new(config.provider.clone())?;
    let transformer = Transformer::default().with_table_window(config.display.table_window);
    let analyzer = StockAnalyzer::with_transformer(provider, transformer);

    let (symbol, outcome) = match cli.command {
        Commands::Analyze {
            symbol,
            period,
            json,
        } => {
            let period = resolve_period(period.as_deref(), &config)?;
            let outcome = run_analyze(&analyzer, &symbol, period, json);
            (symbol, outcome)
        }
        Commands::Chart { symbol, period } => {
            let period = resolve_period(period.as_deref(), &config)?;
            let outcome = run_chart(&analyzer, &symbol, period);
            (symbol, outcome)
        }
        Commands::Export {
            symbol,
            period,
            out_dir,
        } => {
            let period = resolve_period(period.as_deref(), &config)?;
            let outcome = run_export(&analyzer, &symbol, period, &out_dir);
            (symbol, outcome)
        }
    };

    if let Err(e) = outcome {
        eprintln!(
            "An error occurred while analyzing {}: {e:#}",
            symbol.trim().to_uppercase()
        );
        std::process::exit(1);
    }
    Ok(())
}

fn resolve_period(token: Option<&str>, config: &AppConfig) -> Result<Period> {
    match token {
        Some(t) => Ok(t.parse()?),
        None => Ok(config.display.default_period),
    }
}

fn run_analyze(
    analyzer: &StockAnalyzer<YahooProvider>,
    symbol: &str,
    period: Period,
    json: bool,
) -> Result<()> {
    let analysis = analyzer.analyze(symbol, period)?;
    if json {
        println!("{}", render::analysis_json(&analysis)?);
        return Ok(());
    }
    print!("{}", render::metrics_block(&analysis.metrics));
    println!();
    print!("{}", render::table_block(&analysis.table));
    for warning in &analysis.warnings {
        eprintln!("warning: {warning}");
    }
    Ok(())
}

fn run_chart(analyzer: &StockAnalyzer<YahooProvider>, symbol: &str, period: Period) -> Result<()> {
    let chart = analyzer.chart(symbol, period)?;
    if let Some(e) = chart.error() {
        eprintln!("warning: {e}");
    }
    println!("{}", render::chart_json(chart.value())?);
    Ok(())
}

fn run_export(
    analyzer: &StockAnalyzer<YahooProvider>,
    symbol: &str,
    period: Period,
    out_dir: &Path,
) -> Result<()> {
    let export = analyzer.export_csv(symbol, period)?;
    let path = render::write_export(&export, out_dir)
        .with_context(|| format!("writing {} to {}", export.filename, out_dir.display()))?;
    tracing::info!(path = %path.display(), bytes = export.content.len(), "csv export written");
    println!("CSV saved to: {}", path.display());
    Ok(())
}
