// In app/src/main.rs

use analytics::thresholds::threshold_levels;
use analytics::AnalyticsEngine;
use anyhow::{Context, Result};
use api_client::{BarRequest, BarSource, CsvSource};
use app_config::{check_window, Settings, TimeframeSettings};
use clap::{Args, Parser, Subcommand};
use core_types::{Kline, Lookback, LookbackUnit, Symbol};
use indicators::{IndicatorSettings, IndicatorTable, MaKind};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::prelude::*;

mod chart;
mod export;
mod report;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Z-score mean-reversion analysis of exchange price history."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where bars come from and which slice of history to load.
#[derive(Args, Debug, Clone, Default)]
struct SourceArgs {
    /// The trading symbol (e.g., "BTCUSDT"). Defaults to `analysis.symbol`.
    #[arg(short, long)]
    symbol: Option<String>,

    /// The bar interval (e.g., "1h", "1d").
    #[arg(short, long)]
    interval: Option<String>,

    /// How much history to load (e.g., "2y", "6mo", "504d").
    #[arg(short, long)]
    lookback: Option<Lookback>,

    /// Read bars from a CSV file instead of the exchange.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Computes moving averages, Bollinger bands, z-scores and LONG/SHORT labels.
    ///
    /// Without --interval every configured timeframe is analysed.
    Analyze {
        #[command(flatten)]
        source: SourceArgs,

        /// Moving average window.
        #[arg(short, long)]
        window: Option<usize>,

        /// Bollinger band window. Defaults to the moving average window.
        #[arg(long)]
        band_window: Option<usize>,

        /// Band width in standard deviations.
        #[arg(long)]
        band_stddev: Option<f64>,

        /// Use a linearly weighted moving average.
        #[arg(long)]
        weighted: bool,

        /// Z-score threshold; repeat for several. Later ones take precedence.
        #[arg(short, long = "threshold")]
        thresholds: Vec<f64>,

        /// Write the full table as CSV.
        #[arg(long)]
        export: Option<PathBuf>,

        /// Rows shown in the console table.
        #[arg(long)]
        rows: Option<usize>,
    },

    /// Reports the return and deviation levels at each z-score threshold.
    Thresholds {
        #[command(flatten)]
        source: SourceArgs,

        /// Moving average window.
        #[arg(short, long)]
        window: Option<usize>,

        /// Use a simple instead of a weighted moving average.
        #[arg(long)]
        simple: bool,

        /// Z-score threshold; repeat for several.
        #[arg(short, long = "threshold")]
        thresholds: Vec<f64>,
    },

    /// Computes the Sharpe ratio and the three-average trend reading.
    Trend {
        #[command(flatten)]
        source: SourceArgs,
    },
}

/// CLI values that replace parts of a configured timeframe.
#[derive(Debug, Clone, Default)]
struct TimeframeOverrides {
    lookback: Option<Lookback>,
    window: Option<usize>,
    band_window: Option<usize>,
    weighted: bool,
}

#[derive(Serialize)]
struct AnalysisOutput {
    symbol: Symbol,
    interval: String,
    lookback: Lookback,
    source: &'static str,
    table: IndicatorTable,
}

#[derive(Serialize)]
struct ThresholdOutput {
    symbol: Symbol,
    interval: String,
    lookback: Lookback,
    moving_average: String,
    rows: usize,
    return_stats: Option<indicators::SeriesStats>,
    deviation_stats: Option<indicators::SeriesStats>,
    levels: Vec<analytics::ThresholdLevel>,
}

#[derive(Serialize)]
struct TrendOutput {
    symbol: Symbol,
    interval: String,
    lookback: Lookback,
    settings: analytics::TrendSettings,
    report: analytics::TrendReport,
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments.
    let cli = Cli::parse();

    let settings = app_config::load_settings()?;
    init_tracing(&settings.app.log_level);

    tracing::info!(environment = %settings.app.environment, "Starting timex");

    // Match on the parsed command and call the appropriate handler.
    let result = match cli.command {
        Commands::Analyze {
            source,
            window,
            band_window,
            band_stddev,
            weighted,
            thresholds,
            export,
            rows,
        } => {
            let overrides = TimeframeOverrides {
                lookback: source.lookback,
                window,
                band_window,
                weighted,
            };
            handle_analyze(&settings, source, overrides, band_stddev, thresholds, export, rows).await
        }
        Commands::Thresholds {
            source,
            window,
            simple,
            thresholds,
        } => handle_thresholds(&settings, source, window, simple, thresholds).await,
        Commands::Trend { source } => handle_trend(&settings, source).await,
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Command failed.");
    }
    result
}

/// Logs go to stderr so that `--json` output on stdout stays parseable.
fn init_tracing(log_level: &str) {
    let level = log_level.parse::<Level>().unwrap_or(Level::INFO);
    // HTTP internals never log more than WARN.
    let http_level = level.min(Level::WARN);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(
            Targets::new()
                .with_target("reqwest", http_level)
                .with_target("hyper", http_level)
                .with_target("hyper_util", http_level)
                .with_default(level),
        );
    tracing_subscriber::registry().with(fmt_layer).init();
}

// --- Bar Loading ---

async fn open_source(settings: &Settings, csv: Option<&Path>) -> Result<Box<dyn BarSource>> {
    match csv {
        Some(path) => {
            tracing::info!(path = %path.display(), "Using CSV price history.");
            Ok(Box::new(CsvSource::new(path)))
        }
        None => {
            let client = api_client::new(&settings.provider)?;
            client
                .ping()
                .await
                .with_context(|| format!("Failed to reach market-data provider at {}", client.base_url))?;
            tracing::info!(base_url = %client.base_url, "Connected to market-data provider.");
            Ok(Box::new(client))
        }
    }
}

async fn load_bars(source: &dyn BarSource, request: &BarRequest) -> Result<Vec<Kline>> {
    let bars = source.fetch_bars(request).await.with_context(|| {
        format!(
            "Failed to load {} {} bars from {}",
            request.symbol,
            request.interval,
            source.name()
        )
    })?;
    if bars.is_empty() {
        tracing::warn!(
            symbol = %request.symbol,
            interval = %request.interval,
            lookback = %request.lookback,
            "No bars in the requested range."
        );
    }
    Ok(bars)
}

fn resolve_symbol(source: &SourceArgs, settings: &Settings) -> Symbol {
    Symbol(source.symbol.clone().unwrap_or_else(|| settings.analysis.symbol.clone()))
}

/// Picks the timeframes to analyse and applies the CLI overrides to them.
///
/// An explicit interval reuses the configured timeframe of the same name when
/// there is one; otherwise it starts from the minimum window.
fn resolve_timeframes(
    configured: &[TimeframeSettings],
    interval: Option<&str>,
    overrides: &TimeframeOverrides,
    min_window: usize,
) -> Vec<TimeframeSettings> {
    let base = match interval {
        None => configured.to_vec(),
        Some(interval) => {
            let tf = configured
                .iter()
                .find(|tf| tf.interval == interval)
                .cloned()
                .unwrap_or_else(|| TimeframeSettings {
                    interval: interval.to_string(),
                    lookback: configured
                        .first()
                        .map(|tf| tf.lookback)
                        .unwrap_or(Lookback::new(2, LookbackUnit::Years)),
                    ma_window: min_window,
                    ma_kind: MaKind::Simple,
                    band_window: None,
                });
            vec![tf]
        }
    };

    base.into_iter()
        .map(|mut tf| {
            if let Some(lookback) = overrides.lookback {
                tf.lookback = lookback;
            }
            if let Some(window) = overrides.window {
                tf.ma_window = window;
            }
            if let Some(band_window) = overrides.band_window {
                tf.band_window = Some(band_window);
            }
            if overrides.weighted {
                tf.ma_kind = MaKind::Weighted;
            }
            tf
        })
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// --- "Analyze" Subcommand Logic ---

async fn handle_analyze(
    settings: &Settings,
    source: SourceArgs,
    overrides: TimeframeOverrides,
    band_stddev: Option<f64>,
    thresholds: Vec<f64>,
    export: Option<PathBuf>,
    rows: Option<usize>,
) -> Result<()> {
    let analysis = &settings.analysis;
    let symbol = resolve_symbol(&source, settings);
    let timeframes = resolve_timeframes(
        &analysis.timeframes,
        source.interval.as_deref(),
        &overrides,
        analysis.min_window,
    );
    if timeframes.is_empty() {
        anyhow::bail!("No timeframes configured and no --interval given.");
    }
    let thresholds = if thresholds.is_empty() { analysis.thresholds.clone() } else { thresholds };
    let band_stddev = band_stddev.unwrap_or(analysis.band_stddev);
    let rows = rows.unwrap_or(analysis.display_rows);

    // Reject bad windows before touching the network.
    for tf in &timeframes {
        check_window("--window", tf.ma_window, analysis.min_window)?;
        if let Some(band_window) = tf.band_window {
            check_window("--band-window", band_window, analysis.min_window)?;
        }
        tf.indicator_settings(band_stddev, &thresholds).validate()?;
    }

    let bar_source = open_source(settings, source.csv.as_deref()).await?;
    let multiple = timeframes.len() > 1;
    let mut outputs = Vec::new();

    for tf in &timeframes {
        let request = BarRequest::new(symbol.clone(), tf.interval.clone(), tf.lookback);
        let bars = load_bars(bar_source.as_ref(), &request).await?;
        let table = indicators::compute(&bars, &tf.indicator_settings(band_stddev, &thresholds))?;

        tracing::info!(
            symbol = %symbol,
            interval = %tf.interval,
            bars = bars.len(),
            rows = table.len(),
            long = table.count(core_types::Position::Long),
            short = table.count(core_types::Position::Short),
            "Computed indicator table."
        );

        if let Some(path) = &export {
            let path = export::path_for(path, &tf.interval, multiple);
            export::write_table(&path, &table)?;
            tracing::info!(path = %path.display(), rows = table.len(), "Exported indicator table.");
        }

        if source.json {
            outputs.push(AnalysisOutput {
                symbol: symbol.clone(),
                interval: tf.interval.clone(),
                lookback: tf.lookback,
                source: bar_source.name(),
                table,
            });
        } else {
            report::print_analysis(&symbol, tf, &table, rows);
            println!("{}", chart::render(&table, analysis.chart_rows));
        }
    }

    if source.json {
        print_json(&outputs)?;
    }
    Ok(())
}

// --- "Thresholds" Subcommand Logic ---

async fn handle_thresholds(
    settings: &Settings,
    source: SourceArgs,
    window: Option<usize>,
    simple: bool,
    thresholds: Vec<f64>,
) -> Result<()> {
    let study = &settings.thresholds;
    let symbol = resolve_symbol(&source, settings);
    let interval = source.interval.clone().unwrap_or_else(|| study.interval.clone());
    let lookback = source.lookback.unwrap_or(study.lookback);
    let window = window.unwrap_or(study.ma_window);
    check_window("--window", window, settings.analysis.min_window)?;

    let thresholds = if thresholds.is_empty() { study.thresholds.clone() } else { thresholds };
    let indicator_settings = IndicatorSettings {
        ma_window: window,
        ma_kind: if simple { MaKind::Simple } else { study.ma_kind },
        band_window: None,
        band_stddev: settings.analysis.band_stddev,
        thresholds: thresholds.clone(),
    };
    indicator_settings.validate()?;

    let bar_source = open_source(settings, source.csv.as_deref()).await?;
    let request = BarRequest::new(symbol.clone(), interval.clone(), lookback);
    let bars = load_bars(bar_source.as_ref(), &request).await?;
    let table = indicators::compute(&bars, &indicator_settings)?;
    let levels = threshold_levels(&table, &thresholds);

    tracing::info!(symbol = %symbol, interval = %interval, rows = table.len(), "Computed threshold levels.");

    if source.json {
        print_json(&ThresholdOutput {
            symbol,
            interval,
            lookback,
            moving_average: table.ma_label.clone(),
            rows: table.len(),
            return_stats: table.return_stats,
            deviation_stats: table.deviation_stats,
            levels,
        })
    } else {
        report::print_threshold_levels(&symbol, &interval, &table, &levels);
        Ok(())
    }
}

// --- "Trend" Subcommand Logic ---

async fn handle_trend(settings: &Settings, source: SourceArgs) -> Result<()> {
    let study = &settings.trend;
    let symbol = resolve_symbol(&source, settings);
    let interval = source.interval.clone().unwrap_or_else(|| study.interval.clone());
    let lookback = source.lookback.unwrap_or(study.lookback);
    let engine = AnalyticsEngine::new(study.params.clone());

    let bar_source = open_source(settings, source.csv.as_deref()).await?;
    let request = BarRequest::new(symbol.clone(), interval.clone(), lookback);
    let bars = load_bars(bar_source.as_ref(), &request).await?;
    let trend = engine.trend_report(&bars)?;

    tracing::info!(
        symbol = %symbol,
        bars = trend.bars,
        sharpe = ?trend.sharpe_ratio,
        class = ?trend.class,
        "Computed trend report."
    );

    if source.json {
        print_json(&TrendOutput {
            symbol,
            interval,
            lookback,
            settings: engine.settings().clone(),
            report: trend,
        })
    } else {
        report::print_trend(&symbol, &interval, engine.settings(), &trend);
        Ok(())
    }
}
