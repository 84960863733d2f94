// In app/src/report.rs

use analytics::{LevelPoint, ThresholdLevel, TrendReport, TrendSettings};
use app_config::TimeframeSettings;
use chrono::{TimeZone, Utc};
use colored::Colorize;
use core_types::{Position, Symbol};
use indicators::{IndicatorRow, IndicatorTable, SeriesStats};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct BarRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Open")]
    open: String,
    #[tabled(rename = "High")]
    high: String,
    #[tabled(rename = "Low")]
    low: String,
    #[tabled(rename = "Close")]
    close: String,
    #[tabled(rename = "MA")]
    moving_average: String,
    #[tabled(rename = "Return %")]
    return_pct: String,
    #[tabled(rename = "Return z")]
    return_zscore: String,
    #[tabled(rename = "Deviation z")]
    deviation_zscore: String,
    #[tabled(rename = "Position")]
    position: String,
}

impl From<&IndicatorRow> for BarRow {
    fn from(row: &IndicatorRow) -> Self {
        Self {
            time: format_time(row.open_time),
            open: format_price(row.open),
            high: format_price(row.high),
            low: format_price(row.low),
            close: format_price(row.close),
            moving_average: format_price(row.moving_average),
            return_pct: format!("{:.2}", row.return_pct),
            return_zscore: format_z(row.return_zscore),
            deviation_zscore: format_z(row.deviation_zscore),
            position: paint_position(row.position),
        }
    }
}

#[derive(Tabled)]
struct LevelRow {
    #[tabled(rename = "Threshold")]
    threshold: String,
    #[tabled(rename = "Series")]
    series: &'static str,
    #[tabled(rename = "Buy %")]
    buy_value: String,
    #[tabled(rename = "Buy z")]
    buy_z: String,
    #[tabled(rename = "Buy at")]
    buy_time: String,
    #[tabled(rename = "Sell %")]
    sell_value: String,
    #[tabled(rename = "Sell z")]
    sell_z: String,
    #[tabled(rename = "Sell at")]
    sell_time: String,
}

impl LevelRow {
    fn new(threshold: f64, series: &'static str, buy: Option<LevelPoint>, sell: Option<LevelPoint>) -> Self {
        let value = |p: Option<LevelPoint>| p.map(|p| format!("{:.2}", p.value_pct)).unwrap_or_else(dash);
        let z = |p: Option<LevelPoint>| format_z(p.map(|p| p.zscore));
        let time = |p: Option<LevelPoint>| p.map(|p| format_time(p.open_time)).unwrap_or_else(dash);
        Self {
            threshold: format!("±{}", threshold),
            series,
            buy_value: value(buy),
            buy_z: z(buy),
            buy_time: time(buy),
            sell_value: value(sell),
            sell_z: z(sell),
            sell_time: time(sell),
        }
    }
}

fn dash() -> String {
    "-".to_string()
}

pub fn format_time(open_time: i64) -> String {
    Utc.timestamp_millis_opt(open_time)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| open_time.to_string())
}

/// Two decimals for ordinary prices, more for sub-unit ones.
pub fn format_price(value: f64) -> String {
    if value.abs() >= 1.0 {
        format!("{:.2}", value)
    } else {
        format!("{:.6}", value)
    }
}

fn format_z(z: Option<f64>) -> String {
    z.map(|z| format!("{:.3}", z)).unwrap_or_else(dash)
}

fn paint_position(position: Position) -> String {
    match position {
        Position::Long => position.as_str().green().bold().to_string(),
        Position::Short => position.as_str().red().bold().to_string(),
        Position::None => position.as_str().dimmed().to_string(),
    }
}

fn format_stats(stats: Option<SeriesStats>) -> String {
    match stats {
        Some(s) => format!("mean {:.4}%, std {:.4}% over {} values", s.mean, s.std_dev, s.count),
        None => "n/a (no spread)".to_string(),
    }
}

/// Header, newest-first table and signal summary of one timeframe.
pub fn print_analysis(symbol: &Symbol, timeframe: &TimeframeSettings, table: &IndicatorTable, rows: usize) {
    let settings = &table.settings;
    println!(
        "\n{} {} {} | {} | Bollinger {} x{} | lookback {}",
        "===".bold(),
        symbol.to_string().bold(),
        timeframe.interval.bold(),
        table.ma_label,
        settings.band_window(),
        settings.band_stddev,
        timeframe.lookback
    );

    if table.is_empty() {
        println!("{}", "Not enough bars to fill the moving average windows.".yellow());
        return;
    }

    println!("Returns:   {}", format_stats(table.return_stats));
    println!("Deviation: {}", format_stats(table.deviation_stats));

    let newest_first: Vec<BarRow> = table.rows.iter().rev().take(rows).map(BarRow::from).collect();
    println!("{}", Table::new(newest_first).with(Style::rounded()));

    println!(
        "Signals over {} rows: {} {}, {} {} (thresholds {:?})",
        table.len(),
        table.count(Position::Long),
        "LONG".green(),
        table.count(Position::Short),
        "SHORT".red(),
        settings.thresholds
    );
    if let Some(last) = table.signals().last() {
        let threshold = last.signal_threshold.map(|t| format!(" at |z| > {}", t)).unwrap_or_default();
        println!(
            "Latest signal: {} on {} (close {}){}",
            paint_position(last.position),
            format_time(last.open_time),
            format_price(last.close),
            threshold
        );
    }
}

pub fn print_threshold_levels(symbol: &Symbol, interval: &str, table: &IndicatorTable, levels: &[ThresholdLevel]) {
    println!(
        "\n{} {} {} | {} | {} rows",
        "===".bold(),
        symbol.to_string().bold(),
        interval.bold(),
        table.ma_label,
        table.len()
    );
    println!("Returns:   {}", format_stats(table.return_stats));
    println!("Deviation: {}", format_stats(table.deviation_stats));

    let rows: Vec<LevelRow> = levels
        .iter()
        .flat_map(|level| {
            [
                LevelRow::new(level.threshold, "Returns", level.returns.buy, level.returns.sell),
                LevelRow::new(level.threshold, "Deviation", level.deviation.buy, level.deviation.sell),
            ]
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));

    if let (Some(last), Some(stats)) = (table.last(), table.deviation_stats) {
        // Deviation d at average m means close = m * (1 - d / 100).
        println!("Prices implied by the latest {} of {}:", table.ma_label, format_price(last.moving_average));
        for level in levels {
            let buy = last.moving_average * (1.0 - stats.value_at(level.threshold) / 100.0);
            let sell = last.moving_average * (1.0 - stats.value_at(-level.threshold) / 100.0);
            println!(
                "  z ±{:<6} buy below {}   sell above {}",
                level.threshold,
                format_price(buy).green(),
                format_price(sell).red()
            );
        }
    }
}

pub fn print_trend(symbol: &Symbol, interval: &str, settings: &TrendSettings, report: &TrendReport) {
    println!("\n{} {} {} | {} bars", "===".bold(), symbol.to_string().bold(), interval.bold(), report.bars);

    if let Some(close) = report.last_close {
        println!("Last close:              {}", format_price(close));
    }
    println!(
        "Risk-free rate:          {:.2}% a year, {:.6}% a bar",
        settings.annual_risk_free_rate * 100.0,
        report.risk_free_daily_rate * 100.0
    );
    println!("Sharpe ratio:            {}", format_z(report.sharpe_ratio));
    println!("Annualized Sharpe ratio: {}", format_z(report.annualized_sharpe_ratio));

    match (&report.snapshot, report.class) {
        (Some(snap), Some(class)) => {
            println!(
                "SMA {} / {} / {}:        {} / {} / {}",
                settings.fast_window,
                settings.medium_window,
                settings.slow_window,
                format_price(snap.fast),
                format_price(snap.medium),
                format_price(snap.slow)
            );
            let text = class.describe();
            let painted = match class {
                analytics::TrendClass::StrongUptrend
                | analytics::TrendClass::ModerateUptrend
                | analytics::TrendClass::WeakUptrend => text.green().bold(),
                analytics::TrendClass::NoTrend => text.yellow().bold(),
                _ => text.red().bold(),
            };
            println!("Trend:                   {}", painted);
        }
        _ => println!(
            "{}",
            format!("Trend: not enough bars for the {}-bar average.", settings.slow_window).yellow()
        ),
    }
}
