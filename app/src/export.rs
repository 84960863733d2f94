// In app/src/export.rs

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use indicators::{IndicatorRow, IndicatorTable};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// One flat CSV record; `None` values are written as empty cells.
#[derive(Serialize)]
struct ExportRecord {
    open_time: i64,
    time: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    moving_average: f64,
    band_average: f64,
    band_std_dev: f64,
    band_upper: f64,
    band_lower: f64,
    return_pct: f64,
    deviation_pct: f64,
    return_zscore: Option<f64>,
    deviation_zscore: Option<f64>,
    position: &'static str,
    signal_threshold: Option<f64>,
}

impl From<&IndicatorRow> for ExportRecord {
    fn from(row: &IndicatorRow) -> Self {
        Self {
            open_time: row.open_time,
            time: Utc
                .timestamp_millis_opt(row.open_time)
                .single()
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            moving_average: row.moving_average,
            band_average: row.band.average,
            band_std_dev: row.band.std_dev,
            band_upper: row.band.upper,
            band_lower: row.band.lower,
            return_pct: row.return_pct,
            deviation_pct: row.deviation_pct,
            return_zscore: row.return_zscore,
            deviation_zscore: row.deviation_zscore,
            position: row.position.as_str(),
            signal_threshold: row.signal_threshold,
        }
    }
}

/// When several timeframes share one `--export` path, each gets the interval
/// appended to the file stem: `out.csv` becomes `out_1h.csv`.
pub fn path_for(path: &Path, interval: &str, multiple: bool) -> PathBuf {
    if !multiple {
        return path.to_path_buf();
    }
    let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, interval, ext.to_string_lossy()),
        None => format!("{}_{}", stem, interval),
    };
    path.with_file_name(name)
}

/// Writes the table oldest row first, with a header.
pub fn write_records<W: Write>(writer: W, table: &IndicatorTable) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in &table.rows {
        writer.serialize(ExportRecord::from(row))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_table(path: &Path, table: &IndicatorTable) -> Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    write_records(file, table)
}
