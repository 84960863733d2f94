// In crates/api-client/src/csv_source.rs

use crate::error::{Error, Result};
use crate::source::BarSource;
use crate::types::BarRequest;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use core_types::{normalize_bars, Kline};
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

/// Offline price history: a CSV file with a header row followed by
/// `timestamp,open,high,low,close[,volume]` records.
#[derive(Debug, Clone)]
pub struct CsvSource {
    pub path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parses every record of `reader`. Bars come back sorted and unique.
    pub fn parse_reader<R: Read>(reader: R) -> Result<Vec<Kline>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut bars = Vec::new();
        for record in reader.records() {
            let record = record?;
            // Header is line 1.
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            bars.push(parse_record(&record, line)?);
        }
        Ok(normalize_bars(bars))
    }
}

#[async_trait]
impl BarSource for CsvSource {
    fn name(&self) -> &'static str {
        "csv"
    }

    /// Loads the file and keeps the bars inside the requested lookback,
    /// measured back from the newest bar unless the request names an end.
    async fn fetch_bars(&self, request: &BarRequest) -> Result<Vec<Kline>> {
        let file = File::open(&self.path)?;
        let bars = Self::parse_reader(file)?;

        let Some(newest) = bars.last().and_then(|k| k.open_datetime()) else {
            return Ok(bars);
        };
        let (start, end) = request.range_millis(newest)?;
        let total = bars.len();
        let bars: Vec<Kline> = bars
            .into_iter()
            .filter(|k| k.open_time >= start && k.open_time <= end)
            .collect();

        info!(
            path = %self.path.display(),
            read = total,
            kept = bars.len(),
            "Loaded price history from file"
        );
        Ok(bars)
    }
}

fn parse_record(record: &StringRecord, line: u64) -> Result<Kline> {
    if record.len() < 5 {
        return Err(Error::InvalidRow {
            line,
            reason: format!("expected at least 5 columns, found {}", record.len()),
        });
    }

    let open_time = parse_timestamp(&record[0]).ok_or_else(|| Error::InvalidRow {
        line,
        reason: format!("unrecognised timestamp '{}'", &record[0]),
    })?;
    let field = |idx: usize, name: &str| -> Result<Decimal> {
        Decimal::from_str(&record[idx]).map_err(|_| Error::InvalidRow {
            line,
            reason: format!("{} '{}' is not a number", name, &record[idx]),
        })
    };

    let volume = match record.get(5) {
        Some(v) if !v.is_empty() => field(5, "volume")?,
        _ => Decimal::ZERO,
    };

    Ok(Kline {
        open_time,
        open: field(1, "open")?,
        high: field(2, "high")?,
        low: field(3, "low")?,
        close: field(4, "close")?,
        volume,
        close_time: open_time,
    })
}

/// Accepts RFC 3339, `%Y-%m-%d %H:%M:%S` (UTC, optionally with an offset),
/// a bare date, or epoch milliseconds.
fn parse_timestamp(raw: &str) -> Option<i64> {
    if let Ok(ms) = raw.parse::<i64>() {
        return Some(ms);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.timestamp_millis());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive).timestamp_millis());
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?).timestamp_millis())
}
