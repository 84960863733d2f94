// In crates/indicators/src/types.rs

use crate::bollinger::BollingerPoint;
use crate::error::{Error, Result};
use crate::rolling::SeriesStats;
use core_types::Position;
use serde::{Deserialize, Serialize};

/// Which moving average the deviation signal is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaKind {
    #[default]
    Simple,
    Weighted,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IndicatorSettings {
    /// Trailing window of the moving average.
    pub ma_window: usize,
    #[serde(default)]
    pub ma_kind: MaKind,
    /// Trailing window of the Bollinger envelope; the MA window when unset.
    #[serde(default)]
    pub band_window: Option<usize>,
    #[serde(default = "default_band_stddev")]
    pub band_stddev: f64,
    /// Z-score magnitudes, applied in order.
    #[serde(default = "default_thresholds")]
    pub thresholds: Vec<f64>,
}

fn default_band_stddev() -> f64 {
    2.0
}

fn default_thresholds() -> Vec<f64> {
    vec![1.618, 2.0, 3.0]
}

impl IndicatorSettings {
    pub fn new(ma_window: usize) -> Self {
        Self {
            ma_window,
            ma_kind: MaKind::default(),
            band_window: None,
            band_stddev: default_band_stddev(),
            thresholds: default_thresholds(),
        }
    }

    pub fn band_window(&self) -> usize {
        self.band_window.unwrap_or(self.ma_window)
    }

    /// Leading bars that can never produce a complete row.
    pub fn warmup_bars(&self) -> usize {
        (self.ma_window.saturating_sub(1))
            .max(self.band_window().saturating_sub(1))
            .max(1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ma_window == 0 {
            return Err(Error::InvalidParameters("moving average window must be at least 1".into()));
        }
        if self.band_window() < 2 {
            return Err(Error::InvalidParameters(format!(
                "Bollinger window must be at least 2, got {}",
                self.band_window()
            )));
        }
        if !self.band_stddev.is_finite() || self.band_stddev < 0.0 {
            return Err(Error::InvalidParameters(format!(
                "Bollinger multiplier must be a non-negative number, got {}",
                self.band_stddev
            )));
        }
        if let Some(bad) = self.thresholds.iter().find(|t| !t.is_finite() || **t <= 0.0) {
            return Err(Error::InvalidParameters(format!(
                "z-score thresholds must be positive numbers, got {}",
                bad
            )));
        }
        Ok(())
    }
}

/// One bar with every derived column filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub moving_average: f64,
    pub band: BollingerPoint,
    /// Percent change of close from the previous bar.
    pub return_pct: f64,
    /// `(1 - close / moving_average) * 100`.
    pub deviation_pct: f64,
    pub return_zscore: Option<f64>,
    pub deviation_zscore: Option<f64>,
    pub position: Position,
    /// The threshold that produced `position`, if any.
    pub signal_threshold: Option<f64>,
}

/// The bar series augmented with indicator columns, warm-up rows removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorTable {
    pub settings: IndicatorSettings,
    /// Short name of the moving average, e.g. "SMA 50".
    pub ma_label: String,
    pub rows: Vec<IndicatorRow>,
    /// Whole-history statistics of the return column.
    pub return_stats: Option<SeriesStats>,
    /// Whole-history statistics of the deviation column.
    pub deviation_stats: Option<SeriesStats>,
}

impl IndicatorTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }

    /// Rows labeled `LONG` or `SHORT`, oldest first.
    pub fn signals(&self) -> impl Iterator<Item = &IndicatorRow> {
        self.rows.iter().filter(|r| r.position.is_signal())
    }

    pub fn count(&self, position: Position) -> usize {
        self.rows.iter().filter(|r| r.position == position).count()
    }
}
