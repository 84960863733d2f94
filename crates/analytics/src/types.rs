// In crates/analytics/src/types.rs

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TrendSettings {
    #[serde(default = "default_fast")]
    pub fast_window: usize,
    #[serde(default = "default_medium")]
    pub medium_window: usize,
    #[serde(default = "default_slow")]
    pub slow_window: usize,
    /// Annual risk-free rate as a fraction (0.1265 = 12.65 %).
    #[serde(default = "default_risk_free")]
    pub annual_risk_free_rate: f64,
    /// Bars per year used to de-annualise the risk-free rate and annualise
    /// the Sharpe ratio.
    #[serde(default = "default_periods")]
    pub periods_per_year: u32,
}

fn default_fast() -> usize { 21 }
fn default_medium() -> usize { 50 }
fn default_slow() -> usize { 80 }
fn default_risk_free() -> f64 { 0.1265 }
fn default_periods() -> u32 { 252 }

impl Default for TrendSettings {
    fn default() -> Self {
        Self {
            fast_window: default_fast(),
            medium_window: default_medium(),
            slow_window: default_slow(),
            annual_risk_free_rate: default_risk_free(),
            periods_per_year: default_periods(),
        }
    }
}

/// The three moving averages on the newest bar and how they are stacked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendSnapshot {
    pub open_time: i64,
    pub close: f64,
    pub fast: f64,
    pub medium: f64,
    pub slow: f64,
    pub fast_above_medium: bool,
    pub medium_above_slow: bool,
    pub slow_below_both: bool,
}

/// Qualitative reading of the moving-average stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendClass {
    StrongUptrend,
    ModerateUptrend,
    WeakUptrend,
    NoTrend,
    WeakDowntrend,
    ModerateDowntrend,
    StrongDowntrend,
}

impl TrendClass {
    pub fn describe(&self) -> &'static str {
        match self {
            TrendClass::StrongUptrend => "Strong uptrend",
            TrendClass::ModerateUptrend => "Moderate uptrend",
            TrendClass::WeakUptrend => "Weak uptrend",
            TrendClass::NoTrend => "No trend",
            TrendClass::WeakDowntrend => "Weak downtrend",
            TrendClass::ModerateDowntrend => "Moderate downtrend",
            TrendClass::StrongDowntrend => "Strong downtrend",
        }
    }
}

impl fmt::Display for TrendClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Output of the `trend` study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub bars: usize,
    pub last_close: Option<f64>,
    pub risk_free_daily_rate: f64,
    pub sharpe_ratio: Option<f64>,
    pub annualized_sharpe_ratio: Option<f64>,
    pub snapshot: Option<TrendSnapshot>,
    pub class: Option<TrendClass>,
}

/// A row picked as the edge of a z-score band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelPoint {
    pub open_time: i64,
    pub zscore: f64,
    /// Value of the studied series (return or deviation) on that row.
    pub value_pct: f64,
    /// Close-to-close return on that row.
    pub return_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LevelPair {
    pub buy: Option<LevelPoint>,
    pub sell: Option<LevelPoint>,
}

/// Buy/sell levels of one z-score threshold, for returns and for the
/// deviation from the moving average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdLevel {
    pub threshold: f64,
    pub returns: LevelPair,
    pub deviation: LevelPair,
}
