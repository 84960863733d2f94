// In crates/app-config/src/types.rs

use analytics::TrendSettings;
use core_types::{Lookback, LookbackUnit};
use indicators::{IndicatorSettings, MaKind};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Settings {
    /// The application's general settings.
    #[serde(default)]
    pub app: AppSettings,
    /// Settings for the market-data provider.
    #[serde(default)]
    pub provider: ProviderSettings,
    /// Defaults for the `analyze` command.
    #[serde(default)]
    pub analysis: AnalysisSettings,
    /// Defaults for the `thresholds` command.
    #[serde(default)]
    pub thresholds: ThresholdStudySettings,
    /// Defaults for the `trend` command.
    #[serde(default)]
    pub trend: TrendStudySettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development").
    #[serde(default = "default_environment")]
    pub environment: String,
    /// The default log level ("trace" through "error").
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ProviderSettings {
    /// The REST API base URL for Binance futures.
    #[serde(default = "default_rest_base_url")]
    pub rest_base_url: String,
    /// Optional API key, sent as `X-MBX-APIKEY` when present.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Klines requested per page (the endpoint caps this at 1500).
    #[serde(default = "default_page_limit")]
    pub page_limit: u16,
    /// Pause between consecutive page requests.
    #[serde(default = "default_request_pause_ms")]
    pub request_pause_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            rest_base_url: default_rest_base_url(),
            api_key: None,
            page_limit: default_page_limit(),
            request_pause_ms: default_request_pause_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// One chart of the dashboard: a bar interval, how much history to pull and
/// the windows to compute over it.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct TimeframeSettings {
    pub interval: String,
    pub lookback: Lookback,
    pub ma_window: usize,
    #[serde(default)]
    pub ma_kind: MaKind,
    #[serde(default)]
    pub band_window: Option<usize>,
}

impl TimeframeSettings {
    pub fn indicator_settings(&self, band_stddev: f64, thresholds: &[f64]) -> IndicatorSettings {
        IndicatorSettings {
            ma_window: self.ma_window,
            ma_kind: self.ma_kind,
            band_window: self.band_window,
            band_stddev,
            thresholds: thresholds.to_vec(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct AnalysisSettings {
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Smallest window accepted for any moving average or band.
    #[serde(default = "default_min_window")]
    pub min_window: usize,
    /// Rows printed in the console table, newest first.
    #[serde(default = "default_display_rows")]
    pub display_rows: usize,
    /// Bars drawn in the text chart.
    #[serde(default = "default_chart_rows")]
    pub chart_rows: usize,
    #[serde(default = "default_band_stddev")]
    pub band_stddev: f64,
    #[serde(default = "default_analysis_thresholds")]
    pub thresholds: Vec<f64>,
    #[serde(default = "default_timeframes")]
    pub timeframes: Vec<TimeframeSettings>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            min_window: default_min_window(),
            display_rows: default_display_rows(),
            chart_rows: default_chart_rows(),
            band_stddev: default_band_stddev(),
            thresholds: default_analysis_thresholds(),
            timeframes: default_timeframes(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ThresholdStudySettings {
    #[serde(default = "default_daily_interval")]
    pub interval: String,
    #[serde(default = "default_two_years")]
    pub lookback: Lookback,
    #[serde(default = "default_min_window")]
    pub ma_window: usize,
    #[serde(default = "default_weighted")]
    pub ma_kind: MaKind,
    #[serde(default = "default_study_thresholds")]
    pub thresholds: Vec<f64>,
}

impl Default for ThresholdStudySettings {
    fn default() -> Self {
        Self {
            interval: default_daily_interval(),
            lookback: default_two_years(),
            ma_window: default_min_window(),
            ma_kind: default_weighted(),
            thresholds: default_study_thresholds(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct TrendStudySettings {
    #[serde(default = "default_daily_interval")]
    pub interval: String,
    #[serde(default = "default_trend_lookback")]
    pub lookback: Lookback,
    /// Moving-average windows and Sharpe inputs.
    #[serde(default)]
    pub params: TrendSettings,
}

impl Default for TrendStudySettings {
    fn default() -> Self {
        Self {
            interval: default_daily_interval(),
            lookback: default_trend_lookback(),
            params: TrendSettings::default(),
        }
    }
}

/// Helper functions for serde defaults
fn default_environment() -> String { "development".into() }
fn default_log_level() -> String { "info".into() }
fn default_rest_base_url() -> String { "https://fapi.binance.com".into() }
fn default_page_limit() -> u16 { 1000 }
fn default_request_pause_ms() -> u64 { 250 }
fn default_timeout_secs() -> u64 { 30 }
fn default_symbol() -> String { "BTCUSDT".into() }
fn default_min_window() -> usize { 20 }
fn default_display_rows() -> usize { 10 }
fn default_chart_rows() -> usize { 60 }
fn default_band_stddev() -> f64 { 2.0 }
fn default_analysis_thresholds() -> Vec<f64> { vec![2.0, 3.0] }
fn default_study_thresholds() -> Vec<f64> { vec![1.618, 2.0, 3.0] }
fn default_daily_interval() -> String { "1d".into() }
fn default_two_years() -> Lookback { Lookback::new(2, LookbackUnit::Years) }
fn default_trend_lookback() -> Lookback { Lookback::new(504, LookbackUnit::Days) }
fn default_weighted() -> MaKind { MaKind::Weighted }

fn default_timeframes() -> Vec<TimeframeSettings> {
    vec![
        TimeframeSettings {
            interval: "1d".into(),
            lookback: Lookback::new(2, LookbackUnit::Years),
            ma_window: 50,
            ma_kind: MaKind::Simple,
            band_window: Some(50),
        },
        TimeframeSettings {
            interval: "1h".into(),
            lookback: Lookback::new(6, LookbackUnit::Months),
            ma_window: 20,
            ma_kind: MaKind::Simple,
            band_window: Some(20),
        },
    ]
}
