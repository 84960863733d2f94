// In crates/analytics/src/engine.rs

use crate::error::{Error, Result};
use crate::sharpe::{annualized_sharpe_ratio, daily_returns, riskfree_daily_rate, sharpe_ratio};
use crate::types::{TrendReport, TrendSettings, TrendSnapshot};
use core_types::Kline;
use indicators::rolling::sma;
use num_traits::ToPrimitive;

/// Computes the Sharpe and moving-average trend study over a bar series.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {
    settings: TrendSettings,
}

impl AnalyticsEngine {
    pub fn new(settings: TrendSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &TrendSettings {
        &self.settings
    }

    /// Builds a full trend report.
    ///
    /// The snapshot and class are `None` when the history is shorter than the
    /// slowest moving average.
    pub fn trend_report(&self, klines: &[Kline]) -> Result<TrendReport> {
        let s = &self.settings;
        if s.fast_window == 0 || s.medium_window == 0 || s.slow_window == 0 {
            return Err(Error::InvalidParameters("moving average windows must be at least 1".into()));
        }
        if s.periods_per_year == 0 {
            return Err(Error::InvalidParameters("periods_per_year must be at least 1".into()));
        }

        let closes = klines
            .iter()
            .map(|k| k.close.to_f64().ok_or(Error::InvalidPrice { open_time: k.open_time }))
            .collect::<Result<Vec<f64>>>()?;

        let returns = daily_returns(&closes);
        let rf = riskfree_daily_rate(s.annual_risk_free_rate, s.periods_per_year);

        let snapshot = match (klines.last(), closes.last()) {
            (Some(last), Some(close)) => {
                let fast = sma(&closes, s.fast_window)?;
                let medium = sma(&closes, s.medium_window)?;
                let slow = sma(&closes, s.slow_window)?;
                match (fast.last().copied().flatten(), medium.last().copied().flatten(), slow.last().copied().flatten()) {
                    (Some(f), Some(m), Some(sl)) => Some(TrendSnapshot::new(last.open_time, *close, f, m, sl)),
                    _ => None,
                }
            }
            _ => None,
        };

        if snapshot.is_none() {
            tracing::warn!(
                bars = klines.len(),
                slow_window = s.slow_window,
                "Not enough history for the trend snapshot."
            );
        }

        Ok(TrendReport {
            bars: klines.len(),
            last_close: closes.last().copied(),
            risk_free_daily_rate: rf,
            sharpe_ratio: sharpe_ratio(&returns, rf),
            annualized_sharpe_ratio: annualized_sharpe_ratio(&returns, rf, s.periods_per_year),
            class: snapshot.as_ref().map(TrendSnapshot::class),
            snapshot,
        })
    }
}
