// In crates/core-types/src/types.rs

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A trading symbol as the market-data provider names it (e.g. "BTCUSDT").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Symbol(value.to_string())
    }
}

/// A single OHLCV bar.
///
/// Prices are kept as `Decimal` exactly as the provider reported them;
/// indicator code converts to `f64` at its own boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kline {
    /// Bar open time in milliseconds since the Unix epoch.
    pub open_time: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    /// Carried from the provider; no computation reads it.
    pub volume: Decimal,
    /// Bar close time in milliseconds since the Unix epoch.
    pub close_time: i64,
}

impl Kline {
    /// The bar's open time as a UTC timestamp, if it is representable.
    pub fn open_datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.open_time).single()
    }
}

/// The categorical label the z-score signal rule attaches to a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    #[default]
    None,
    Long,
    Short,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::None => "NONE",
            Position::Long => "LONG",
            Position::Short => "SHORT",
        }
    }

    pub fn is_signal(&self) -> bool {
        !matches!(self, Position::None)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sorts bars by open time and drops repeated open times, keeping the first
/// occurrence of each.
pub fn normalize_bars(mut klines: Vec<Kline>) -> Vec<Kline> {
    klines.sort_by_key(|k| k.open_time);
    klines.dedup_by_key(|k| k.open_time);
    klines
}

/// True when every bar opens strictly after the one before it.
pub fn is_strictly_ordered(klines: &[Kline]) -> bool {
    klines.windows(2).all(|w| w[0].open_time < w[1].open_time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn bar(open_time: i64, close: Decimal) -> Kline {
        Kline {
            open_time,
            open: close,
            high: close,
            low: close,
            close,
            volume: dec!(0),
            close_time: open_time + 59_999,
        }
    }

    #[test]
    fn normalize_sorts_and_keeps_first_duplicate() {
        let bars = vec![
            bar(3_000, dec!(3)),
            bar(1_000, dec!(1)),
            bar(2_000, dec!(2)),
            bar(1_000, dec!(9)),
        ];

        let normalized = normalize_bars(bars);

        let times: Vec<i64> = normalized.iter().map(|k| k.open_time).collect();
        assert_eq!(times, vec![1_000, 2_000, 3_000]);
        assert_eq!(normalized[0].close, dec!(1));
        assert!(is_strictly_ordered(&normalized));
    }

    #[test]
    fn detects_unordered_and_repeated_bars() {
        assert!(!is_strictly_ordered(&[bar(2, dec!(1)), bar(1, dec!(1))]));
        assert!(!is_strictly_ordered(&[bar(1, dec!(1)), bar(1, dec!(1))]));
        assert!(is_strictly_ordered(&[]));
    }

    #[test]
    fn position_labels_render_upper_case() {
        assert_eq!(Position::default().to_string(), "NONE");
        assert_eq!(Position::Long.to_string(), "LONG");
        assert_eq!(Position::Short.as_str(), "SHORT");
        assert!(Position::Short.is_signal());
        assert!(!Position::None.is_signal());
    }
}
