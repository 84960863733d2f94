// In crates/analytics/src/trend.rs

use crate::types::{TrendClass, TrendSnapshot};

/// Maps the three stacking flags of a [`TrendSnapshot`] to a trend class.
///
/// | fast > medium | medium > slow | slow below both | class |
/// |---|---|---|---|
/// | yes | yes | yes | strong uptrend |
/// | yes | yes | no  | moderate uptrend |
/// | yes | no  | yes | weak uptrend |
/// | yes | no  | no  | no trend |
/// | no  | yes | yes | no trend |
/// | no  | yes | no  | weak downtrend |
/// | no  | no  | yes | moderate downtrend |
/// | no  | no  | no  | strong downtrend |
pub fn classify(fast_above_medium: bool, medium_above_slow: bool, slow_below_both: bool) -> TrendClass {
    match (fast_above_medium, medium_above_slow, slow_below_both) {
        (true, true, true) => TrendClass::StrongUptrend,
        (true, true, false) => TrendClass::ModerateUptrend,
        (true, false, true) => TrendClass::WeakUptrend,
        (true, false, false) => TrendClass::NoTrend,
        (false, true, true) => TrendClass::NoTrend,
        (false, true, false) => TrendClass::WeakDowntrend,
        (false, false, true) => TrendClass::ModerateDowntrend,
        (false, false, false) => TrendClass::StrongDowntrend,
    }
}

impl TrendSnapshot {
    pub fn new(open_time: i64, close: f64, fast: f64, medium: f64, slow: f64) -> Self {
        Self {
            open_time,
            close,
            fast,
            medium,
            slow,
            fast_above_medium: fast > medium,
            medium_above_slow: medium > slow,
            slow_below_both: slow < medium && slow < fast,
        }
    }

    pub fn class(&self) -> TrendClass {
        classify(self.fast_above_medium, self.medium_above_slow, self.slow_below_both)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacked_averages_read_as_strong_trends() {
        assert_eq!(TrendSnapshot::new(0, 10.0, 9.0, 8.0, 7.0).class(), TrendClass::StrongUptrend);
        assert_eq!(TrendSnapshot::new(0, 6.0, 7.0, 8.0, 9.0).class(), TrendClass::StrongDowntrend);
    }

    #[test]
    fn fast_dipping_below_medium_in_an_uptrend_is_no_trend() {
        // fast < medium, medium > slow, slow below both
        let snapshot = TrendSnapshot::new(0, 9.0, 8.5, 9.0, 8.0);
        assert!(!snapshot.fast_above_medium);
        assert!(snapshot.medium_above_slow);
        assert!(snapshot.slow_below_both);
        assert_eq!(snapshot.class(), TrendClass::NoTrend);
    }

    #[test]
    fn medium_above_slow_with_slow_above_fast_is_weak_downtrend() {
        let snapshot = TrendSnapshot::new(0, 7.0, 7.0, 9.0, 8.0);
        assert_eq!(snapshot.class(), TrendClass::WeakDowntrend);
    }

    #[test]
    fn decision_table_is_total() {
        let expected = [
            ((true, true, true), TrendClass::StrongUptrend),
            ((true, true, false), TrendClass::ModerateUptrend),
            ((true, false, true), TrendClass::WeakUptrend),
            ((true, false, false), TrendClass::NoTrend),
            ((false, true, true), TrendClass::NoTrend),
            ((false, true, false), TrendClass::WeakDowntrend),
            ((false, false, true), TrendClass::ModerateDowntrend),
            ((false, false, false), TrendClass::StrongDowntrend),
        ];
        for ((a, b, c), class) in expected {
            assert_eq!(classify(a, b, c), class);
        }
    }
}
