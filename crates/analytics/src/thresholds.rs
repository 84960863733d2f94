// In crates/analytics/src/thresholds.rs

use crate::types::{LevelPair, LevelPoint, ThresholdLevel};
use indicators::{IndicatorRow, IndicatorTable};
use std::cmp::Ordering;

/// For each threshold `t`, finds the most extreme rows still inside the
/// `[-t, t]` z-score band.
///
/// Returns: a high return z is a sell cue and a low one a buy cue, so the row
/// with the largest z `<= t` is the sell level and the row with the smallest
/// z `>= -t` the buy level.
///
/// Deviation: the deviation is positive when close sits below its average, so
/// the directions swap.
pub fn threshold_levels(table: &IndicatorTable, thresholds: &[f64]) -> Vec<ThresholdLevel> {
    thresholds
        .iter()
        .map(|&t| {
            let returns = LevelPair {
                sell: edge_within(&table.rows, |r| r.return_zscore, |r| r.return_pct, t, Edge::Upper),
                buy: edge_within(&table.rows, |r| r.return_zscore, |r| r.return_pct, t, Edge::Lower),
            };
            let deviation = LevelPair {
                buy: edge_within(&table.rows, |r| r.deviation_zscore, |r| r.deviation_pct, t, Edge::Upper),
                sell: edge_within(&table.rows, |r| r.deviation_zscore, |r| r.deviation_pct, t, Edge::Lower),
            };
            ThresholdLevel { threshold: t, returns, deviation }
        })
        .collect()
}

#[derive(Clone, Copy)]
enum Edge {
    /// largest z with z <= t
    Upper,
    /// smallest z with z >= -t
    Lower,
}

fn edge_within(
    rows: &[IndicatorRow],
    zscore: impl Fn(&IndicatorRow) -> Option<f64>,
    value: impl Fn(&IndicatorRow) -> f64,
    threshold: f64,
    edge: Edge,
) -> Option<LevelPoint> {
    let candidates = rows.iter().filter_map(|r| zscore(r).map(|z| (r, z)));
    let picked = match edge {
        Edge::Upper => candidates
            .filter(|(_, z)| *z <= threshold)
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal)),
        Edge::Lower => candidates
            .filter(|(_, z)| *z >= -threshold)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal)),
    };

    picked.map(|(r, z)| LevelPoint {
        open_time: r.open_time,
        zscore: z,
        value_pct: value(r),
        return_pct: r.return_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Position;
    use indicators::bollinger::BollingerPoint;
    use indicators::IndicatorSettings;

    fn row(open_time: i64, return_pct: f64, return_z: f64, deviation_pct: f64, deviation_z: f64) -> IndicatorRow {
        IndicatorRow {
            open_time,
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
            moving_average: 1.0,
            band: BollingerPoint { average: 1.0, std_dev: 0.0, upper: 1.0, lower: 1.0 },
            return_pct,
            deviation_pct,
            return_zscore: Some(return_z),
            deviation_zscore: Some(deviation_z),
            position: Position::None,
            signal_threshold: None,
        }
    }

    fn table(rows: Vec<IndicatorRow>) -> IndicatorTable {
        IndicatorTable {
            settings: IndicatorSettings::new(20),
            ma_label: "SMA 20".into(),
            rows,
            return_stats: None,
            deviation_stats: None,
        }
    }

    #[test]
    fn picks_the_rows_closest_to_each_band_edge() {
        let t = table(vec![
            row(1, 3.0, 2.5, -4.0, -2.6),
            row(2, 1.5, 1.9, -1.0, -1.7),
            row(3, -1.2, -1.8, 2.0, 1.95),
            row(4, -3.5, -2.4, 5.0, 2.7),
        ]);

        let levels = threshold_levels(&t, &[2.0]);
        let level = levels[0];

        assert_eq!(level.threshold, 2.0);
        assert_eq!(level.returns.sell.unwrap().open_time, 2);
        assert_eq!(level.returns.buy.unwrap().open_time, 3);
        assert_eq!(level.returns.sell.unwrap().value_pct, 1.5);

        assert_eq!(level.deviation.buy.unwrap().open_time, 3);
        assert_eq!(level.deviation.sell.unwrap().open_time, 2);
        assert_eq!(level.deviation.buy.unwrap().value_pct, 2.0);
        assert_eq!(level.deviation.buy.unwrap().return_pct, -1.2);
    }

    #[test]
    fn wide_threshold_reaches_the_extremes() {
        let t = table(vec![row(1, 3.0, 2.5, -4.0, -2.6), row(2, -3.5, -2.4, 5.0, 2.7)]);
        let level = threshold_levels(&t, &[3.0])[0];
        assert_eq!(level.returns.sell.unwrap().open_time, 1);
        assert_eq!(level.returns.buy.unwrap().open_time, 2);
    }

    #[test]
    fn empty_table_has_no_levels() {
        let level = threshold_levels(&table(vec![]), &[1.618])[0];
        assert_eq!(level.returns, LevelPair::default());
        assert_eq!(level.deviation, LevelPair::default());
    }
}
