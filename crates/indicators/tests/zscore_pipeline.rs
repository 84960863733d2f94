use core_types::{Kline, Position};
use indicators::{compute, IndicatorSettings, MaKind};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

const HOUR_MS: i64 = 3_600_000;

fn klines_from(closes: &[f64]) -> Vec<Kline> {
    closes
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let price = Decimal::from_f64(*c).unwrap().round_dp(6);
            Kline {
                open_time: i as i64 * HOUR_MS,
                open: price,
                high: price,
                low: price,
                close: price,
                volume: Decimal::ZERO,
                close_time: (i as i64 + 1) * HOUR_MS - 1,
            }
        })
        .collect()
}

fn wavy_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + 5.0 * (i as f64 * 0.37).sin() + 0.05 * i as f64)
        .collect()
}

fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn four_bar_reference_example() {
    let mut settings = IndicatorSettings::new(2);
    settings.thresholds.clear();

    let table = compute(&klines_from(&[100.0, 101.0, 99.0, 103.0]), &settings).unwrap();

    // bar 1 has no return, so rows start at bar 2
    assert_eq!(table.len(), 3);
    assert_close(table.rows[1].moving_average, 100.0, 1e-9);
    assert_close(table.rows[2].moving_average, 101.0, 1e-9);
    assert_close(table.rows[0].return_pct, 1.0, 1e-9);
    assert_close(table.rows[1].return_pct, -1.98, 0.005);
    assert_close(table.rows[2].return_pct, 4.04, 0.005);
}

#[test]
fn row_count_is_input_minus_warmup() {
    for (n, window) in [(60, 20), (60, 50), (25, 20), (20, 20), (10, 2)] {
        let settings = IndicatorSettings::new(window);
        let table = compute(&klines_from(&wavy_closes(n)), &settings).unwrap();
        let warmup = (window - 1).max(1);
        assert_eq!(table.len(), n.saturating_sub(warmup), "n={n} window={window}");
    }
}

#[test]
fn longer_band_window_extends_the_warmup() {
    let mut settings = IndicatorSettings::new(20);
    settings.band_window = Some(30);
    let table = compute(&klines_from(&wavy_closes(100)), &settings).unwrap();
    assert_eq!(table.len(), 100 - 29);
}

#[test]
fn threshold_order_never_moves_zscores() {
    let closes = wavy_closes(120);
    let mut ascending = IndicatorSettings::new(20);
    ascending.thresholds = vec![1.618, 2.0, 3.0];
    let mut shuffled = ascending.clone();
    shuffled.thresholds = vec![3.0, 2.0, 1.618, 2.0];

    let a = compute(&klines_from(&closes), &ascending).unwrap();
    let b = compute(&klines_from(&closes), &shuffled).unwrap();

    for (ra, rb) in a.rows.iter().zip(&b.rows) {
        assert_eq!(ra.return_zscore, rb.return_zscore);
        assert_eq!(ra.deviation_zscore, rb.deviation_zscore);
        assert_eq!(ra.position, rb.position);
    }
}

#[test]
fn recomputing_is_deterministic() {
    let bars = klines_from(&wavy_closes(80));
    let mut settings = IndicatorSettings::new(21);
    settings.ma_kind = MaKind::Weighted;

    assert_eq!(compute(&bars, &settings).unwrap(), compute(&bars, &settings).unwrap());
}

#[test]
fn sharp_drop_below_average_is_flagged_long() {
    let mut closes = wavy_closes(80);
    closes.push(60.0);
    let mut settings = IndicatorSettings::new(20);
    settings.thresholds = vec![2.0, 3.0];

    let table = compute(&klines_from(&closes), &settings).unwrap();
    let last = table.last().unwrap();

    assert!(last.deviation_pct > 0.0);
    assert!(last.deviation_zscore.unwrap() > 3.0);
    assert_eq!(last.position, Position::Long);
    assert_eq!(last.signal_threshold, Some(3.0));
    assert_eq!(table.signals().last().map(|r| r.open_time), Some(last.open_time));
}

#[test]
fn sharp_spike_above_average_is_flagged_short() {
    let mut closes = wavy_closes(80);
    closes.push(160.0);
    let settings = IndicatorSettings::new(20);

    let table = compute(&klines_from(&closes), &settings).unwrap();
    let last = table.last().unwrap();

    assert!(last.deviation_zscore.unwrap() < -3.0);
    assert_eq!(last.position, Position::Short);
    assert!(table.count(Position::Short) >= 1);
}

#[test]
fn bands_bracket_the_band_average() {
    let table = compute(&klines_from(&wavy_closes(60)), &IndicatorSettings::new(20)).unwrap();
    for row in &table.rows {
        assert!(row.band.lower <= row.band.average && row.band.average <= row.band.upper);
        // same window and kind, so the band average is the moving average
        assert_close(row.band.average, row.moving_average, 1e-9);
    }
}
