// In crates/indicators/src/pipeline.rs

use crate::bollinger::bollinger_bands;
use crate::error::{Error, Result};
use crate::factory::create_moving_average;
use crate::rolling::{deviation_from_average, pct_change, SeriesStats};
use crate::signal::label_positions;
use crate::types::{IndicatorRow, IndicatorSettings, IndicatorTable};
use core_types::{is_strictly_ordered, Kline};
use num_traits::ToPrimitive;

/// Runs the whole indicator chain over a bar series.
///
/// 1. moving average of close (simple or weighted)
/// 2. percent return from the previous close
/// 3. percent deviation of close from its moving average
/// 4. z-scores of both, each against its own whole-history statistics
/// 5. LONG/SHORT labels from the deviation z-score
/// 6. Bollinger envelope
///
/// Rows are dropped until every column is defined. The function is pure: the
/// same bars and settings always give the same table.
pub fn compute(klines: &[Kline], settings: &IndicatorSettings) -> Result<IndicatorTable> {
    settings.validate()?;
    if !is_strictly_ordered(klines) {
        return Err(Error::UnorderedBars);
    }

    let closes = klines
        .iter()
        .map(|k| k.close.to_f64().ok_or(Error::InvalidPrice { open_time: k.open_time }))
        .collect::<Result<Vec<f64>>>()?;

    let moving_average = create_moving_average(settings.ma_kind, settings.ma_window);
    let averages = moving_average.compute(&closes)?;
    let bands = bollinger_bands(&closes, settings.band_window(), settings.band_stddev)?;
    let returns = pct_change(&closes);
    let deviations = deviation_from_average(&closes, &averages);

    let return_stats = SeriesStats::sample(&returns);
    let deviation_stats = SeriesStats::sample(&deviations);
    let return_z = zscores_with(&returns, return_stats.as_ref(), "return");
    let deviation_z = zscores_with(&deviations, deviation_stats.as_ref(), "deviation");

    let marks = label_positions(&deviation_z, &settings.thresholds);

    let rows: Vec<IndicatorRow> = klines
        .iter()
        .enumerate()
        .filter_map(|(i, k)| {
            let (Some(ma), Some(band), Some(ret), Some(dev)) = (averages[i], bands[i], returns[i], deviations[i]) else {
                return None;
            };
            Some(IndicatorRow {
                open_time: k.open_time,
                open: k.open.to_f64().unwrap_or(f64::NAN),
                high: k.high.to_f64().unwrap_or(f64::NAN),
                low: k.low.to_f64().unwrap_or(f64::NAN),
                close: closes[i],
                moving_average: ma,
                band,
                return_pct: ret,
                deviation_pct: dev,
                return_zscore: return_z[i],
                deviation_zscore: deviation_z[i],
                position: marks[i].position,
                signal_threshold: marks[i].threshold,
            })
        })
        .collect();

    tracing::debug!(
        bars = klines.len(),
        rows = rows.len(),
        ma = %moving_average.label(),
        "Computed indicator table."
    );

    Ok(IndicatorTable {
        settings: settings.clone(),
        ma_label: moving_average.label(),
        rows,
        return_stats,
        deviation_stats,
    })
}

fn zscores_with(series: &[Option<f64>], stats: Option<&SeriesStats>, name: &str) -> Vec<Option<f64>> {
    match stats {
        Some(stats) if stats.std_dev > 0.0 => series.iter().map(|v| v.and_then(|x| stats.zscore(x))).collect(),
        _ => {
            tracing::warn!(series = name, "Series has no spread; its z-scores are undefined.");
            vec![None; series.len()]
        }
    }
}
