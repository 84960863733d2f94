// In crates/indicators/src/rolling.rs

//! Series transforms over a close-price column.
//!
//! Every function returns a vector aligned with its input: index `i` of the
//! output describes bar `i`, and `None` marks bars where the value is
//! undefined (not enough trailing history, or a division by zero).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use ta::indicators::SimpleMovingAverage as Sma;
use ta::Next;

/// Arithmetic mean over the trailing `window` values.
///
/// A window of identical values averages to exactly that value; the running
/// sum inside `ta` would otherwise leave rounding residue.
pub fn sma(values: &[f64], window: usize) -> Result<Vec<Option<f64>>> {
    let mut sma = Sma::new(window).map_err(|e| Error::Library(format!("{:?}", e)))?;

    Ok(values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let avg = sma.next(*v);
            if i + 1 < window {
                return None;
            }
            Some(flat_value(&values[i + 1 - window..=i]).unwrap_or(avg))
        })
        .collect())
}

/// Mean over the trailing `window` values weighted `1..=window`, oldest to
/// newest.
pub fn wma(values: &[f64], window: usize) -> Result<Vec<Option<f64>>> {
    if window == 0 {
        return Err(Error::InvalidParameters("WMA window must be at least 1".into()));
    }
    let weight_sum = (window * (window + 1)) as f64 / 2.0;

    Ok((0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            if let Some(v) = flat_value(slice) {
                return Some(v);
            }
            let weighted: f64 = slice
                .iter()
                .enumerate()
                .map(|(j, v)| (j + 1) as f64 * v)
                .sum();
            Some(weighted / weight_sum)
        })
        .collect())
}

/// Sample standard deviation (n - 1 denominator) over the trailing `window`
/// values. A window shorter than two has no sample deviation.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if window < 2 || i + 1 < window {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            if flat_value(slice).is_some() {
                return Some(0.0);
            }
            let mean = slice.iter().sum::<f64>() / window as f64;
            let variance = slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (window - 1) as f64;
            Some(variance.sqrt())
        })
        .collect()
}

/// Percent change from the previous value, `(v[i] / v[i-1] - 1) * 100`.
pub fn pct_change(values: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }
    out.push(None);
    out.extend(values.windows(2).map(|w| finite((w[1] / w[0] - 1.0) * 100.0)));
    out
}

/// Percent distance of each value from its average, `(1 - v / avg) * 100`.
///
/// Positive when the value sits below its average.
pub fn deviation_from_average(values: &[f64], averages: &[Option<f64>]) -> Vec<Option<f64>> {
    values
        .iter()
        .zip(averages)
        .map(|(v, avg)| avg.and_then(|a| finite((1.0 - v / a) * 100.0)))
        .collect()
}

/// Sample statistics of the defined values of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std_dev: f64,
}

impl SeriesStats {
    /// Returns `None` when fewer than two values are defined.
    pub fn sample(series: &[Option<f64>]) -> Option<Self> {
        let defined: Vec<f64> = series.iter().flatten().copied().collect();
        let count = defined.len();
        if count < 2 {
            return None;
        }
        let mean = defined.iter().sum::<f64>() / count as f64;
        let variance = defined.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        Some(Self {
            count,
            mean,
            std_dev: variance.sqrt(),
        })
    }

    /// `(x - mean) / std_dev`; undefined when the series has no spread.
    pub fn zscore(&self, x: f64) -> Option<f64> {
        if self.std_dev > 0.0 {
            finite((x - self.mean) / self.std_dev)
        } else {
            None
        }
    }

    /// Inverse of [`SeriesStats::zscore`]: the series value sitting `z`
    /// deviations from the mean.
    pub fn value_at(&self, z: f64) -> f64 {
        self.mean + z * self.std_dev
    }
}

/// Z-scores of a series against its own whole-history sample statistics.
pub fn zscores(series: &[Option<f64>]) -> Vec<Option<f64>> {
    match SeriesStats::sample(series) {
        Some(stats) => series.iter().map(|v| v.and_then(|x| stats.zscore(x))).collect(),
        None => vec![None; series.len()],
    }
}

/// The common value of a window whose values are all equal.
fn flat_value(window: &[f64]) -> Option<f64> {
    let (first, rest) = window.split_first()?;
    rest.iter().all(|v| v == first).then_some(*first)
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}
