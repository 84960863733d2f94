// In crates/indicators/src/bollinger.rs

use crate::error::{Error, Result};
use crate::rolling::{rolling_std, sma};
use serde::{Deserialize, Serialize};

/// One point of a Bollinger envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerPoint {
    pub average: f64,
    pub std_dev: f64,
    pub upper: f64,
    pub lower: f64,
}

/// Simple moving average of `values` over `window`, plus and minus
/// `multiplier` rolling sample standard deviations.
///
/// `ta::indicators::BollingerBands` divides by `n` rather than `n - 1`, so the
/// envelope is assembled from the two rolling series instead.
pub fn bollinger_bands(values: &[f64], window: usize, multiplier: f64) -> Result<Vec<Option<BollingerPoint>>> {
    if window < 2 {
        return Err(Error::InvalidParameters(format!(
            "Bollinger window must be at least 2, got {}",
            window
        )));
    }
    let averages = sma(values, window)?;
    let deviations = rolling_std(values, window);

    Ok(averages
        .into_iter()
        .zip(deviations)
        .map(|(avg, sd)| match (avg, sd) {
            (Some(average), Some(std_dev)) => Some(BollingerPoint {
                average,
                std_dev,
                upper: average + multiplier * std_dev,
                lower: average - multiplier * std_dev,
            }),
            _ => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_is_symmetric_around_the_average() {
        let bands = bollinger_bands(&[1.0, 2.0, 3.0, 4.0], 3, 2.0).unwrap();
        assert!(bands[..2].iter().all(Option::is_none));

        let point = bands[2].unwrap();
        assert!((point.average - 2.0).abs() < 1e-12);
        assert!((point.std_dev - 1.0).abs() < 1e-12);
        assert!((point.upper - 4.0).abs() < 1e-12);
        assert!((point.lower - 0.0).abs() < 1e-12);
    }

    #[test]
    fn flat_prices_collapse_the_envelope() {
        let bands = bollinger_bands(&[5.0; 4], 2, 2.0).unwrap();
        let point = bands[3].unwrap();
        assert_eq!(point.upper, point.lower);
    }

    #[test]
    fn window_below_two_is_rejected() {
        assert!(matches!(
            bollinger_bands(&[1.0, 2.0], 1, 2.0),
            Err(Error::InvalidParameters(_))
        ));
    }
}
