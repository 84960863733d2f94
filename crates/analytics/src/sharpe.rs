// In crates/analytics/src/sharpe.rs

/// Fractional close-to-close returns; the first bar has none and is skipped.
pub fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .map(|w| w[1] / w[0] - 1.0)
        .filter(|r| r.is_finite())
        .collect()
}

/// Converts an annual rate to the equivalent compounded per-period rate.
pub fn riskfree_daily_rate(annual_rate: f64, periods_per_year: u32) -> f64 {
    (1.0 + annual_rate).powf(1.0 / f64::from(periods_per_year)) - 1.0
}

/// Mean excess return over its population standard deviation.
///
/// `None` for an empty series or one without spread.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> Option<f64> {
    if returns.is_empty() {
        return None;
    }
    let excess: Vec<f64> = returns.iter().map(|r| r - risk_free_rate).collect();
    let mean = excess.iter().sum::<f64>() / excess.len() as f64;
    let variance = excess.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / excess.len() as f64;
    let std_dev = variance.sqrt();

    (std_dev > 0.0).then(|| mean / std_dev)
}

/// Per-period Sharpe ratio scaled by `sqrt(periods_per_year)`.
pub fn annualized_sharpe_ratio(returns: &[f64], risk_free_rate: f64, periods_per_year: u32) -> Option<f64> {
    sharpe_ratio(returns, risk_free_rate).map(|s| s * f64::from(periods_per_year).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_are_fractional() {
        let r = daily_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(r.len(), 2);
        assert!((r[0] - 0.1).abs() < 1e-12);
        assert!((r[1] + 0.1).abs() < 1e-12);
        assert!(daily_returns(&[1.0]).is_empty());
    }

    #[test]
    fn daily_rate_compounds_back_to_annual() {
        let daily = riskfree_daily_rate(0.1265, 252);
        assert!(((1.0 + daily).powi(252) - 1.1265).abs() < 1e-9);
        assert!(daily > 0.0 && daily < 0.1265 / 252.0);
    }

    #[test]
    fn sharpe_uses_population_deviation() {
        // excess returns 0.01 and 0.03: mean 0.02, population std 0.01
        let sharpe = sharpe_ratio(&[0.02, 0.04], 0.01).unwrap();
        assert!((sharpe - 2.0).abs() < 1e-9);

        let annual = annualized_sharpe_ratio(&[0.02, 0.04], 0.01, 252).unwrap();
        assert!((annual - 2.0 * 252f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn flat_or_empty_returns_have_no_sharpe() {
        assert_eq!(sharpe_ratio(&[0.01, 0.01, 0.01], 0.0), None);
        assert_eq!(sharpe_ratio(&[], 0.0), None);
    }
}
