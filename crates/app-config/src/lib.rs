// In crates/app-config/src/lib.rs

use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use config::builder::DefaultState;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{
    AnalysisSettings, AppSettings, ProviderSettings, Settings, ThresholdStudySettings, TimeframeSettings,
    TrendStudySettings,
};

/// Most klines `/fapi/v1/klines` returns per request.
pub const MAX_KLINE_PAGE: u16 = 1500;

/// Loads the application settings from various sources.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from an optional `config/base.toml` file.
/// 2. Merges settings from an environment-specific file (e.g., `config/development.toml`).
/// 3. Merges settings from environment variables (e.g., `APP_ANALYSIS__SYMBOL=ETHUSDT`).
///
/// Every field has a default, so the tool runs with no configuration at all.
pub fn load_settings() -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());
    finish(layered(&environment)?)
}

/// The file and environment layers for `environment`, which also ends up in
/// `app.environment`.
fn layered(environment: &str) -> Result<ConfigBuilder<DefaultState>> {
    let builder = Config::builder()
        .add_source(File::with_name("config/base").required(false))
        .add_source(File::with_name(&format!("config/{}", environment)).required(false))
        // The prefix is `APP`, separator is `__`; list values are comma separated.
        .add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("analysis.thresholds")
                .with_list_parse_key("thresholds.thresholds")
                .try_parsing(true),
        )
        // `APP_ENVIRONMENT` has no `__`, so the source above files it under a
        // top-level `environment` key.
        .set_override("app.environment", environment)?;
    Ok(builder)
}

/// Builds settings from a single TOML document, without touching the
/// filesystem or the environment.
pub fn from_toml_str(content: &str) -> Result<Settings> {
    finish(Config::builder().add_source(File::from_str(content, FileFormat::Toml)))
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Settings> {
    // Deserialize the configuration into our `Settings` struct.
    let settings: Settings = builder.build()?.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}

impl Settings {
    /// Checks every configured window against `analysis.min_window` and the
    /// indicator parameter rules.
    pub fn validate(&self) -> Result<()> {
        let min = self.analysis.min_window;
        for tf in &self.analysis.timeframes {
            check_window(&format!("analysis.timeframes[{}].ma_window", tf.interval), tf.ma_window, min)?;
            if let Some(band) = tf.band_window {
                check_window(&format!("analysis.timeframes[{}].band_window", tf.interval), band, min)?;
            }
            tf.indicator_settings(self.analysis.band_stddev, &self.analysis.thresholds)
                .validate()
                .map_err(|e| Error::Invalid(e.to_string()))?;
        }
        check_window("thresholds.ma_window", self.thresholds.ma_window, min)?;

        let trend = &self.trend.params;
        if trend.fast_window == 0 || trend.medium_window == 0 || trend.slow_window == 0 {
            return Err(Error::Invalid("trend moving average windows must be at least 1".into()));
        }
        if trend.periods_per_year == 0 {
            return Err(Error::Invalid("trend.params.periods_per_year must be at least 1".into()));
        }
        if self.provider.page_limit == 0 || self.provider.page_limit > MAX_KLINE_PAGE {
            return Err(Error::Invalid(format!(
                "provider.page_limit is {}, expected 1..={}",
                self.provider.page_limit, MAX_KLINE_PAGE
            )));
        }
        Ok(())
    }
}

/// Rejects a window below the configured minimum.
pub fn check_window(name: &str, window: usize, min_window: usize) -> Result<()> {
    if window < min_window {
        return Err(Error::Invalid(format!(
            "{} is {}, below the minimum window of {}",
            name, window, min_window
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Lookback, LookbackUnit};
    use indicators::MaKind;

    #[test]
    fn empty_document_yields_defaults() {
        let settings = from_toml_str("").unwrap();

        assert_eq!(settings.app.log_level, "info");
        assert_eq!(settings.analysis.symbol, "BTCUSDT");
        assert_eq!(settings.analysis.thresholds, vec![2.0, 3.0]);
        assert_eq!(settings.analysis.timeframes.len(), 2);
        assert_eq!(settings.analysis.timeframes[1].interval, "1h");
        assert_eq!(settings.thresholds.ma_kind, MaKind::Weighted);
        assert_eq!(settings.trend.lookback, Lookback::new(504, LookbackUnit::Days));
        assert_eq!(settings.trend.params.slow_window, 80);
        assert!(settings.provider.api_key.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let settings = from_toml_str(
            r#"
            [provider]
            rest_base_url = "http://localhost:9000"

            [analysis]
            symbol = "ETHUSDT"
            thresholds = [1.5, 2.5]

            [[analysis.timeframes]]
            interval = "4h"
            lookback = "90d"
            ma_window = 30
            ma_kind = "weighted"

            [trend.params]
            annual_risk_free_rate = 0.05
            "#,
        )
        .unwrap();

        assert_eq!(settings.provider.rest_base_url, "http://localhost:9000");
        assert_eq!(settings.analysis.symbol, "ETHUSDT");
        let tf = &settings.analysis.timeframes[0];
        assert_eq!(settings.analysis.timeframes.len(), 1);
        assert_eq!(tf.lookback, Lookback::new(90, LookbackUnit::Days));

        let indicator = tf.indicator_settings(settings.analysis.band_stddev, &settings.analysis.thresholds);
        assert_eq!(indicator.ma_kind, MaKind::Weighted);
        assert_eq!(indicator.band_window(), 30);
        assert_eq!(indicator.thresholds, vec![1.5, 2.5]);

        assert_eq!(settings.trend.params.annual_risk_free_rate, 0.05);
        assert_eq!(settings.trend.params.periods_per_year, 252);
    }

    #[test]
    fn windows_below_minimum_are_rejected() {
        let result = from_toml_str(
            r#"
            [[analysis.timeframes]]
            interval = "1d"
            lookback = "1y"
            ma_window = 5
            "#,
        );
        assert!(matches!(result, Err(Error::Invalid(_))));
    }

    #[test]
    fn malformed_lookback_fails_to_load() {
        let result = from_toml_str(
            r#"
            [thresholds]
            lookback = "forever"
            "#,
        );
        assert!(matches!(result, Err(Error::LoadError(_))));
    }

    #[test]
    fn page_limit_must_fit_the_provider_cap() {
        for limit in [0, 1501, 5000] {
            let result = from_toml_str(&format!("[provider]\npage_limit = {}", limit));
            assert!(matches!(result, Err(Error::Invalid(_))), "page_limit {} accepted", limit);
        }
        let settings = from_toml_str("[provider]\npage_limit = 1500").unwrap();
        assert_eq!(settings.provider.page_limit, MAX_KLINE_PAGE);
    }

    #[test]
    fn selected_environment_lands_in_app_settings() {
        let settings = finish(layered("staging").unwrap()).unwrap();
        assert_eq!(settings.app.environment, "staging");
    }

    #[test]
    fn check_window_names_the_offender() {
        let err = check_window("--window", 10, 20).unwrap_err();
        assert!(err.to_string().contains("--window is 10"));
    }
}
