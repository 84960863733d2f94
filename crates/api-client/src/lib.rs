// In crates/api-client/src/lib.rs

use app_config::ProviderSettings;
use core_types::{Kline, Symbol};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use std::time::Duration;

pub mod csv_source;
pub mod error;
pub mod source;
pub mod types;

// Re-export public types
pub use csv_source::CsvSource;
pub use error::{Error, Result};
pub use source::BarSource;
pub use types::*;

impl ApiClient {
    /// Constructs a new ApiClient from the provider settings.
    pub fn new(settings: &ProviderSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;

        Ok(ApiClient {
            http_client,
            api_key: settings.api_key.clone().filter(|k| !k.is_empty()),
            base_url: settings.rest_base_url.trim_end_matches('/').to_string(),
            page_limit: settings.page_limit,
            request_pause: Duration::from_millis(settings.request_pause_ms),
        })
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.http_client.get(url);
        match &self.api_key {
            Some(key) => request.header("X-MBX-APIKEY", key),
            None => request,
        }
    }

    /// Sends a GET request and returns the body, turning non-2xx responses
    /// into `ApiError` (when Binance explains itself) or `HttpStatus`.
    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.get(url).send().await.map_err(Error::RequestFailed)?;
        let status = response.status();
        let body = response.text().await.map_err(Error::RequestFailed)?;

        if !status.is_success() {
            return Err(api_error(&body).unwrap_or(Error::HttpStatus {
                status: status.as_u16(),
                body,
            }));
        }
        Ok(body)
    }

    /// Checks that the REST API is reachable.
    ///
    /// This corresponds to the `GET /fapi/v1/ping` endpoint.
    pub async fn ping(&self) -> Result<()> {
        let url = format!("{}/fapi/v1/ping", self.base_url);
        let body = self.get_text(&url).await?;
        if let Some(err) = api_error(&body) {
            return Err(err);
        }
        Ok(())
    }

    /// Fetches one page of historical kline (candlestick) data.
    ///
    /// This corresponds to the `GET /fapi/v1/klines` endpoint.
    ///
    /// # Arguments
    ///
    /// * `symbol`: The symbol to fetch klines for.
    /// * `interval`: The kline interval (e.g., "1m", "5m", "1h").
    /// * `start_time`: Optional start time in milliseconds.
    /// * `end_time`: Optional end time in milliseconds.
    /// * `limit`: Optional number of klines to return (max 1500, default 500).
    pub async fn get_historical_klines(
        &self,
        symbol: &Symbol,
        interval: &str,
        start_time: Option<i64>,
        end_time: Option<i64>,
        limit: Option<u16>,
    ) -> Result<Vec<Kline>> {
        let mut params = format!("symbol={}&interval={}", symbol.0, interval);

        if let Some(st) = start_time {
            params.push_str(&format!("&startTime={}", st));
        }
        if let Some(et) = end_time {
            params.push_str(&format!("&endTime={}", et));
        }
        if let Some(l) = limit {
            params.push_str(&format!("&limit={}", l));
        }

        let url = format!("{}/fapi/v1/klines?{}", self.base_url, params);
        let response_body = self.get_text(&url).await?;

        parse_klines(&response_body)
    }
}

/// Parses a `/fapi/v1/klines` response body.
///
/// A Binance error object in place of the array is reported as `ApiError`.
pub fn parse_klines(body: &str) -> Result<Vec<Kline>> {
    // Deserialize the raw response into a vector of RawKline.
    let raw_klines: Vec<RawKline> = serde_json::from_str(body).map_err(|e| {
        // If deserialization fails, it might be a Binance error object.
        api_error(body).unwrap_or(Error::DeserializationFailed(e))
    })?;

    // Convert the RawKlines into our clean, internal Kline type.
    raw_klines
        .into_iter()
        .map(|raw| {
            Ok(Kline {
                open_time: raw.0,
                open: decimal(&raw.1, "open", raw.0)?,
                high: decimal(&raw.2, "high", raw.0)?,
                low: decimal(&raw.3, "low", raw.0)?,
                close: decimal(&raw.4, "close", raw.0)?,
                volume: decimal(&raw.5, "volume", raw.0)?,
                close_time: raw.6,
            })
        })
        .collect()
}

fn decimal(value: &str, field: &str, open_time: i64) -> Result<Decimal> {
    Decimal::from_str(value)
        .map_err(|_| Error::InvalidKline(format!("{} '{}' of kline opening at {}", field, value, open_time)))
}

/// Extracts `{"code": .., "msg": ..}` from a response body, if that is what it is.
fn api_error(body: &str) -> Option<Error> {
    let value: Value = serde_json::from_str(body).ok()?;
    let code = value.get("code").and_then(Value::as_i64)?;
    if code == 0 || code == 200 {
        return None;
    }
    let msg = value.get("msg").and_then(Value::as_str).unwrap_or("Unknown error").to_string();
    Some(Error::ApiError { code, msg })
}

// Free function to allow api_client::new usage
pub fn new(settings: &ProviderSettings) -> Result<ApiClient> {
    ApiClient::new(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const PAGE: &str = r#"[
        [1499040000000, "0.01634790", "0.80000000", "0.01575800", "0.01577100", "148976.11427815",
         1499644799999, "2434.19055334", 308, "1756.87402397", "28.46694368", "17928899.62484339"],
        [1499644800000, "0.01577100", "0.01600000", "0.01500000", "0.01590000", "1000.0",
         1500249599999, "15.0", 12, "500.0", "8.0", "0"]
    ]"#;

    #[test]
    fn parses_kline_arrays_exactly() {
        let klines = parse_klines(PAGE).unwrap();

        assert_eq!(klines.len(), 2);
        assert_eq!(klines[0].open_time, 1499040000000);
        assert_eq!(klines[0].open, dec!(0.01634790));
        assert_eq!(klines[0].close, dec!(0.01577100));
        assert_eq!(klines[0].close_time, 1499644799999);
        assert_eq!(klines[1].high, dec!(0.016));
    }

    #[test]
    fn error_object_becomes_api_error() {
        let err = parse_klines(r#"{"code": -1121, "msg": "Invalid symbol."}"#).unwrap_err();
        match err {
            Error::ApiError { code, msg } => {
                assert_eq!(code, -1121);
                assert_eq!(msg, "Invalid symbol.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn garbage_is_a_deserialization_error() {
        assert!(matches!(parse_klines("<html>"), Err(Error::DeserializationFailed(_))));
    }

    #[test]
    fn unparsable_price_is_reported() {
        let body = r#"[[1, "x", "1", "1", "1", "1", 2, "0", 0, "0", "0", "0"]]"#;
        assert!(matches!(parse_klines(body), Err(Error::InvalidKline(_))));
    }

    #[test]
    fn empty_page_is_empty() {
        assert!(parse_klines("[]").unwrap().is_empty());
    }

    #[test]
    fn client_normalizes_settings() {
        let settings = ProviderSettings {
            rest_base_url: "https://fapi.binance.com/".into(),
            api_key: Some(String::new()),
            ..ProviderSettings::default()
        };
        let client = ApiClient::new(&settings).unwrap();
        assert_eq!(client.base_url, "https://fapi.binance.com");
        assert!(client.api_key.is_none());
        assert_eq!(client.page_limit, 1000);
    }
}
