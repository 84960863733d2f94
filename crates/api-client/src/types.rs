// In crates/api-client/src/types.rs

use chrono::{DateTime, Utc};
use core_types::{Lookback, Symbol};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Client for the public market-data endpoints of the Binance Futures API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// The persistent HTTP client.
    pub http_client: Client,
    /// Optional API key, sent with every request when present.
    pub api_key: Option<String>,
    /// The base URL for the Binance Futures API.
    pub base_url: String,
    /// Klines requested per page.
    pub page_limit: u16,
    /// Pause between consecutive page requests.
    pub request_pause: Duration,
}

/// What price history to load: a symbol and bar interval, reaching
/// `lookback` back from `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct BarRequest {
    pub symbol: Symbol,
    /// Bar interval as the provider spells it ("1h", "1d", ...).
    pub interval: String,
    pub lookback: Lookback,
    /// Newest instant of interest. When unset, each source picks its own:
    /// "now" for the exchange, the newest bar for a file.
    pub end: Option<DateTime<Utc>>,
}

impl BarRequest {
    pub fn new(symbol: Symbol, interval: impl Into<String>, lookback: Lookback) -> Self {
        Self {
            symbol,
            interval: interval.into(),
            lookback,
            end: None,
        }
    }

    pub fn ending_at(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    /// Resolves the request to a `[start, end]` range in epoch milliseconds.
    pub fn range_millis(&self, default_end: DateTime<Utc>) -> core_types::Result<(i64, i64)> {
        let end = self.end.unwrap_or(default_end);
        let start = self.lookback.start_from(end)?;
        Ok((start.timestamp_millis(), end.timestamp_millis()))
    }
}

/// Temporary struct to deserialize the kline response from Binance,
/// which is a JSON array of mixed types.
#[derive(Debug, Deserialize)]
pub struct RawKline(
    pub i64,         // 0: Open time
    pub String,      // 1: Open
    pub String,      // 2: High
    pub String,      // 3: Low
    pub String,      // 4: Close
    pub String,      // 5: Volume
    pub i64,         // 6: Close time
    pub String,      // 7: Quote asset volume
    pub i64,         // 8: Number of trades
    pub String,      // 9: Taker buy base asset volume
    pub String,      // 10: Taker buy quote asset volume
    pub String,      // 11: Ignore
);
