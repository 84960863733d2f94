// In crates/api-client/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to build the API client: {0}")]
    ClientBuildError(String),
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(#[from] serde_json::Error),
    #[error("API error: code {code}, msg: {msg}")]
    ApiError { code: i64, msg: String },
    #[error("Unexpected HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("Malformed kline from provider: {0}")]
    InvalidKline(String),
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to open price file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid CSV row {line}: {reason}")]
    InvalidRow { line: u64, reason: String },
    #[error("Invalid request window: {0}")]
    Window(#[from] core_types::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
