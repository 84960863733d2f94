// In crates/analytics/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid analytics parameters: {0}")]
    InvalidParameters(String),

    #[error("Close price of the bar opening at {open_time} cannot be represented as f64")]
    InvalidPrice { open_time: i64 },

    #[error("Indicator calculation failed: {0}")]
    Indicator(#[from] indicators::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
