// In crates/indicators/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid indicator parameters: {0}")]
    InvalidParameters(String),

    #[error("Bars must be strictly ordered by open time with no repeats")]
    UnorderedBars,

    #[error("Close price of the bar opening at {open_time} cannot be represented as f64")]
    InvalidPrice { open_time: i64 },

    #[error("Indicator library error: {0}")]
    Library(String),
}

pub type Result<T> = std::result::Result<T, Error>;
