// In crates/core-types/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid lookback '{0}': expected a number followed by m, h, d, w, mo or y")]
    InvalidLookback(String),

    #[error("Lookback '{0}' reaches outside the supported date range")]
    LookbackOutOfRange(String),
}

pub type Result<T> = std::result::Result<T, Error>;
