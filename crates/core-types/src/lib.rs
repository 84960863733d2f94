// In crates/core-types/src/lib.rs

pub mod error;
pub mod lookback;
pub mod types;

// Re-export the most important types for easy access from other crates.
pub use error::{Error, Result};
pub use lookback::{Lookback, LookbackUnit};
pub use types::{is_strictly_ordered, normalize_bars, Kline, Position, Symbol};
