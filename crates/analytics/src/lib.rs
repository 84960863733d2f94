// In crates/analytics/src/lib.rs

pub mod engine;
pub mod error;
pub mod sharpe;
pub mod thresholds;
pub mod trend;
pub mod types;

pub use engine::AnalyticsEngine;
pub use error::{Error, Result};
pub use types::{LevelPair, LevelPoint, ThresholdLevel, TrendClass, TrendReport, TrendSettings, TrendSnapshot};
