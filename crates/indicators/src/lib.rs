// In crates/indicators/src/lib.rs

pub mod bollinger;
pub mod error;
pub mod factory;
pub mod moving_average;
pub mod pipeline;
pub mod rolling;
pub mod signal;
pub mod types;

pub use error::{Error, Result};
pub use factory::create_moving_average;
pub use pipeline::compute;
pub use rolling::SeriesStats;
pub use types::{IndicatorRow, IndicatorSettings, IndicatorTable, MaKind};

/// A trailing-window average over a close series.
///
/// Implementations return one value per input close, `None` until the
/// window has filled.
pub trait MovingAverage {
    /// Short name used in tables and chart legends.
    fn name(&self) -> &'static str;

    fn window(&self) -> usize;

    fn compute(&self, closes: &[f64]) -> Result<Vec<Option<f64>>>;

    fn label(&self) -> String {
        format!("{} {}", self.name(), self.window())
    }
}
