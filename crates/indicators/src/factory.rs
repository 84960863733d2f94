// In crates/indicators/src/factory.rs

use crate::moving_average::{Simple, Weighted};
use crate::types::MaKind;
use crate::MovingAverage;

/// Builds the moving average selected in the settings.
pub fn create_moving_average(kind: MaKind, window: usize) -> Box<dyn MovingAverage + Send + Sync> {
    match kind {
        MaKind::Simple => Box::new(Simple::new(window)),
        MaKind::Weighted => Box::new(Weighted::new(window)),
    }
}
