// In crates/indicators/src/moving_average.rs

use crate::error::Result;
use crate::rolling::{sma, wma};
use crate::MovingAverage;

/// Arithmetic mean of the trailing window.
#[derive(Debug, Clone, Copy)]
pub struct Simple {
    window: usize,
}

impl Simple {
    pub fn new(window: usize) -> Self {
        Self { window }
    }
}

impl MovingAverage for Simple {
    fn name(&self) -> &'static str {
        "SMA"
    }

    fn window(&self) -> usize {
        self.window
    }

    fn compute(&self, closes: &[f64]) -> Result<Vec<Option<f64>>> {
        sma(closes, self.window)
    }
}

/// Linearly weighted mean of the trailing window, newest bar heaviest.
#[derive(Debug, Clone, Copy)]
pub struct Weighted {
    window: usize,
}

impl Weighted {
    pub fn new(window: usize) -> Self {
        Self { window }
    }
}

impl MovingAverage for Weighted {
    fn name(&self) -> &'static str {
        "WMA"
    }

    fn window(&self) -> usize {
        self.window
    }

    fn compute(&self, closes: &[f64]) -> Result<Vec<Option<f64>>> {
        wma(closes, self.window)
    }
}
