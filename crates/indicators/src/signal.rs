// In crates/indicators/src/signal.rs

use core_types::Position;
use serde::{Deserialize, Serialize};

/// The label a bar ends up with, and the threshold that wrote it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SignalMark {
    pub position: Position,
    pub threshold: Option<f64>,
}

/// Labels each bar from its z-score.
///
/// For every threshold `t`, in the order given, a bar becomes `SHORT` when its
/// z-score is below `-t` and `LONG` when above `t`. A later threshold
/// overwrites whatever an earlier one wrote for the same bar. Bars without a
/// z-score stay `NONE`.
pub fn label_positions(zscores: &[Option<f64>], thresholds: &[f64]) -> Vec<SignalMark> {
    let mut marks = vec![SignalMark::default(); zscores.len()];

    for &t in thresholds {
        for (mark, z) in marks.iter_mut().zip(zscores) {
            let Some(z) = *z else { continue };
            if z < -t {
                *mark = SignalMark { position: Position::Short, threshold: Some(t) };
            }
            if z > t {
                *mark = SignalMark { position: Position::Long, threshold: Some(t) };
            }
        }
    }

    marks
}
