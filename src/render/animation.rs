//! # render::animation
//!
//! Time-driven marker effects. Both are pure functions of wall-clock
//! milliseconds so tests can sample them at fixed instants.

use crate::models::TradeResult;

/// Period of the floating result label.
pub const FLOAT_LOOP_MS: i64 = 3000;
/// Distance of the label from the marker at the start of a loop.
pub const FLOAT_BASE_OFFSET: f64 = 25.0;
/// Extra distance covered over one loop.
pub const FLOAT_TRAVEL: f64 = 40.0;

/// Marker scale: `sin(t / 150 + index) * 0.2 + 1`, always within `[0.8, 1.2]`.
pub fn pulse_scale(now_ms: i64, candle_index: u64) -> f64 {
    (now_ms as f64 / 150.0 + candle_index as f64).sin() * 0.2 + 1.0
}

/// Position of the floating label inside its loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatingLabel {
    /// `[0, 1)` through the current loop.
    pub progress: f64,
    /// Vertical offset from the marker anchor; negative is up.
    pub offset_y: f64,
    pub opacity:  f64,
}

/// Profit labels rise above the marker, losses sink below it, both fading out.
pub fn floating_label(now_ms: i64, result: TradeResult) -> FloatingLabel {
    let progress = now_ms.rem_euclid(FLOAT_LOOP_MS) as f64 / FLOAT_LOOP_MS as f64;
    let distance = FLOAT_BASE_OFFSET + FLOAT_TRAVEL * progress;
    let offset_y = match result {
        TradeResult::Profit => -distance,
        TradeResult::Loss => distance,
    };
    FloatingLabel { progress, offset_y, opacity: 1.0 - progress }
}
