//! # render::layout
//!
//! Pure layout math: price range, candle slots, and price → pixel mapping
//! inside the band left between the top and bottom overlay margins.

use crate::models::Candle;
use crate::render::surface::Point;

/// Background grid pitch in pixels.
pub const GRID_PITCH: f64 = 50.0;
/// Room above and below the price band for markers and labels.
pub const MARGIN_TOP: f64 = 50.0;
pub const MARGIN_BOTTOM: f64 = 50.0;
/// Share of a slot taken by the candle body; the rest is gap.
pub const BODY_RATIO: f64 = 0.8;
/// Smallest body height so flat candles stay visible.
pub const MIN_BODY_HEIGHT: f64 = 1.0;
/// Floor for `max - min` so a flat series never divides by zero.
pub const PRICE_RANGE_FLOOR: f64 = 1e-9;

/// Largest surface edge the renderer will lay out.
pub const MAX_DIMENSION: f64 = 16_384.0;

/// Surface edge forced into `0..=MAX_DIMENSION`; NaN and infinities become 0.
pub fn clamp_dimension(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, MAX_DIMENSION)
    } else {
        0.0
    }
}

/// Vertical and horizontal grid lines covering the surface.
pub fn grid_segments(width: f64, height: f64) -> Vec<(Point, Point)> {
    let width = clamp_dimension(width);
    let height = clamp_dimension(height);
    let columns = (width / GRID_PITCH).ceil() as usize;
    let rows = (height / GRID_PITCH).ceil() as usize;

    let mut segments = Vec::with_capacity(columns + rows);
    for i in 0..columns {
        let x = i as f64 * GRID_PITCH;
        segments.push((Point::new(x, 0.0), Point::new(x, height)));
    }
    for i in 0..rows {
        let y = i as f64 * GRID_PITCH;
        segments.push((Point::new(0.0, y), Point::new(width, y)));
    }
    segments
}

// ─── ChartLayout ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub min_price:   f64,
    pub max_price:   f64,
    pub price_range: f64,
    /// Width of one candle slot (body + gap).
    pub slot_width:  f64,
    pub body_width:  f64,
    pub band_top:    f64,
    pub band_height: f64,
}

/// Pixel geometry of one candle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleGeometry {
    pub x:           f64,
    pub center_x:    f64,
    pub body_width:  f64,
    pub y_open:      f64,
    pub y_close:     f64,
    pub y_high:      f64,
    pub y_low:       f64,
    pub body_top:    f64,
    pub body_height: f64,
}

impl ChartLayout {
    /// `None` when there is nothing to lay out.
    pub fn compute(width: f64, height: f64, candles: &[Candle]) -> Option<Self> {
        if candles.is_empty() {
            return None;
        }

        let (min_price, max_price) = candles.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), c| (lo.min(c.low), hi.max(c.high)),
        );
        let price_range = (max_price - min_price).max(PRICE_RANGE_FLOOR);

        let slot_width = width.max(0.0) / candles.len() as f64;

        Some(Self {
            min_price,
            max_price,
            price_range,
            slot_width,
            body_width: slot_width * BODY_RATIO,
            band_top: MARGIN_TOP,
            band_height: (height - MARGIN_TOP - MARGIN_BOTTOM).max(0.0),
        })
    }

    /// Linear map: `min_price` → band bottom, `max_price` → band top.
    #[inline]
    pub fn price_to_y(&self, price: f64) -> f64 {
        self.band_top + self.band_height
            - ((price - self.min_price) / self.price_range) * self.band_height
    }

    pub fn geometry(&self, slot: usize, candle: &Candle) -> CandleGeometry {
        let x = slot as f64 * self.slot_width;
        let y_open = self.price_to_y(candle.open);
        let y_close = self.price_to_y(candle.close);

        CandleGeometry {
            x,
            center_x: x + self.body_width / 2.0,
            body_width: self.body_width,
            y_open,
            y_close,
            y_high: self.price_to_y(candle.high),
            y_low: self.price_to_y(candle.low),
            body_top: y_open.min(y_close),
            body_height: (y_open - y_close).abs().max(MIN_BODY_HEIGHT),
        }
    }
}
