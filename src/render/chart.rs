//! # render::chart
//!
//! **Chart Renderer**: paints one frame of the candle feed onto a [`Surface`].
//!
//! ## Frame layers (back to front)
//! ```text
//!   1. clear + 50 px grid                         (always)
//!   2. per candle: wick, then body                (skipped when empty)
//!   3. per signaled candle, scaled by the pulse:
//!        triangle marker + BUY/SELL caption
//!        floating +/-{v}usd label, outlined then filled
//! ```
//!
//! A frame is a pure function of the candle snapshot, the surface size and
//! the wall-clock milliseconds passed in. Nothing is cached between frames.

use serde::Serialize;

use crate::models::{Candle, Side, TradeResult};
use crate::render::animation::{floating_label, pulse_scale};
use crate::render::layout::{grid_segments, CandleGeometry, ChartLayout};
use crate::render::surface::{Color, Point, Stroke, Surface, TextAlign, TextStyle};

/// Marker anchor distance below the low (buy) or above the high (sell).
pub const MARKER_OFFSET: f64 = 20.0;
/// Half the triangle's width and height, before pulse scaling.
pub const MARKER_HALF: f64 = 5.0;
pub const CAPTION_SIZE: f64 = 10.0;
pub const RESULT_LABEL_SIZE: f64 = 32.0;

// ─── Palette ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub bullish:       Color,
    pub bearish:       Color,
    pub buy:           Color,
    pub sell:          Color,
    pub profit:        Color,
    pub loss:          Color,
    pub grid:          Stroke,
    pub label_outline: Stroke,
}

impl Default for Palette {
    fn default() -> Self {
        let green = Color::rgb(0x10, 0xB9, 0x81);
        let red = Color::rgb(0xEF, 0x44, 0x44);
        Self {
            bullish:       green,
            bearish:       Color::rgb(0xEA, 0xEA, 0xEA),
            buy:           green,
            sell:          red,
            profit:        green,
            loss:          red,
            grid:          Stroke { color: Color::rgba(51, 51, 51, 0.5), width: 0.5 },
            label_outline: Stroke { color: Color::BLACK, width: 6.0 },
        }
    }
}

// ─── FrameStats ───────────────────────────────────────────────────────────────

/// What a frame ended up drawing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    pub candles: usize,
    pub signals: usize,
}

// ─── Renderer ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ChartRenderer {
    palette: Palette,
}

impl ChartRenderer {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Draw one frame. Never fails: an empty series draws the grid only.
    pub fn render_frame(
        &self,
        surface: &mut dyn Surface,
        candles: &[Candle],
        now_ms:  i64,
    ) -> FrameStats {
        let (width, height) = surface.size();

        // ── 1. Background ──
        surface.clear();
        surface.stroke_segments(&grid_segments(width, height), self.palette.grid);

        // ── 2. Candles ──
        let Some(layout) = ChartLayout::compute(width, height, candles) else {
            return FrameStats::default();
        };

        let mut stats = FrameStats { candles: candles.len(), signals: 0 };
        for (slot, candle) in candles.iter().enumerate() {
            let geom = layout.geometry(slot, candle);
            self.draw_candle(surface, candle, &geom);

            // ── 3. Signal overlay ──
            if candle.signal.is_some() {
                self.draw_signal(surface, candle, &geom, now_ms);
                stats.signals += 1;
            }
        }
        stats
    }

    fn draw_candle(&self, surface: &mut dyn Surface, candle: &Candle, geom: &CandleGeometry) {
        let color = if candle.is_bullish() { self.palette.bullish } else { self.palette.bearish };

        surface.stroke_segments(
            &[(Point::new(geom.center_x, geom.y_high), Point::new(geom.center_x, geom.y_low))],
            Stroke { color, width: 1.0 },
        );
        surface.fill_rect(
            Point::new(geom.x, geom.body_top),
            geom.body_width,
            geom.body_height,
            color,
        );
    }

    fn draw_signal(
        &self,
        surface: &mut dyn Surface,
        candle:  &Candle,
        geom:    &CandleGeometry,
        now_ms:  i64,
    ) {
        let Some(signal) = candle.signal else { return };

        let scale = pulse_scale(now_ms, candle.index);
        let (anchor, color, tip, base, caption_y) = match signal.signal {
            Side::Buy => (
                Point::new(geom.center_x, geom.y_low + MARKER_OFFSET),
                self.palette.buy,
                -MARKER_HALF,
                MARKER_HALF,
                15.0,
            ),
            Side::Sell => (
                Point::new(geom.center_x, geom.y_high - MARKER_OFFSET),
                self.palette.sell,
                MARKER_HALF,
                -MARKER_HALF,
                -10.0,
            ),
        };
        let place = |x: f64, y: f64| Point::new(anchor.x + x * scale, anchor.y + y * scale);

        surface.fill_polygon(
            &[place(0.0, tip), place(-MARKER_HALF, base), place(MARKER_HALF, base)],
            color,
        );
        surface.draw_text(
            signal.signal.label(),
            place(0.0, caption_y),
            &TextStyle {
                size:    CAPTION_SIZE * scale,
                weight:  700,
                align:   TextAlign::Center,
                fill:    color,
                outline: None,
                opacity: 1.0,
            },
        );

        let float = floating_label(now_ms, signal.result);
        let fill = match signal.result {
            TradeResult::Profit => self.palette.profit,
            TradeResult::Loss => self.palette.loss,
        };
        let outline = Stroke {
            width: self.palette.label_outline.width * scale,
            ..self.palette.label_outline
        };
        surface.draw_text(
            &signal.label_text(),
            place(0.0, float.offset_y),
            &TextStyle {
                size:    RESULT_LABEL_SIZE * scale,
                weight:  700,
                align:   TextAlign::Center,
                fill,
                outline: Some(outline),
                opacity: float.opacity,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TradeSignal;
    use crate::render::surface::{DrawCommand, RecordingSurface};
    use chrono::Utc;

    fn candle(index: u64, open: f64, close: f64) -> Candle {
        Candle::from_step(index, Utc::now(), open, close, 0.5, 0.5)
    }

    fn signaled(index: u64, open: f64, close: f64, side: Side, result: TradeResult) -> Candle {
        let mut c = candle(index, open, close);
        c.signal = Some(TradeSignal { signal: side, result, profit_value: 120 });
        c
    }

    #[test]
    fn test_empty_series_draws_grid_only() {
        let renderer = ChartRenderer::default();
        let mut surface = RecordingSurface::new(800.0, 400.0);

        let stats = renderer.render_frame(&mut surface, &[], 0);

        assert_eq!(stats, FrameStats::default());
        assert_eq!(surface.commands().len(), 2);
        assert!(matches!(surface.commands()[1], DrawCommand::Segments { .. }));
    }

    #[test]
    fn test_flat_series_has_no_nan() {
        let renderer = ChartRenderer::default();
        let mut surface = RecordingSurface::new(800.0, 400.0);
        let mut candles: Vec<Candle> =
            (0..5).map(|i| Candle::from_step(i, Utc::now(), 2000.0, 2000.0, 0.0, 0.0)).collect();
        candles[2].signal =
            Some(TradeSignal { signal: Side::Sell, result: TradeResult::Loss, profit_value: 20 });

        renderer.render_frame(&mut surface, &candles, 123_456);

        assert!(surface.commands().iter().all(DrawCommand::is_finite));
        assert_eq!(surface.rects().count(), 5);
    }

    #[test]
    fn test_body_colours_follow_direction() {
        let renderer = ChartRenderer::default();
        let palette = *renderer.palette();
        let mut surface = RecordingSurface::new(300.0, 300.0);
        let candles = [candle(0, 10.0, 12.0), candle(1, 12.0, 11.0), candle(2, 11.0, 11.0)];

        renderer.render_frame(&mut surface, &candles, 0);

        let colors: Vec<Color> = surface
            .rects()
            .filter_map(|c| match c {
                DrawCommand::Rect { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(colors, vec![palette.bullish, palette.bearish, palette.bullish]);
    }

    #[test]
    fn test_buy_marker_sits_below_low() {
        let renderer = ChartRenderer::default();
        let mut surface = RecordingSurface::new(200.0, 400.0);
        let candles = [
            candle(0, 10.0, 11.0),
            signaled(1, 11.0, 14.0, Side::Buy, TradeResult::Profit),
        ];

        let stats = renderer.render_frame(&mut surface, &candles, 0);
        assert_eq!(stats.signals, 1);

        let layout = ChartLayout::compute(200.0, 400.0, &candles).unwrap();
        let geom = layout.geometry(1, &candles[1]);
        // pulse_scale(0, 1) = sin(1) * 0.2 + 1
        let scale = 1.0f64.sin() * 0.2 + 1.0;

        let triangle = surface
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::Polygon { points, color } => Some((points.clone(), *color)),
                _ => None,
            })
            .unwrap();
        assert_eq!(triangle.1, renderer.palette().buy);
        let tip = triangle.0[0];
        assert!((tip.x - geom.center_x).abs() < 1e-9);
        assert!((tip.y - (geom.y_low + MARKER_OFFSET - MARKER_HALF * scale)).abs() < 1e-9);

        let texts: Vec<&str> = surface.texts().map(|(t, _)| t).collect();
        assert_eq!(texts, vec!["BUY", "+120usd"]);
    }

    #[test]
    fn test_loss_label_is_outlined_and_fading() {
        let renderer = ChartRenderer::default();
        let mut surface = RecordingSurface::new(200.0, 400.0);
        let candles = [signaled(7, 14.0, 11.0, Side::Sell, TradeResult::Loss)];

        renderer.render_frame(&mut surface, &candles, 1500);

        let (text, style) = surface.texts().last().unwrap();
        assert_eq!(text, "-120usd");
        assert_eq!(style.fill, renderer.palette().loss);
        assert_eq!(style.opacity, 0.5);
        assert_eq!(style.outline.map(|o| o.color), Some(Color::BLACK));
    }
}
