//! # render::surface
//!
//! The raster surface contract the chart paints onto, shaped after a 2D canvas
//! context: clear, stroked line batches, filled rectangles and polygons, and
//! text with an optional outline.
//!
//! [`RecordingSurface`] keeps the current frame as a display list. Tests
//! assert against it; [`super::svg::SvgSurface`] serialises it.

use serde::Serialize;

// ─── Primitives ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// 0.0 (transparent) ..= 1.0 (opaque)
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// `#RRGGBB`, for SVG fills.
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    pub size:    f64,
    pub weight:  u16,
    pub align:   TextAlign,
    pub fill:    Color,
    /// Outline painted before the fill.
    pub outline: Option<Stroke>,
    pub opacity: f64,
}

// ─── Surface ──────────────────────────────────────────────────────────────────

pub trait Surface: Send {
    /// Current `(width, height)` in pixels. Read fresh every frame.
    fn size(&self) -> (f64, f64);

    fn resize(&mut self, width: f64, height: f64);

    fn clear(&mut self);

    /// One path made of independent segments, stroked once.
    fn stroke_segments(&mut self, segments: &[(Point, Point)], stroke: Stroke);

    fn fill_rect(&mut self, origin: Point, width: f64, height: f64, color: Color);

    fn fill_polygon(&mut self, points: &[Point], color: Color);

    fn draw_text(&mut self, text: &str, at: Point, style: &TextStyle);
}

// ─── RecordingSurface ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear,
    Segments {
        segments: Vec<(Point, Point)>,
        stroke:   Stroke,
    },
    Rect {
        origin: Point,
        width:  f64,
        height: f64,
        color:  Color,
    },
    Polygon {
        points: Vec<Point>,
        color:  Color,
    },
    Text {
        text:  String,
        at:    Point,
        style: TextStyle,
    },
}

impl DrawCommand {
    /// Every coordinate and extent is a finite number.
    pub fn is_finite(&self) -> bool {
        match self {
            DrawCommand::Clear => true,
            DrawCommand::Segments { segments, stroke } => {
                stroke.width.is_finite() && segments.iter().all(|(a, b)| a.is_finite() && b.is_finite())
            }
            DrawCommand::Rect { origin, width, height, .. } => {
                origin.is_finite() && width.is_finite() && height.is_finite()
            }
            DrawCommand::Polygon { points, .. } => points.iter().all(Point::is_finite),
            DrawCommand::Text { at, style, .. } => {
                at.is_finite() && style.size.is_finite() && style.opacity.is_finite()
            }
        }
    }
}

/// Display-list surface holding the commands of the current frame.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width:    f64,
    height:   f64,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, commands: Vec::new() }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn rects(&self) -> impl Iterator<Item = &DrawCommand> + '_ {
        self.commands.iter().filter(|c| matches!(c, DrawCommand::Rect { .. }))
    }

    pub fn texts(&self) -> impl Iterator<Item = (&str, &TextStyle)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, style, .. } => Some((text.as_str(), style)),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn stroke_segments(&mut self, segments: &[(Point, Point)], stroke: Stroke) {
        self.commands.push(DrawCommand::Segments { segments: segments.to_vec(), stroke });
    }

    fn fill_rect(&mut self, origin: Point, width: f64, height: f64, color: Color) {
        self.commands.push(DrawCommand::Rect { origin, width, height, color });
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        self.commands.push(DrawCommand::Polygon { points: points.to_vec(), color });
    }

    fn draw_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        self.commands.push(DrawCommand::Text { text: text.to_string(), at, style: *style });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_starts_a_new_frame() {
        let mut surface = RecordingSurface::new(10.0, 10.0);
        surface.fill_rect(Point::new(0.0, 0.0), 1.0, 1.0, Color::BLACK);
        surface.clear();
        surface.fill_polygon(&[Point::new(1.0, 1.0)], Color::BLACK);
        assert_eq!(surface.commands().len(), 2);
        assert_eq!(surface.commands()[0], DrawCommand::Clear);
    }

    #[test]
    fn test_non_finite_geometry_is_detected() {
        let bad = DrawCommand::Rect {
            origin: Point::new(f64::NAN, 0.0),
            width:  1.0,
            height: 1.0,
            color:  Color::BLACK,
        };
        assert!(!bad.is_finite());
        assert_eq!(Color::rgb(16, 185, 129).hex(), "#10B981");
    }
}
