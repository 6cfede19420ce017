//! # render::svg
//!
//! Headless [`Surface`] that records a frame and serialises it as an SVG
//! document, used by the host binary to persist the last rendered frame.

use std::fmt::Write as _;
use std::path::Path;

use tracing::info;

use crate::error::ChartError;
use crate::render::surface::{
    Color, DrawCommand, Point, RecordingSurface, Stroke, Surface, TextAlign, TextStyle,
};

pub struct SvgSurface {
    inner:      RecordingSurface,
    background: Color,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            inner:      RecordingSurface::new(width, height),
            background: Color::rgb(0x0A, 0x0A, 0x0A),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        self.inner.commands()
    }

    /// Current frame as a standalone SVG document.
    pub fn document(&self) -> String {
        let (width, height) = self.inner.size();
        let mut out = String::new();

        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = num(width),
            h = num(height),
        );
        let _ = writeln!(
            out,
            r#"<rect width="100%" height="100%" fill="{}"/>"#,
            self.background.hex()
        );

        for command in self.inner.commands() {
            match command {
                DrawCommand::Clear => {}
                DrawCommand::Segments { segments, stroke } => {
                    let d: String = segments
                        .iter()
                        .map(|(a, b)| format!("M{} {}L{} {}", num(a.x), num(a.y), num(b.x), num(b.y)))
                        .collect();
                    let _ = writeln!(out, r#"<path d="{d}" fill="none" {}/>"#, stroke_attrs(stroke));
                }
                DrawCommand::Rect { origin, width, height, color } => {
                    let _ = writeln!(
                        out,
                        r#"<rect x="{}" y="{}" width="{}" height="{}" {}/>"#,
                        num(origin.x),
                        num(origin.y),
                        num(*width),
                        num(*height),
                        fill_attrs(color),
                    );
                }
                DrawCommand::Polygon { points, color } => {
                    let pts: Vec<String> =
                        points.iter().map(|p| format!("{},{}", num(p.x), num(p.y))).collect();
                    let _ = writeln!(out, r#"<polygon points="{}" {}/>"#, pts.join(" "), fill_attrs(color));
                }
                DrawCommand::Text { text, at, style } => {
                    let _ = writeln!(out, "{}", text_element(text, at, style));
                }
            }
        }

        out.push_str("</svg>\n");
        out
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ChartError> {
        let path = path.as_ref();
        std::fs::write(path, self.document())?;
        info!(path = %path.display(), commands = self.inner.commands().len(), "🖼️ Snapshot written");
        Ok(())
    }
}

impl Surface for SvgSurface {
    fn size(&self) -> (f64, f64) {
        self.inner.size()
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.inner.resize(width, height);
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    fn stroke_segments(&mut self, segments: &[(Point, Point)], stroke: Stroke) {
        self.inner.stroke_segments(segments, stroke);
    }

    fn fill_rect(&mut self, origin: Point, width: f64, height: f64, color: Color) {
        self.inner.fill_rect(origin, width, height, color);
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        self.inner.fill_polygon(points, color);
    }

    fn draw_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        self.inner.draw_text(text, at, style);
    }
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn num(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}

fn fill_attrs(color: &Color) -> String {
    if color.a < 1.0 {
        format!(r#"fill="{}" fill-opacity="{}""#, color.hex(), color.a)
    } else {
        format!(r#"fill="{}""#, color.hex())
    }
}

fn stroke_attrs(stroke: &Stroke) -> String {
    let mut attrs = format!(r#"stroke="{}" stroke-width="{}""#, stroke.color.hex(), num(stroke.width));
    if stroke.color.a < 1.0 {
        let _ = write!(attrs, r#" stroke-opacity="{}""#, stroke.color.a);
    }
    attrs
}

fn text_element(text: &str, at: &Point, style: &TextStyle) -> String {
    let anchor = match style.align {
        TextAlign::Left => "start",
        TextAlign::Center => "middle",
        TextAlign::Right => "end",
    };
    let outline = style
        .outline
        .map(|o| format!(r#" {} paint-order="stroke" stroke-linejoin="round""#, stroke_attrs(&o)))
        .unwrap_or_default();

    format!(
        r#"<text x="{}" y="{}" font-family="Inter, sans-serif" font-size="{}" font-weight="{}" text-anchor="{anchor}" {} opacity="{}"{outline}>{}</text>"#,
        num(at.x),
        num(at.y),
        num(style.size),
        style.weight,
        fill_attrs(&style.fill),
        num(style.opacity),
        escape(text),
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_contains_every_layer() {
        let mut surface = SvgSurface::new(100.0, 50.0);
        surface.clear();
        surface.stroke_segments(
            &[(Point::new(0.0, 0.0), Point::new(0.0, 50.0))],
            Stroke { color: Color::rgba(51, 51, 51, 0.5), width: 0.5 },
        );
        surface.fill_rect(Point::new(1.0, 2.0), 3.0, 4.5, Color::rgb(0x10, 0xB9, 0x81));
        surface.draw_text(
            "+42usd",
            Point::new(10.0, 10.0),
            &TextStyle {
                size:    32.0,
                weight:  700,
                align:   TextAlign::Center,
                fill:    Color::rgb(0x10, 0xB9, 0x81),
                outline: Some(Stroke { color: Color::BLACK, width: 6.0 }),
                opacity: 0.25,
            },
        );

        let doc = surface.document();
        assert!(doc.starts_with("<svg"));
        assert!(doc.contains(r#"d="M0 0L0 50""#));
        assert!(doc.contains(r#"stroke-opacity="0.5""#));
        assert!(doc.contains(r##"<rect x="1" y="2" width="3" height="4.5" fill="#10B981"/>"##));
        assert!(doc.contains(">+42usd</text>"));
        assert!(doc.contains(r##"stroke="#000000""##));
        assert!(doc.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(escape(r#"<a & "b">"#), "&lt;a &amp; &quot;b&quot;&gt;");
    }

    #[test]
    fn test_write_to_missing_directory_is_io_error() {
        let surface = SvgSurface::new(10.0, 10.0);
        let err = surface.write_to("/nonexistent-dir/helios/chart.svg").unwrap_err();
        assert!(matches!(err, ChartError::Io(_)));
    }
}
