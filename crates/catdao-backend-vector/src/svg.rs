//! SVG serialisation
//!
//! Any [`Drawing`] can be written as standalone SVG. Numbers are printed
//! with a fixed precision and trailing zeros removed, so identical drawings
//! always produce byte-identical markup.

use std::fmt::Write;

use catdao_core::{BlendMode, DrawCommand, DrawLayer, Drawing, Paint, Rgba, Stroke};

/// Writes drawings as SVG markup
#[derive(Debug, Clone, Copy)]
pub struct SvgWriter {
    /// Decimal places kept for coordinates
    precision: usize,
}

impl SvgWriter {
    pub const DEFAULT_PRECISION: usize = 2;

    pub fn new() -> Self {
        Self {
            precision: Self::DEFAULT_PRECISION,
        }
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision.min(6);
        self
    }

    /// Serialise a drawing
    pub fn write(&self, drawing: &Drawing) -> String {
        let mut out = String::new();
        let w = self.num(drawing.width);
        let h = self.num(drawing.height);

        // Writing into a String cannot fail
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        );
        for layer in &drawing.layers {
            self.write_layer(&mut out, layer, drawing);
        }
        out.push_str("</svg>\n");
        out
    }

    fn write_layer(&self, out: &mut String, layer: &DrawLayer, drawing: &Drawing) {
        let _ = write!(out, r#"  <g id="{}""#, escape_xml(&layer.name));
        if layer.opacity < 1.0 {
            let _ = write!(out, r#" opacity="{}""#, self.num(layer.opacity as f64));
        }
        if layer.blend != BlendMode::Normal {
            let _ = write!(out, r#" style="mix-blend-mode:{}""#, layer.blend.css_name());
        }
        out.push_str(">\n");

        for command in &layer.commands {
            out.push_str("    ");
            self.write_command(out, command, drawing);
            out.push('\n');
        }

        out.push_str("  </g>\n");
    }

    fn write_command(&self, out: &mut String, command: &DrawCommand, drawing: &Drawing) {
        let _ = match command {
            DrawCommand::Clear { color } => write!(
                out,
                r#"<rect x="0" y="0" width="{}" height="{}"{}/>"#,
                self.num(drawing.width),
                self.num(drawing.height),
                fill_attrs(*color)
            ),
            DrawCommand::Rect { x, y, w, h, paint } => write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}"{}/>"#,
                self.num(*x),
                self.num(*y),
                self.num(*w),
                self.num(*h),
                self.paint_attrs(paint)
            ),
            DrawCommand::Circle { cx, cy, r, paint } => write!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}"{}/>"#,
                self.num(*cx),
                self.num(*cy),
                self.num(*r),
                self.paint_attrs(paint)
            ),
            DrawCommand::Ellipse {
                cx,
                cy,
                rx,
                ry,
                paint,
            } => write!(
                out,
                r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}"{}/>"#,
                self.num(*cx),
                self.num(*cy),
                self.num(*rx),
                self.num(*ry),
                self.paint_attrs(paint)
            ),
            DrawCommand::Polygon { points, paint } => write!(
                out,
                r#"<polygon points="{}" fill-rule="evenodd"{}/>"#,
                self.points(points),
                self.paint_attrs(paint)
            ),
            DrawCommand::Line { from, to, stroke } => write!(
                out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
                self.num(from[0]),
                self.num(from[1]),
                self.num(to[0]),
                self.num(to[1]),
                self.stroke_attrs(stroke)
            ),
            DrawCommand::Polyline { points, stroke } => write!(
                out,
                r#"<polyline points="{}" fill="none"{}/>"#,
                self.points(points),
                self.stroke_attrs(stroke)
            ),
            DrawCommand::Text {
                x,
                y,
                size,
                content,
                color,
            } => write!(
                out,
                r#"<text x="{}" y="{}" font-size="{}" font-family="monospace" text-anchor="middle" dominant-baseline="middle"{}>{}</text>"#,
                self.num(*x),
                self.num(*y),
                self.num(*size),
                fill_attrs(*color),
                escape_xml(content)
            ),
        };
    }

    fn paint_attrs(&self, paint: &Paint) -> String {
        let mut attrs = match paint.fill {
            Some(color) => fill_attrs(color),
            None => r#" fill="none""#.to_string(),
        };
        if let Some(stroke) = &paint.stroke {
            attrs.push_str(&self.stroke_attrs(stroke));
        }
        attrs
    }

    fn stroke_attrs(&self, stroke: &Stroke) -> String {
        let mut attrs = format!(
            r#" stroke="{}" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round""#,
            hex(stroke.color),
            self.num(stroke.width)
        );
        if stroke.color[3] < 255 {
            let _ = write!(attrs, r#" stroke-opacity="{}""#, alpha(stroke.color));
        }
        attrs
    }

    fn points(&self, points: &[[f64; 2]]) -> String {
        points
            .iter()
            .map(|p| format!("{},{}", self.num(p[0]), self.num(p[1])))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn num(&self, v: f64) -> String {
        format_number(v, self.precision)
    }
}

impl Default for SvgWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a number with at most `precision` decimals and no trailing zeros
///
/// Non-finite values print as `0`; negative zero prints as `0`.
pub fn format_number(v: f64, precision: usize) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut s = format!("{:.*}", precision, v);
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

/// Escape text for XML content and attribute values
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn hex(color: Rgba) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

fn alpha(color: Rgba) -> String {
    format_number(color[3] as f64 / 255.0, 3)
}

fn fill_attrs(color: Rgba) -> String {
    if color[3] < 255 {
        format!(r#" fill="{}" fill-opacity="{}""#, hex(color), alpha(color))
    } else {
        format!(r#" fill="{}""#, hex(color))
    }
}
