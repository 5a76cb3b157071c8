//! 2D canvas drawing commands
//!
//! A [`Drawing`] is an ordered list of named layers, each an ordered list of
//! primitive commands in a `width x height` user-space coordinate system with
//! the origin at the top left. Back-ends consume drawings without knowing
//! anything about cats: the raster back-end fills pixels, the SVG writer
//! emits markup, and the canvas format serialises the commands as JSON.

use serde::{Deserialize, Serialize};

/// RGBA colour, straight (non-premultiplied) alpha
pub type Rgba = [u8; 4];

/// Opaque colour from RGB
pub fn rgb(c: [u8; 3]) -> Rgba {
    [c[0], c[1], c[2], 255]
}

/// Colour from RGB with alpha in `0.0..=1.0`
pub fn rgba(c: [u8; 3], alpha: f32) -> Rgba {
    [c[0], c[1], c[2], (alpha.clamp(0.0, 1.0) * 255.0).round() as u8]
}

/// Blend mode for layer composition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// Normal alpha blending
    #[default]
    Normal,
    /// Additive blending (for glows, lights)
    Additive,
    /// Multiplicative blending (for shadows)
    Multiply,
    /// Screen blending (lightens)
    Screen,
}

impl BlendMode {
    /// CSS `mix-blend-mode` keyword
    pub fn css_name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            // CSS has no additive mode; plus-lighter is the closest match
            Self::Additive => "plus-lighter",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
        }
    }
}

/// Line style
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f64,
}

impl Stroke {
    pub fn new(color: Rgba, width: f64) -> Self {
        Self { color, width }
    }
}

/// Fill and/or outline for closed shapes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Paint {
    pub fill: Option<Rgba>,
    pub stroke: Option<Stroke>,
}

impl Paint {
    /// Fill only
    pub fn fill(color: Rgba) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
        }
    }

    /// Outline only
    pub fn stroke(color: Rgba, width: f64) -> Self {
        Self {
            fill: None,
            stroke: Some(Stroke::new(color, width)),
        }
    }

    /// Add an outline to this paint
    pub fn with_stroke(mut self, color: Rgba, width: f64) -> Self {
        self.stroke = Some(Stroke::new(color, width));
        self
    }
}

/// A single drawing primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Fill the whole layer
    Clear { color: Rgba },
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        paint: Paint,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        paint: Paint,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        paint: Paint,
    },
    /// Closed polygon, even-odd fill
    Polygon { points: Vec<[f64; 2]>, paint: Paint },
    Line {
        from: [f64; 2],
        to: [f64; 2],
        stroke: Stroke,
    },
    /// Open path through the points
    Polyline { points: Vec<[f64; 2]>, stroke: Stroke },
    /// Centred text; pixel back-ends skip it
    Text {
        x: f64,
        y: f64,
        size: f64,
        content: String,
        color: Rgba,
    },
}

impl DrawCommand {
    /// Axis-aligned bounds `[min_x, min_y, max_x, max_y]`, including stroke
    ///
    /// `None` for commands with no intrinsic extent (`Clear`, `Text`).
    pub fn bounds(&self) -> Option<[f64; 4]> {
        let pad = |paint: &Paint| paint.stroke.map(|s| s.width / 2.0).unwrap_or(0.0);
        match self {
            Self::Clear { .. } | Self::Text { .. } => None,
            Self::Rect { x, y, w, h, paint } => {
                let p = pad(paint);
                Some([x - p, y - p, x + w + p, y + h + p])
            }
            Self::Circle { cx, cy, r, paint } => {
                let e = r + pad(paint);
                Some([cx - e, cy - e, cx + e, cy + e])
            }
            Self::Ellipse {
                cx,
                cy,
                rx,
                ry,
                paint,
            } => {
                let p = pad(paint);
                Some([cx - rx - p, cy - ry - p, cx + rx + p, cy + ry + p])
            }
            Self::Polygon { points, paint } => points_bounds(points, pad(paint)),
            Self::Line { from, to, stroke } => points_bounds(&[*from, *to], stroke.width / 2.0),
            Self::Polyline { points, stroke } => points_bounds(points, stroke.width / 2.0),
        }
    }
}

fn points_bounds(points: &[[f64; 2]], pad: f64) -> Option<[f64; 4]> {
    let first = points.first()?;
    let mut b = [first[0], first[1], first[0], first[1]];
    for p in points {
        b[0] = b[0].min(p[0]);
        b[1] = b[1].min(p[1]);
        b[2] = b[2].max(p[0]);
        b[3] = b[3].max(p[1]);
    }
    Some([b[0] - pad, b[1] - pad, b[2] + pad, b[3] + pad])
}

/// A named group of commands composited as a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawLayer {
    pub name: String,
    pub blend: BlendMode,
    /// Layer opacity (0-1)
    pub opacity: f32,
    pub commands: Vec<DrawCommand>,
}

impl DrawLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blend: BlendMode::Normal,
            opacity: 1.0,
            commands: Vec::new(),
        }
    }

    pub fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// A complete layered drawing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub width: f64,
    pub height: f64,
    pub layers: Vec<DrawLayer>,
}

impl Drawing {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            layers: Vec::new(),
        }
    }

    /// Append a layer; empty layers are dropped
    pub fn add_layer(&mut self, layer: DrawLayer) {
        if !layer.is_empty() {
            self.layers.push(layer);
        }
    }

    pub fn layer(&self, name: &str) -> Option<&DrawLayer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Total commands across layers
    pub fn command_count(&self) -> usize {
        self.layers.iter().map(|l| l.commands.len()).sum()
    }

    /// Iterate every command in paint order
    pub fn commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.layers.iter().flat_map(|l| l.commands.iter())
    }

    /// Serialise to pretty JSON (the canvas output format)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_layers_dropped() {
        let mut drawing = Drawing::new(100.0, 100.0);
        drawing.add_layer(DrawLayer::new("empty"));
        assert!(drawing.layers.is_empty());

        let mut layer = DrawLayer::new("bg");
        layer.push(DrawCommand::Clear {
            color: [0, 0, 0, 255],
        });
        drawing.add_layer(layer);
        assert_eq!(drawing.command_count(), 1);
        assert!(drawing.layer("bg").is_some());
    }

    #[test]
    fn test_bounds_include_stroke() {
        let cmd = DrawCommand::Circle {
            cx: 10.0,
            cy: 10.0,
            r: 5.0,
            paint: Paint::stroke([0, 0, 0, 255], 2.0),
        };
        assert_eq!(cmd.bounds(), Some([4.0, 4.0, 16.0, 16.0]));

        let poly = DrawCommand::Polygon {
            points: vec![],
            paint: Paint::default(),
        };
        assert_eq!(poly.bounds(), None);
    }

    #[test]
    fn test_command_json_tag() {
        let cmd = DrawCommand::Line {
            from: [0.0, 0.0],
            to: [1.0, 1.0],
            stroke: Stroke::new([1, 2, 3, 4], 1.5),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"op\":\"line\""));
    }

    #[test]
    fn test_rgba_helpers() {
        assert_eq!(rgb([1, 2, 3]), [1, 2, 3, 255]);
        assert_eq!(rgba([1, 2, 3], 0.5)[3], 128);
        assert_eq!(rgba([1, 2, 3], 7.0)[3], 255);
    }
}
