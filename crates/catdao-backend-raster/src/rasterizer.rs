//! Drawing rasterisation
//!
//! Fills drawing commands into RGBA pixels by sampling each pixel centre.
//! There is no anti-aliasing, which keeps output byte-identical across runs
//! and thread counts.

use catdao_core::{DrawCommand, DrawLayer, Drawing, ImageFrame, Paint, Rgba};
use rayon::prelude::*;
use tracing::debug;

use crate::compositor::{LayerCompositor, RenderLayer};

/// Rasterises drawings at a fixed pixel size
#[derive(Debug, Clone, Copy)]
pub struct Rasterizer {
    width: u32,
    height: u32,
}

impl Rasterizer {
    /// Create a rasterizer for `width x height` output
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Rasterise every layer and composite them
    pub fn rasterize(&self, drawing: &Drawing) -> ImageFrame {
        let mut compositor = LayerCompositor::new(self.width, self.height);

        for (z, layer) in drawing.layers.iter().enumerate() {
            let mut target = RenderLayer::new(layer.name.clone(), self.width, self.height)
                .with_blend_mode(layer.blend)
                .with_opacity(layer.opacity)
                .with_z_order(z as i32);
            self.fill_layer(&mut target.frame, layer, drawing);
            compositor.add_layer(target);
        }

        debug!(
            width = self.width,
            height = self.height,
            layers = compositor.layer_count(),
            "drawing rasterised"
        );
        compositor.composite()
    }

    /// Fill one layer's commands into a frame, in order
    pub fn fill_layer(&self, frame: &mut ImageFrame, layer: &DrawLayer, drawing: &Drawing) {
        let scale = Scale {
            x: self.width as f64 / drawing.width.max(f64::EPSILON),
            y: self.height as f64 / drawing.height.max(f64::EPSILON),
        };

        for command in &layer.commands {
            self.fill_command(frame, command, scale);
        }
    }

    fn fill_command(&self, frame: &mut ImageFrame, command: &DrawCommand, scale: Scale) {
        let bounds = command.bounds();
        match command {
            DrawCommand::Clear { color } => frame.fill(*color),
            DrawCommand::Rect { x, y, w, h, paint } => {
                let (x0, y0, x1, y1) = (*x, *y, x + w, y + h);
                self.fill_paint(frame, scale, bounds, paint, |px, py| {
                    let inside = px >= x0 && px < x1 && py >= y0 && py < y1;
                    let edge = (px - x0).abs().min((px - x1).abs());
                    let edge_y = (py - y0).abs().min((py - y1).abs());
                    let within_x = px >= x0 && px <= x1;
                    let within_y = py >= y0 && py <= y1;
                    let dist = match (within_x, within_y) {
                        (true, true) => edge.min(edge_y),
                        (true, false) => edge_y,
                        (false, true) => edge,
                        (false, false) => edge.hypot(edge_y),
                    };
                    (inside, dist)
                });
            }
            DrawCommand::Circle { cx, cy, r, paint } => {
                let (cx, cy, r) = (*cx, *cy, *r);
                self.fill_paint(frame, scale, bounds, paint, |px, py| {
                    let d = (px - cx).hypot(py - cy);
                    (d <= r, (d - r).abs())
                });
            }
            DrawCommand::Ellipse {
                cx,
                cy,
                rx,
                ry,
                paint,
            } => {
                let (cx, cy) = (*cx, *cy);
                let (rx, ry) = (rx.max(f64::EPSILON), ry.max(f64::EPSILON));
                self.fill_paint(frame, scale, bounds, paint, |px, py| {
                    let q = ((px - cx) / rx).hypot((py - cy) / ry);
                    // Distance approximated in normalised space
                    (q <= 1.0, (q - 1.0).abs() * rx.min(ry))
                });
            }
            DrawCommand::Polygon { points, paint } => {
                self.fill_paint(frame, scale, bounds, paint, |px, py| {
                    let dist = closed_edges(points)
                        .map(|(a, b)| segment_distance([px, py], a, b))
                        .fold(f64::INFINITY, f64::min);
                    (even_odd_contains(points, px, py), dist)
                });
            }
            DrawCommand::Line { from, to, stroke } => {
                let (from, to, half) = (*from, *to, stroke.width / 2.0);
                self.fill_shape(frame, scale, bounds, stroke.color, |px, py| {
                    segment_distance([px, py], from, to) <= half
                });
            }
            DrawCommand::Polyline { points, stroke } => {
                let half = stroke.width / 2.0;
                self.fill_shape(frame, scale, bounds, stroke.color, |px, py| {
                    points
                        .windows(2)
                        .any(|w| segment_distance([px, py], w[0], w[1]) <= half)
                });
            }
            // Glyph rendering is left to vector outputs
            DrawCommand::Text { .. } => {}
        }
    }

    /// Fill then outline a closed shape
    ///
    /// `sample` returns whether a point is inside the shape and its distance
    /// to the outline.
    fn fill_paint<F>(
        &self,
        frame: &mut ImageFrame,
        scale: Scale,
        bounds: Option<[f64; 4]>,
        paint: &Paint,
        sample: F,
    ) where
        F: Fn(f64, f64) -> (bool, f64) + Sync,
    {
        if let Some(fill) = paint.fill {
            self.fill_shape(frame, scale, bounds, fill, |px, py| sample(px, py).0);
        }
        if let Some(stroke) = paint.stroke {
            let half = stroke.width / 2.0;
            self.fill_shape(frame, scale, bounds, stroke.color, |px, py| {
                sample(px, py).1 <= half
            });
        }
    }

    /// Blend `color` over every pixel whose centre satisfies `covers`
    fn fill_shape<F>(
        &self,
        frame: &mut ImageFrame,
        scale: Scale,
        bounds: Option<[f64; 4]>,
        color: Rgba,
        covers: F,
    ) where
        F: Fn(f64, f64) -> bool + Sync,
    {
        if color[3] == 0 || frame.width == 0 {
            return;
        }
        let Some([min_x, min_y, max_x, max_y]) = bounds else {
            return;
        };

        let x_start = (min_x * scale.x).floor().max(0.0) as u32;
        let x_end = ((max_x * scale.x).ceil().max(0.0) as u32).min(frame.width);
        let y_start = (min_y * scale.y).floor().max(0.0) as usize;
        let y_end = ((max_y * scale.y).ceil().max(0.0) as usize).min(frame.height as usize);
        if x_start >= x_end || y_start >= y_end {
            return;
        }

        let row_bytes = frame.width as usize * 4;
        frame
            .data
            .par_chunks_mut(row_bytes)
            .enumerate()
            .skip(y_start)
            .take(y_end - y_start)
            .for_each(|(y, row)| {
                let py = (y as f64 + 0.5) / scale.y;
                for x in x_start..x_end {
                    let px = (x as f64 + 0.5) / scale.x;
                    if !covers(px, py) {
                        continue;
                    }
                    let i = x as usize * 4;
                    let dst = [row[i], row[i + 1], row[i + 2], row[i + 3]];
                    let out = LayerCompositor::blend_pixels(
                        color,
                        dst,
                        catdao_core::BlendMode::Normal,
                        1.0,
                    );
                    row[i..i + 4].copy_from_slice(&out);
                }
            });
    }
}

/// Drawing units to pixels
#[derive(Debug, Clone, Copy)]
struct Scale {
    x: f64,
    y: f64,
}

/// Even-odd point-in-polygon test
pub fn even_odd_contains(points: &[[f64; 2]], x: f64, y: f64) -> bool {
    let mut inside = false;
    for (a, b) in closed_edges(points) {
        if (a[1] > y) != (b[1] > y) {
            let cross_x = a[0] + (y - a[1]) / (b[1] - a[1]) * (b[0] - a[0]);
            if x < cross_x {
                inside = !inside;
            }
        }
    }
    inside
}

fn closed_edges(points: &[[f64; 2]]) -> impl Iterator<Item = ([f64; 2], [f64; 2])> + '_ {
    let n = points.len();
    (0..n).map(move |i| (points[i], points[(i + 1) % n]))
}

/// Distance from `p` to the segment `a`-`b`
pub fn segment_distance(p: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq <= f64::EPSILON {
        0.0
    } else {
        (((p[0] - a[0]) * dx + (p[1] - a[1]) * dy) / len_sq).clamp(0.0, 1.0)
    };
    (p[0] - (a[0] + t * dx)).hypot(p[1] - (a[1] + t * dy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use catdao_core::{BlendMode, Stroke};

    fn drawing_with(commands: Vec<DrawCommand>) -> Drawing {
        let mut drawing = Drawing::new(10.0, 10.0);
        let mut layer = DrawLayer::new("test");
        for c in commands {
            layer.push(c);
        }
        drawing.add_layer(layer);
        drawing
    }

    const RED: Rgba = [255, 0, 0, 255];

    #[test]
    fn test_even_odd() {
        let square = [[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]];
        assert!(even_odd_contains(&square, 2.0, 2.0));
        assert!(!even_odd_contains(&square, 5.0, 2.0));

        // Self-overlapping star leaves its centre empty under even-odd
        let star = [
            [5.0, 0.0],
            [8.0, 10.0],
            [0.0, 3.5],
            [10.0, 3.5],
            [2.0, 10.0],
        ];
        assert!(!even_odd_contains(&star, 5.0, 5.0));
        assert!(even_odd_contains(&star, 5.0, 1.5));
    }

    #[test]
    fn test_segment_distance() {
        assert_eq!(segment_distance([0.0, 1.0], [-1.0, 0.0], [1.0, 0.0]), 1.0);
        assert_eq!(segment_distance([3.0, 0.0], [-1.0, 0.0], [1.0, 0.0]), 2.0);
        assert_eq!(segment_distance([0.0, 2.0], [0.0, 0.0], [0.0, 0.0]), 2.0);
    }

    #[test]
    fn test_rect_fill_scaled() {
        let drawing = drawing_with(vec![DrawCommand::Rect {
            x: 0.0,
            y: 0.0,
            w: 5.0,
            h: 5.0,
            paint: Paint::fill(RED),
        }]);
        let frame = Rasterizer::new(20, 20).rasterize(&drawing);

        assert_eq!(frame.get_pixel(0, 0), Some(RED));
        assert_eq!(frame.get_pixel(9, 9), Some(RED));
        assert_eq!(frame.get_pixel(10, 10), Some([0, 0, 0, 0]));
        assert_eq!(frame.opaque_pixels(), 100);
    }

    #[test]
    fn test_circle_stroke_leaves_centre_empty() {
        let drawing = drawing_with(vec![DrawCommand::Circle {
            cx: 5.0,
            cy: 5.0,
            r: 4.0,
            paint: Paint::stroke(RED, 1.0),
        }]);
        let frame = Rasterizer::new(10, 10).rasterize(&drawing);

        assert_eq!(frame.get_pixel(5, 5), Some([0, 0, 0, 0]));
        // Pixel (1, 5) has centre (1.5, 5.5), 3.54 from the centre
        assert_eq!(frame.get_pixel(1, 5), Some(RED));
    }

    #[test]
    fn test_line_and_text() {
        let drawing = drawing_with(vec![
            DrawCommand::Line {
                from: [0.0, 5.0],
                to: [10.0, 5.0],
                stroke: Stroke::new(RED, 2.0),
            },
            DrawCommand::Text {
                x: 5.0,
                y: 1.0,
                size: 2.0,
                content: "x".to_string(),
                color: RED,
            },
        ]);
        let frame = Rasterizer::new(10, 10).rasterize(&drawing);

        assert_eq!(frame.get_pixel(3, 4), Some(RED));
        assert_eq!(frame.get_pixel(3, 5), Some(RED));
        assert_eq!(frame.get_pixel(5, 1), Some([0, 0, 0, 0]));
        assert_eq!(frame.opaque_pixels(), 20);
    }

    #[test]
    fn test_layer_blend_and_opacity_honoured() {
        let mut drawing = Drawing::new(4.0, 4.0);
        let mut bg = DrawLayer::new("background");
        bg.push(DrawCommand::Clear {
            color: [0, 0, 0, 255],
        });
        drawing.add_layer(bg);
        let mut glow = DrawLayer::new("aura").with_blend(BlendMode::Additive).with_opacity(0.5);
        glow.push(DrawCommand::Clear {
            color: [200, 0, 0, 255],
        });
        drawing.add_layer(glow);

        let frame = Rasterizer::new(4, 4).rasterize(&drawing);
        assert_eq!(frame.get_pixel(2, 2), Some([100, 0, 0, 255]));
    }
}
