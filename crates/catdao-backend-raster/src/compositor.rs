//! Layer composition
//!
//! Composites rasterised drawing layers into a final image.

use catdao_core::{BlendMode, ImageFrame};
use rayon::prelude::*;

/// A rasterised layer awaiting composition
#[derive(Debug, Clone)]
pub struct RenderLayer {
    /// Layer name
    pub name: String,
    /// Layer frame
    pub frame: ImageFrame,
    /// Blend mode
    pub blend_mode: BlendMode,
    /// Layer opacity (0-1)
    pub opacity: f32,
    /// Z-order (higher = on top)
    pub z_order: i32,
}

impl RenderLayer {
    /// Create a new transparent layer
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            frame: ImageFrame::new_rgba8(width, height),
            blend_mode: BlendMode::Normal,
            opacity: 1.0,
            z_order: 0,
        }
    }

    /// Set blend mode
    pub fn with_blend_mode(mut self, mode: BlendMode) -> Self {
        self.blend_mode = mode;
        self
    }

    /// Set opacity
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Set z-order
    pub fn with_z_order(mut self, z: i32) -> Self {
        self.z_order = z;
        self
    }
}

/// Layer compositor
#[derive(Debug)]
pub struct LayerCompositor {
    layers: Vec<RenderLayer>,
    output_width: u32,
    output_height: u32,
}

impl LayerCompositor {
    /// Create a new compositor
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            layers: Vec::new(),
            output_width: width,
            output_height: height,
        }
    }

    /// Add a layer
    pub fn add_layer(&mut self, layer: RenderLayer) {
        self.layers.push(layer);
    }

    /// Get a layer by name
    pub fn get_layer(&self, name: &str) -> Option<&RenderLayer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Number of queued layers
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Clear all layers
    pub fn clear(&mut self) {
        self.layers.clear();
    }

    /// Composite all layers into a single frame
    ///
    /// Layers with equal z-order keep insertion order.
    pub fn composite(&mut self) -> ImageFrame {
        self.layers.sort_by_key(|l| l.z_order);

        let mut output = ImageFrame::new_rgba8(self.output_width, self.output_height);

        for layer in &self.layers {
            Self::blend_layer(&mut output, layer);
        }

        output
    }

    /// Blend a single layer onto the output, one row per task
    fn blend_layer(output: &mut ImageFrame, layer: &RenderLayer) {
        if layer.opacity <= 0.0 {
            return;
        }

        let row_bytes = output.width as usize * 4;
        let src_row_bytes = layer.frame.width as usize * 4;
        let copy_bytes = row_bytes.min(src_row_bytes);
        if copy_bytes == 0 {
            return;
        }

        output
            .data
            .par_chunks_mut(row_bytes)
            .zip(layer.frame.data.par_chunks(src_row_bytes))
            .for_each(|(dst_row, src_row)| {
                for (dst, src) in dst_row[..copy_bytes]
                    .chunks_exact_mut(4)
                    .zip(src_row[..copy_bytes].chunks_exact(4))
                {
                    let src = [src[0], src[1], src[2], src[3]];
                    let current = [dst[0], dst[1], dst[2], dst[3]];
                    let blended =
                        Self::blend_pixels(src, current, layer.blend_mode, layer.opacity);
                    dst.copy_from_slice(&blended);
                }
            });
    }

    /// Blend two straight-alpha pixels
    ///
    /// Non-normal modes fall back to normal blending over fully transparent
    /// destination pixels.
    pub fn blend_pixels(src: [u8; 4], dst: [u8; 4], mode: BlendMode, opacity: f32) -> [u8; 4] {
        let src_a = (src[3] as f32 / 255.0) * opacity;

        if src_a <= 0.0 {
            return dst;
        }

        let mode = if dst[3] == 0 { BlendMode::Normal } else { mode };

        match mode {
            BlendMode::Normal => {
                let dst_a = dst[3] as f32 / 255.0;
                let out_a = src_a + dst_a * (1.0 - src_a);

                if out_a <= 0.0 {
                    return [0, 0, 0, 0];
                }

                let blend = |s: u8, d: u8| -> u8 {
                    let s = s as f32 / 255.0;
                    let d = d as f32 / 255.0;
                    let out = (s * src_a + d * dst_a * (1.0 - src_a)) / out_a;
                    (out * 255.0).round().clamp(0.0, 255.0) as u8
                };

                [
                    blend(src[0], dst[0]),
                    blend(src[1], dst[1]),
                    blend(src[2], dst[2]),
                    (out_a * 255.0).round() as u8,
                ]
            }

            BlendMode::Additive => [
                (dst[0] as u16 + (src[0] as f32 * src_a) as u16).min(255) as u8,
                (dst[1] as u16 + (src[1] as f32 * src_a) as u16).min(255) as u8,
                (dst[2] as u16 + (src[2] as f32 * src_a) as u16).min(255) as u8,
                dst[3].max((src_a * 255.0) as u8),
            ],

            BlendMode::Multiply => {
                let mul = |s: u8, d: u8| -> u8 {
                    let s = s as f32 / 255.0;
                    let d = d as f32 / 255.0;
                    let m = s * d;
                    let result = d * (1.0 - src_a) + m * src_a;
                    (result * 255.0) as u8
                };

                [
                    mul(src[0], dst[0]),
                    mul(src[1], dst[1]),
                    mul(src[2], dst[2]),
                    dst[3],
                ]
            }

            BlendMode::Screen => {
                let screen = |s: u8, d: u8| -> u8 {
                    let s = s as f32 / 255.0;
                    let d = d as f32 / 255.0;
                    let m = 1.0 - (1.0 - s) * (1.0 - d);
                    let result = d * (1.0 - src_a) + m * src_a;
                    (result * 255.0) as u8
                };

                [
                    screen(src[0], dst[0]),
                    screen(src[1], dst[1]),
                    screen(src[2], dst[2]),
                    dst[3],
                ]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_creation() {
        let layer = RenderLayer::new("test", 100, 100)
            .with_blend_mode(BlendMode::Additive)
            .with_opacity(0.5)
            .with_z_order(10);

        assert_eq!(layer.name, "test");
        assert_eq!(layer.blend_mode, BlendMode::Additive);
        assert_eq!(layer.opacity, 0.5);
        assert_eq!(layer.z_order, 10);
    }

    #[test]
    fn test_compositor_z_order() {
        let mut compositor = LayerCompositor::new(10, 10);

        let mut fg = RenderLayer::new("portrait", 10, 10).with_z_order(1);
        fg.frame.set_pixel(5, 5, [255, 0, 0, 255]);
        let mut bg = RenderLayer::new("background", 10, 10).with_z_order(0);
        bg.frame.fill([100, 100, 100, 255]);

        // Added out of order on purpose
        compositor.add_layer(fg);
        compositor.add_layer(bg);
        assert_eq!(compositor.layer_count(), 2);

        let output = compositor.composite();
        assert_eq!(output.get_pixel(0, 0), Some([100, 100, 100, 255]));
        assert_eq!(output.get_pixel(5, 5), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_layer_opacity() {
        let mut compositor = LayerCompositor::new(4, 4);

        let mut bg = RenderLayer::new("background", 4, 4);
        bg.frame.fill([0, 0, 0, 255]);
        let mut ghost = RenderLayer::new("portrait", 4, 4)
            .with_opacity(0.5)
            .with_z_order(1);
        ghost.frame.fill([200, 200, 200, 255]);

        compositor.add_layer(bg);
        compositor.add_layer(ghost);
        let px = compositor.composite().get_pixel(1, 1).unwrap();
        assert_eq!(px, [100, 100, 100, 255]);
    }

    #[test]
    fn test_additive_blend() {
        let dst = [100, 100, 100, 255];
        let src = [50, 50, 50, 255];

        let result = LayerCompositor::blend_pixels(src, dst, BlendMode::Additive, 1.0);
        assert_eq!(result[0], 150);
    }

    #[test]
    fn test_screen_lightens() {
        let dst = [100, 100, 100, 255];
        let result = LayerCompositor::blend_pixels([100, 100, 100, 255], dst, BlendMode::Screen, 1.0);
        assert!(result[0] > 100);
        assert_eq!(result[3], 255);
    }

    #[test]
    fn test_screen_over_transparent_is_normal() {
        let result =
            LayerCompositor::blend_pixels([10, 20, 30, 255], [0, 0, 0, 0], BlendMode::Screen, 1.0);
        assert_eq!(result, [10, 20, 30, 255]);
    }
}
