//! Raster renderer pipeline stage

use std::io::Cursor;
use std::path::Path;

use async_trait::async_trait;
use catdao_backend_vector::PortraitPainter;
use catdao_core::{CatTraits, ImageFrame, OutputFormat, Palette, PortraitRequest, RenderOutput};
use catdao_pipeline::stage::{PipelineStage, RenderContext, StageError};
use image::{ColorType, ImageFormat, RgbaImage};
use thiserror::Error;
use tracing::{debug, info};

use crate::rasterizer::Rasterizer;

/// PNG export errors
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Frame buffer holds {len} bytes, expected {width}x{height}x4")]
    InvalidFrame { width: u32, height: u32, len: usize },
}

/// Paints and rasterises portraits into pixel frames
#[derive(Debug, Default)]
pub struct RasterRenderer {
    painter: PortraitPainter,
}

impl RasterRenderer {
    /// Create a new raster renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Render traits into a square RGBA frame
    ///
    /// The edge length follows the request width, clamped like vector output.
    pub fn render(&self, traits: &CatTraits, request: &PortraitRequest, palette: Palette) -> ImageFrame {
        let drawing = self.painter.paint(traits, request, palette);
        let size = PortraitPainter::clamp_size(request.width);
        Rasterizer::new(size, size).rasterize(&drawing)
    }

    /// Encode a frame as PNG bytes
    pub fn encode_png(frame: &ImageFrame) -> Result<Vec<u8>, RasterError> {
        let image = to_rgba_image(frame)?;
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Write a frame to a PNG file
    pub fn save_png(frame: &ImageFrame, path: impl AsRef<Path>) -> Result<(), RasterError> {
        check_frame(frame)?;
        image::save_buffer_with_format(
            path.as_ref(),
            &frame.data,
            frame.width,
            frame.height,
            ColorType::Rgba8,
            ImageFormat::Png,
        )?;
        info!(path = %path.as_ref().display(), "PNG written");
        Ok(())
    }
}

fn check_frame(frame: &ImageFrame) -> Result<(), RasterError> {
    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.data.len() != expected || expected == 0 {
        return Err(RasterError::InvalidFrame {
            width: frame.width,
            height: frame.height,
            len: frame.data.len(),
        });
    }
    Ok(())
}

fn to_rgba_image(frame: &ImageFrame) -> Result<RgbaImage, RasterError> {
    check_frame(frame)?;
    RgbaImage::from_raw(frame.width, frame.height, frame.data.clone()).ok_or(
        RasterError::InvalidFrame {
            width: frame.width,
            height: frame.height,
            len: frame.data.len(),
        },
    )
}

#[async_trait]
impl PipelineStage for RasterRenderer {
    async fn process(&mut self, mut context: RenderContext) -> Result<RenderContext, StageError> {
        let traits = context.require_traits()?;
        let frame = self.render(traits, &context.request, context.palette);
        debug!(
            width = frame.width,
            height = frame.height,
            opaque = frame.opaque_pixels(),
            "raster portrait rendered"
        );
        context.output = Some(RenderOutput::Image(frame));
        Ok(context)
    }

    fn name(&self) -> &'static str {
        "raster_renderer"
    }

    fn can_skip(&self, context: &RenderContext) -> bool {
        !context.wants(OutputFormat::Png)
    }
}
