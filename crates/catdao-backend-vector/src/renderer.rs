//! Canvas and SVG renderer pipeline stages

use async_trait::async_trait;
use catdao_core::{OutputFormat, RenderOutput};
use catdao_pipeline::stage::{PipelineStage, RenderContext, StageError};
use tracing::debug;

use crate::painter::PortraitPainter;
use crate::svg::SvgWriter;

/// Emits the portrait as layered drawing commands
#[derive(Debug, Default)]
pub struct CanvasRenderer {
    painter: PortraitPainter,
}

impl CanvasRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PipelineStage for CanvasRenderer {
    async fn process(&mut self, mut context: RenderContext) -> Result<RenderContext, StageError> {
        let traits = context.require_traits()?;
        let drawing = self.painter.paint(traits, &context.request, context.palette);
        debug!(
            size = drawing.width,
            commands = drawing.command_count(),
            "canvas portrait painted"
        );
        context.output = Some(RenderOutput::Canvas(drawing));
        Ok(context)
    }

    fn name(&self) -> &'static str {
        "canvas_renderer"
    }

    fn can_skip(&self, context: &RenderContext) -> bool {
        !context.wants(OutputFormat::Canvas)
    }
}

/// Emits the portrait as standalone SVG markup
#[derive(Debug, Default)]
pub struct SvgRenderer {
    painter: PortraitPainter,
    writer: SvgWriter,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom writer (e.g. higher coordinate precision)
    pub fn with_writer(mut self, writer: SvgWriter) -> Self {
        self.writer = writer;
        self
    }
}

#[async_trait]
impl PipelineStage for SvgRenderer {
    async fn process(&mut self, mut context: RenderContext) -> Result<RenderContext, StageError> {
        let traits = context.require_traits()?;
        let drawing = self.painter.paint(traits, &context.request, context.palette);
        let svg = self.writer.write(&drawing);
        debug!(bytes = svg.len(), "svg portrait written");
        context.output = Some(RenderOutput::Svg(svg));
        Ok(context)
    }

    fn name(&self) -> &'static str {
        "svg_renderer"
    }

    fn can_skip(&self, context: &RenderContext) -> bool {
        !context.wants(OutputFormat::Svg)
    }
}
