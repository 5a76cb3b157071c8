//! Pipeline stage abstraction
//!
//! Stages are the building blocks of render pipelines.
//! Each stage processes a RenderContext and produces a modified context.

use async_trait::async_trait;
use catdao_core::{
    CatTraits, OutputFormat, Palette, PortraitRequest, RenderOutput, TraitGenerator,
};
use std::collections::HashMap;
use tracing::debug;

/// A single stage in the render pipeline
#[async_trait]
pub trait PipelineStage: Send + Sync {
    /// Process the render context
    async fn process(&mut self, context: RenderContext) -> Result<RenderContext, StageError>;

    /// Stage name for debugging
    fn name(&self) -> &'static str;

    /// Whether this stage can be skipped (for optimization)
    fn can_skip(&self, _context: &RenderContext) -> bool {
        false
    }
}

/// Stage processing error
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),

    #[error("Missing required input: {0}")]
    MissingInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Context passed through pipeline stages
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// What to draw
    pub request: PortraitRequest,

    /// Requested output format
    pub format: OutputFormat,

    /// Colour adjustment applied by renderers
    pub palette: Palette,

    /// Generated traits (set by the generator stage)
    pub traits: Option<CatTraits>,

    /// Final output (set by final stage)
    pub output: Option<RenderOutput>,

    /// Performance metrics
    pub metrics: RenderMetrics,
}

impl RenderContext {
    /// Create a new render context
    pub fn new(request: PortraitRequest, format: OutputFormat, palette: Palette) -> Self {
        Self {
            request,
            format,
            palette,
            traits: None,
            output: None,
            metrics: RenderMetrics::default(),
        }
    }

    /// Traits, or `MissingInput` if no generator stage has run
    pub fn require_traits(&self) -> Result<&CatTraits, StageError> {
        self.traits
            .as_ref()
            .ok_or_else(|| StageError::MissingInput("traits".to_string()))
    }

    /// Whether a renderer for `format` should run on this context
    pub fn wants(&self, format: OutputFormat) -> bool {
        self.format == format && self.output.is_none()
    }

    /// Extract the final output
    pub fn into_output(self) -> Result<RenderOutput, super::PipelineError> {
        self.output.ok_or(super::PipelineError::NoOutput)
    }

    /// Record stage timing
    pub fn record_stage_time(&mut self, stage_name: &str, duration_ms: f64) {
        self.metrics
            .stage_times
            .insert(stage_name.to_string(), duration_ms);
        self.metrics.total_time_ms += duration_ms;
    }
}

/// Render performance metrics
#[derive(Debug, Clone, Default)]
pub struct RenderMetrics {
    /// Time spent in each stage
    pub stage_times: HashMap<String, f64>,
    /// Total render time
    pub total_time_ms: f64,
    /// Stages that ran
    pub stages_run: usize,
    /// Whether the output came from the portrait cache
    pub cache_hit: bool,
}

/// Fills `context.traits` from the request
#[derive(Debug, Default)]
pub struct GeneratorStage {
    generator: TraitGenerator,
}

impl GeneratorStage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PipelineStage for GeneratorStage {
    async fn process(&mut self, mut context: RenderContext) -> Result<RenderContext, StageError> {
        let traits = self.generator.generate_for(&context.request);
        debug!(title = %traits.title(), state = traits.quantum_state.label(), "Traits ready");
        context.traits = Some(traits);
        Ok(context)
    }

    fn name(&self) -> &'static str {
        "generator"
    }

    fn can_skip(&self, context: &RenderContext) -> bool {
        context.traits.is_some()
    }
}

/// A no-op stage for testing
pub struct NoOpStage {
    name: &'static str,
}

impl NoOpStage {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

#[async_trait]
impl PipelineStage for NoOpStage {
    async fn process(&mut self, context: RenderContext) -> Result<RenderContext, StageError> {
        Ok(context)
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn can_skip(&self, _context: &RenderContext) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catdao_core::{CatKind, QuantumState, Rarity};

    fn context(kind: CatKind) -> RenderContext {
        RenderContext::new(
            PortraitRequest::new(42, kind, Rarity::Rare),
            OutputFormat::Ascii,
            Palette::Natural,
        )
    }

    #[test]
    fn test_require_traits() {
        let ctx = context(CatKind::Generic);
        assert!(matches!(
            ctx.require_traits(),
            Err(StageError::MissingInput(input)) if input == "traits"
        ));
    }

    #[test]
    fn test_wants_format() {
        let ctx = context(CatKind::Generic);
        assert!(ctx.wants(OutputFormat::Ascii));
        assert!(!ctx.wants(OutputFormat::Svg));
    }

    #[test]
    fn test_record_stage_time() {
        let mut ctx = context(CatKind::Generic);
        ctx.record_stage_time("a", 1.5);
        ctx.record_stage_time("b", 2.0);
        assert!((ctx.metrics.total_time_ms - 3.5).abs() < 1e-9);
        assert_eq!(ctx.metrics.stage_times.len(), 2);
    }

    #[tokio::test]
    async fn test_generator_stage() {
        let mut stage = GeneratorStage::new();
        let ctx = context(CatKind::Quantum);
        assert!(!stage.can_skip(&ctx));

        let ctx = stage.process(ctx).await.unwrap();
        let traits = ctx.require_traits().unwrap();
        assert_eq!(traits.title(), "Quantum Cat #42");
        assert!(stage.can_skip(&ctx));
    }

    #[tokio::test]
    async fn test_generator_stage_observed() {
        let mut stage = GeneratorStage::new();
        let mut ctx = context(CatKind::Schrodinger);
        ctx.request = ctx.request.with_observed(true);

        let ctx = stage.process(ctx).await.unwrap();
        assert_eq!(
            ctx.require_traits().unwrap().quantum_state,
            QuantumState::Observed
        );
    }

    #[tokio::test]
    async fn test_noop_stage() {
        let mut stage = NoOpStage::new("test");
        let ctx = stage.process(context(CatKind::Bitcoin)).await.unwrap();
        assert!(ctx.traits.is_none());
        assert_eq!(stage.name(), "test");
    }
}
