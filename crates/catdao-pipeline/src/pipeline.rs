//! Render pipeline orchestration

use crate::cache::{PortraitCache, PortraitKey};
use crate::stage::{PipelineStage, RenderContext, RenderMetrics};
use catdao_core::{OutputFormat, Palette, PortraitRequest, RenderOutput};
use std::time::Instant;
use thiserror::Error;
use tracing::{Level, debug, info, span};

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No stages in pipeline")]
    NoStages,

    #[error("No output produced")]
    NoOutput,

    #[error("Stage '{0}' failed: {1}")]
    StageError(String, String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// A complete render pipeline
pub struct RenderPipeline {
    /// Pipeline stages (in order)
    stages: Vec<Box<dyn PipelineStage>>,
    /// Rendered portrait cache
    cache: PortraitCache,
    /// Configuration
    config: PipelineConfig,
    /// Metrics from the most recent render
    last_metrics: Option<RenderMetrics>,
}

impl RenderPipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Render one portrait in the given format
    pub async fn render(
        &mut self,
        request: &PortraitRequest,
        format: OutputFormat,
    ) -> Result<RenderOutput, PipelineError> {
        let span = span!(
            Level::DEBUG,
            "render_pipeline",
            seed = request.seed.value(),
            kind = request.kind.label(),
            format = format.label()
        );
        let _enter = span.enter();

        if self.stages.is_empty() {
            return Err(PipelineError::NoStages);
        }

        let palette = self.palette_for(request);
        let key = PortraitKey::new(*request, format, palette);

        if let Some(output) = self.cache.get(&key) {
            debug!("Portrait cache hit");
            self.last_metrics = Some(RenderMetrics {
                cache_hit: true,
                ..Default::default()
            });
            return Ok(output.clone());
        }

        let start = Instant::now();
        let mut context = RenderContext::new(*request, format, palette);

        // Process through each stage
        for stage in &mut self.stages {
            let stage_name = stage.name();

            // Check if stage can be skipped
            if stage.can_skip(&context) {
                debug!(stage = stage_name, "Skipping stage");
                continue;
            }

            let stage_start = Instant::now();

            context = stage
                .process(context)
                .await
                .map_err(|e| PipelineError::StageError(stage_name.to_string(), e.to_string()))?;

            let stage_duration = stage_start.elapsed().as_secs_f64() * 1000.0;
            context.record_stage_time(stage_name, stage_duration);
            context.metrics.stages_run += 1;

            debug!(
                stage = stage_name,
                duration_ms = stage_duration,
                "Stage completed"
            );
        }

        let total_duration = start.elapsed().as_secs_f64() * 1000.0;
        debug!(
            total_ms = total_duration,
            stages = context.metrics.stages_run,
            "Pipeline completed"
        );

        self.last_metrics = Some(context.metrics.clone());
        let output = context.into_output()?;
        self.cache.insert(key, output.clone());
        Ok(output)
    }

    /// Palette a request will be rendered with
    pub fn palette_for(&self, request: &PortraitRequest) -> Palette {
        self.config
            .palette
            .unwrap_or_else(|| Palette::for_kind(request.kind))
    }

    /// Get the portrait cache
    pub fn cache(&self) -> &PortraitCache {
        &self.cache
    }

    /// Get mutable portrait cache
    pub fn cache_mut(&mut self) -> &mut PortraitCache {
        &mut self.cache
    }

    /// Metrics from the most recent render
    pub fn last_metrics(&self) -> Option<&RenderMetrics> {
        self.last_metrics.as_ref()
    }

    /// Get pipeline configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Get number of stages
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Get stage names
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }
}

/// Pipeline builder
pub struct PipelineBuilder {
    stages: Vec<Box<dyn PipelineStage>>,
    config: PipelineConfig,
}

impl PipelineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            config: PipelineConfig::default(),
        }
    }

    /// Add a pipeline stage
    pub fn stage(mut self, stage: impl PipelineStage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Set configuration
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Force a palette for every kind
    pub fn palette(mut self, palette: Palette) -> Self {
        self.config.palette = Some(palette);
        self
    }

    /// Set cache capacity in portraits
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Result<RenderPipeline, PipelineError> {
        if self.stages.is_empty() {
            return Err(PipelineError::NoStages);
        }
        if self.config.cache_capacity > PipelineConfig::MAX_CACHE_CAPACITY {
            return Err(PipelineError::ConfigError(format!(
                "cache capacity {} exceeds {}",
                self.config.cache_capacity,
                PipelineConfig::MAX_CACHE_CAPACITY
            )));
        }

        info!(
            stages = self.stages.len(),
            cache_capacity = self.config.cache_capacity,
            "Building render pipeline"
        );

        Ok(RenderPipeline {
            stages: self.stages,
            cache: PortraitCache::new(self.config.cache_capacity),
            config: self.config,
            last_metrics: None,
        })
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Rendered portraits kept for reuse
    pub cache_capacity: usize,
    /// Palette override; `None` picks one per kind
    pub palette: Option<Palette>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 64,
            palette: None,
        }
    }
}

impl PipelineConfig {
    /// Upper bound on cache capacity
    pub const MAX_CACHE_CAPACITY: usize = 65_536;

    /// Configuration for one-shot batch rendering, where nothing repeats
    pub fn batch() -> Self {
        Self {
            cache_capacity: 0,
            palette: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{GeneratorStage, NoOpStage, StageError};
    use catdao_core::{CatKind, Rarity, TerminalFrame};

    /// Writes the trait title into a one-row frame
    struct TitleStage;

    #[async_trait::async_trait]
    impl PipelineStage for TitleStage {
        async fn process(&mut self, mut context: RenderContext) -> Result<RenderContext, StageError> {
            let title = context.require_traits()?.title();
            let mut frame = TerminalFrame::new(title.chars().count() as u32, 1);
            frame.draw_str(0, 0, &title, [255, 255, 255]);
            context.output = Some(RenderOutput::Terminal(frame));
            Ok(context)
        }

        fn name(&self) -> &'static str {
            "title"
        }

        fn can_skip(&self, context: &RenderContext) -> bool {
            !context.wants(OutputFormat::Ascii)
        }
    }

    fn request() -> PortraitRequest {
        PortraitRequest::new(42, CatKind::Bitcoin, Rarity::Epic)
    }

    #[tokio::test]
    async fn test_pipeline_builder() {
        let pipeline = RenderPipeline::builder()
            .stage(NoOpStage::new("stage1"))
            .stage(NoOpStage::new("stage2"))
            .cache_capacity(8)
            .build()
            .unwrap();

        assert_eq!(pipeline.stage_count(), 2);
        assert_eq!(pipeline.stage_names(), vec!["stage1", "stage2"]);
        assert_eq!(pipeline.cache().capacity(), 8);
    }

    #[tokio::test]
    async fn test_empty_pipeline_fails() {
        let result = RenderPipeline::builder().build();
        assert!(matches!(result, Err(PipelineError::NoStages)));
    }

    #[tokio::test]
    async fn test_oversized_cache_rejected() {
        let result = RenderPipeline::builder()
            .stage(NoOpStage::new("noop"))
            .cache_capacity(PipelineConfig::MAX_CACHE_CAPACITY + 1)
            .build();
        assert!(matches!(result, Err(PipelineError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_pipeline_render() {
        let mut pipeline = RenderPipeline::builder()
            .stage(GeneratorStage::new())
            .stage(TitleStage)
            .build()
            .unwrap();

        let output = pipeline.render(&request(), OutputFormat::Ascii).await.unwrap();
        let frame = output.as_terminal().unwrap();
        assert_eq!(frame.row_text(0), "Bitcoin Cat #42");
        assert_eq!(pipeline.last_metrics().unwrap().stages_run, 2);
    }

    #[tokio::test]
    async fn test_missing_traits_is_stage_error() {
        let mut pipeline = RenderPipeline::builder().stage(TitleStage).build().unwrap();

        let err = pipeline
            .render(&request(), OutputFormat::Ascii)
            .await
            .unwrap_err();
        match err {
            PipelineError::StageError(stage, message) => {
                assert_eq!(stage, "title");
                assert!(message.contains("traits"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unhandled_format_has_no_output() {
        let mut pipeline = RenderPipeline::builder()
            .stage(GeneratorStage::new())
            .stage(TitleStage)
            .build()
            .unwrap();

        let result = pipeline.render(&request(), OutputFormat::Svg).await;
        assert!(matches!(result, Err(PipelineError::NoOutput)));
    }

    #[tokio::test]
    async fn test_cache_reuses_output() {
        let mut pipeline = RenderPipeline::builder()
            .stage(GeneratorStage::new())
            .stage(TitleStage)
            .build()
            .unwrap();

        let first = pipeline.render(&request(), OutputFormat::Ascii).await.unwrap();
        let second = pipeline.render(&request(), OutputFormat::Ascii).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(pipeline.cache().stats().hits, 1);
        assert!(pipeline.last_metrics().unwrap().cache_hit);
    }

    #[tokio::test]
    async fn test_batch_config_skips_cache() {
        let mut pipeline = RenderPipeline::builder()
            .stage(GeneratorStage::new())
            .stage(TitleStage)
            .config(PipelineConfig::batch())
            .build()
            .unwrap();

        pipeline.render(&request(), OutputFormat::Ascii).await.unwrap();
        pipeline.render(&request(), OutputFormat::Ascii).await.unwrap();
        assert_eq!(pipeline.cache().stats().hits, 0);
        assert!(pipeline.cache().is_empty());
    }

    #[test]
    fn test_palette_override() {
        let pipeline = RenderPipeline::builder()
            .stage(NoOpStage::new("noop"))
            .palette(Palette::Sepia)
            .build()
            .unwrap();
        assert_eq!(pipeline.palette_for(&request()), Palette::Sepia);

        let default = RenderPipeline::builder()
            .stage(NoOpStage::new("noop"))
            .build()
            .unwrap();
        assert_eq!(default.palette_for(&request()), Palette::Warm);
    }
}
