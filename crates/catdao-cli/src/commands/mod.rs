//! CLI commands

pub mod gallery;
pub mod generate;
pub mod observe;
pub mod render;
pub mod showcase;

use catdao_backend_raster::RasterRenderer;
use catdao_backend_terminal::AsciiRenderer;
use catdao_backend_vector::{CanvasRenderer, SvgRenderer};
use catdao_core::{CatDaoConfig, Rarity, Seed};
use catdao_pipeline::{GeneratorStage, PipelineBuilder, PipelineError, RenderPipeline};
use rand::Rng;

/// Seed from the command line, or a fresh random one
pub fn resolve_seed(seed: Option<i64>) -> Seed {
    match seed {
        Some(raw) => Seed::new(raw),
        None => Seed::new(rand::rng().random_range(1..=999_999)),
    }
}

/// Rarity from the command line, or the configured default
pub fn resolve_rarity(config: &CatDaoConfig, rarity: Option<&str>) -> Rarity {
    rarity.map(Rarity::from_label).unwrap_or_else(|| config.rarity())
}

/// Pipeline with every renderer; only the one matching the format runs
pub fn build_pipeline(config: &CatDaoConfig) -> Result<RenderPipeline, PipelineError> {
    let mut builder = PipelineBuilder::new()
        .stage(GeneratorStage::new())
        .stage(AsciiRenderer::new())
        .stage(CanvasRenderer::new())
        .stage(SvgRenderer::new())
        .stage(RasterRenderer::new())
        .cache_capacity(config.cache_capacity);

    if let Some(palette) = config.palette {
        builder = builder.palette(palette);
    }

    builder.build()
}
