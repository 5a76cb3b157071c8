//! CatDAO Pipeline - Render Pipeline Orchestration
//!
//! This crate provides the infrastructure for composing render pipelines
//! from multiple stages, with a cache of finished portraits.
//!
//! # Pipeline Architecture
//!
//! ```text
//! PortraitRequest → [generator] → [ascii | canvas | svg | png] → RenderOutput
//!                                              ↑
//!                              skipped unless the format matches
//! ```
//!
//! Each stage processes a RenderContext and passes it to the next stage.

pub mod cache;
pub mod pipeline;
pub mod stage;

// Re-export commonly used types
pub use cache::{CacheStats, PortraitCache, PortraitKey};
pub use pipeline::{PipelineBuilder, PipelineConfig, PipelineError, RenderPipeline};
pub use stage::{GeneratorStage, PipelineStage, RenderContext, RenderMetrics, StageError};
