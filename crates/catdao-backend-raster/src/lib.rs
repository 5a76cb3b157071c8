//! CatDAO Raster Backend
//!
//! Rasterises portrait drawings into RGBA pixel frames and exports PNG.

pub mod compositor;
pub mod rasterizer;
pub mod renderer;

pub use compositor::{LayerCompositor, RenderLayer};
pub use rasterizer::Rasterizer;
pub use renderer::{RasterError, RasterRenderer};
