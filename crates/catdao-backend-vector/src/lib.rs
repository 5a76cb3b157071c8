//! CatDAO Vector Backend
//!
//! Paints cat traits as resolution-independent drawing commands. The same
//! [`Drawing`](catdao_core::Drawing) serves the canvas output format (JSON
//! commands), SVG markup, and the raster back-end.

pub mod painter;
pub mod renderer;
pub mod svg;

pub use painter::{PortraitPainter, apply_palette};
pub use renderer::{CanvasRenderer, SvgRenderer};
pub use svg::SvgWriter;
