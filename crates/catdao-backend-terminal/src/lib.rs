//! CatDAO Terminal Backend
//!
//! ASCII/Unicode character-based portraits for terminal output.
//! Supports true color, 256 color, basic 16-color and monochrome modes.

pub mod color;
pub mod output;
pub mod renderer;
pub mod sprites;

// Re-export commonly used types
pub use color::{ColorMapper, MappedColor};
pub use output::{OutputError, TerminalOutput};
pub use renderer::AsciiRenderer;
pub use sprites::SpriteGenerator;
