//! Render output types
//!
//! These types represent the final rendered portrait.

use crate::drawing::Drawing;
use crate::error::CatDaoError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Requested output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Coloured character grid
    #[default]
    Ascii,
    /// 2D drawing commands
    Canvas,
    /// SVG markup
    Svg,
    /// Rasterised PNG
    Png,
}

impl OutputFormat {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Canvas => "canvas",
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = CatDaoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ascii" | "terminal" | "text" => Ok(Self::Ascii),
            "canvas" | "json" => Ok(Self::Canvas),
            "svg" => Ok(Self::Svg),
            "png" | "image" => Ok(Self::Png),
            _ => Err(CatDaoError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The result of rendering a portrait
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutput {
    /// Terminal output - grid of cells
    Terminal(TerminalFrame),
    /// Canvas drawing commands
    Canvas(Drawing),
    /// SVG document
    Svg(String),
    /// Image output - pixel buffer
    Image(ImageFrame),
}

impl RenderOutput {
    /// Get the dimensions of the output
    ///
    /// SVG reports `(0, 0)`; its size lives in the markup.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Terminal(f) => (f.width, f.height),
            Self::Canvas(d) => (d.width.round() as u32, d.height.round() as u32),
            Self::Svg(_) => (0, 0),
            Self::Image(f) => (f.width, f.height),
        }
    }

    /// Format this output corresponds to
    pub fn format(&self) -> OutputFormat {
        match self {
            Self::Terminal(_) => OutputFormat::Ascii,
            Self::Canvas(_) => OutputFormat::Canvas,
            Self::Svg(_) => OutputFormat::Svg,
            Self::Image(_) => OutputFormat::Png,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image(_))
    }

    pub fn as_terminal(&self) -> Option<&TerminalFrame> {
        match self {
            Self::Terminal(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_canvas(&self) -> Option<&Drawing> {
        match self {
            Self::Canvas(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_svg(&self) -> Option<&str> {
        match self {
            Self::Svg(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageFrame> {
        match self {
            Self::Image(f) => Some(f),
            _ => None,
        }
    }

    /// Approximate heap footprint in bytes
    pub fn memory_size(&self) -> usize {
        match self {
            Self::Terminal(f) => f.cells.len() * std::mem::size_of::<TerminalCell>(),
            Self::Canvas(d) => d.command_count() * 64,
            Self::Svg(s) => s.len(),
            Self::Image(f) => f.data.len(),
        }
    }
}

/// Terminal frame - 2D grid of characters with colors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalFrame {
    /// Width in cells
    pub width: u32,
    /// Height in cells
    pub height: u32,
    /// Cell data (row-major order)
    pub cells: Vec<TerminalCell>,
}

impl TerminalFrame {
    /// Create a new empty terminal frame
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![TerminalCell::default(); (width * height) as usize],
        }
    }

    /// Fill the frame with a single cell
    pub fn fill(&mut self, cell: TerminalCell) {
        self.cells.fill(cell);
    }

    /// Get a cell at position
    pub fn get(&self, x: u32, y: u32) -> Option<&TerminalCell> {
        if x < self.width && y < self.height {
            Some(&self.cells[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Get a mutable cell at position
    pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut TerminalCell> {
        if x < self.width && y < self.height {
            Some(&mut self.cells[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Set a cell at position; out-of-bounds writes are ignored
    pub fn set(&mut self, x: u32, y: u32, cell: TerminalCell) {
        if x < self.width && y < self.height {
            self.cells[(y * self.width + x) as usize] = cell;
        }
    }

    /// Draw a string at position, clipped at the right edge
    pub fn draw_str(&mut self, x: u32, y: u32, s: &str, fg: [u8; 3]) {
        for (i, ch) in s.chars().enumerate() {
            let px = x + i as u32;
            if px < self.width {
                self.set(px, y, TerminalCell::new(ch).with_fg(fg));
            }
        }
    }

    /// Draw a string centred on a row, truncated to fit
    pub fn draw_centered(&mut self, y: u32, s: &str, fg: [u8; 3]) {
        let len = s.chars().count() as u32;
        if len > self.width {
            let truncated: String = s.chars().take(self.width as usize).collect();
            self.draw_str(0, y, &truncated, fg);
        } else {
            self.draw_str((self.width - len) / 2, y, s, fg);
        }
    }

    /// Draw a box/rectangle outline
    ///
    /// Boxes smaller than 2x2 are not drawn.
    pub fn draw_box(&mut self, x: u32, y: u32, w: u32, h: u32, fg: [u8; 3]) {
        if w < 2 || h < 2 {
            return;
        }

        // Corners
        self.set(x, y, TerminalCell::new('┌').with_fg(fg));
        self.set(x + w - 1, y, TerminalCell::new('┐').with_fg(fg));
        self.set(x, y + h - 1, TerminalCell::new('└').with_fg(fg));
        self.set(x + w - 1, y + h - 1, TerminalCell::new('┘').with_fg(fg));

        // Horizontal lines
        for i in 1..w - 1 {
            self.set(x + i, y, TerminalCell::new('─').with_fg(fg));
            self.set(x + i, y + h - 1, TerminalCell::new('─').with_fg(fg));
        }

        // Vertical lines
        for i in 1..h - 1 {
            self.set(x, y + i, TerminalCell::new('│').with_fg(fg));
            self.set(x + w - 1, y + i, TerminalCell::new('│').with_fg(fg));
        }
    }

    /// Get iterator over all cells with positions
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &TerminalCell)> {
        self.cells.iter().enumerate().map(move |(i, cell)| {
            let x = i as u32 % self.width;
            let y = i as u32 / self.width;
            (x, y, cell)
        })
    }

    /// Row `y` as plain text
    pub fn row_text(&self, y: u32) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y).map(|c| c.char))
            .collect()
    }

    /// Plain text without colour codes, trailing spaces trimmed per line
    pub fn to_plain(&self) -> String {
        let mut output = String::new();
        for y in 0..self.height {
            output.push_str(self.row_text(y).trim_end());
            output.push('\n');
        }
        output
    }
}

/// A single terminal cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerminalCell {
    /// The character to display
    pub char: char,
    /// Foreground color (RGB)
    pub fg: [u8; 3],
    /// Background color (RGB, None for transparent)
    pub bg: Option<[u8; 3]>,
    /// Bold text
    pub bold: bool,
}

impl Default for TerminalCell {
    fn default() -> Self {
        Self {
            char: ' ',
            fg: [200, 200, 200],
            bg: None,
            bold: false,
        }
    }
}

impl TerminalCell {
    /// Create a new cell with a character
    pub fn new(char: char) -> Self {
        Self {
            char,
            ..Default::default()
        }
    }

    pub fn with_fg(mut self, fg: [u8; 3]) -> Self {
        self.fg = fg;
        self
    }

    pub fn with_bg(mut self, bg: [u8; 3]) -> Self {
        self.bg = Some(bg);
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Check if cell is empty (space with no background)
    pub fn is_empty(&self) -> bool {
        self.char == ' ' && self.bg.is_none()
    }
}

/// Image frame - RGBA8 pixel buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFrame {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Raw pixel data, 4 bytes per pixel, row-major
    pub data: Vec<u8>,
}

impl ImageFrame {
    /// Create a transparent RGBA8 frame
    pub fn new_rgba8(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width * height * 4) as usize],
        }
    }

    /// Get pixel at position
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) as usize) * 4;
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    /// Set pixel at position; out-of-bounds writes are ignored
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = ((y * self.width + x) as usize) * 4;
        self.data[idx..idx + 4].copy_from_slice(&rgba);
    }

    /// Fill entire image with a color
    pub fn fill(&mut self, rgba: [u8; 4]) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Number of pixels with non-zero alpha
    pub fn opaque_pixels(&self) -> usize {
        self.data.chunks_exact(4).filter(|px| px[3] > 0).count()
    }
}
