//! Color mapping for terminal output
//!
//! Portraits are rendered in 24-bit colour; this module reduces them to what
//! the terminal can show.

use catdao_core::{ColorDepth, TerminalFrame};

/// Color mapper for terminal output
#[derive(Debug, Clone, Copy)]
pub struct ColorMapper {
    /// Color depth to use
    depth: ColorDepth,
}

impl ColorMapper {
    /// Create a new color mapper
    pub fn new(depth: ColorDepth) -> Self {
        Self { depth }
    }

    /// Map RGB color to terminal color based on depth
    pub fn map_color(&self, rgb: [u8; 3]) -> MappedColor {
        match self.depth {
            ColorDepth::Monochrome => to_monochrome(rgb),
            ColorDepth::Basic => to_basic_16(rgb),
            ColorDepth::Extended => to_256(rgb),
            ColorDepth::TrueColor => MappedColor::TrueColor(rgb),
        }
    }

    /// Get ANSI escape sequence for foreground color
    pub fn fg_escape(&self, rgb: [u8; 3]) -> String {
        match self.map_color(rgb) {
            MappedColor::Basic(idx) => {
                if idx < 8 {
                    format!("\x1b[{}m", 30 + idx)
                } else {
                    format!("\x1b[{}m", 82 + idx) // 90-97 for bright colors
                }
            }
            MappedColor::Extended(idx) => format!("\x1b[38;5;{}m", idx),
            MappedColor::TrueColor([r, g, b]) => format!("\x1b[38;2;{};{};{}m", r, g, b),
        }
    }

    /// Get ANSI escape sequence for background color
    pub fn bg_escape(&self, rgb: [u8; 3]) -> String {
        match self.map_color(rgb) {
            MappedColor::Basic(idx) => {
                if idx < 8 {
                    format!("\x1b[{}m", 40 + idx)
                } else {
                    format!("\x1b[{}m", 92 + idx) // 100-107 for bright colors
                }
            }
            MappedColor::Extended(idx) => format!("\x1b[48;5;{}m", idx),
            MappedColor::TrueColor([r, g, b]) => format!("\x1b[48;2;{};{};{}m", r, g, b),
        }
    }

    /// Encode a whole frame as ANSI text at this depth
    ///
    /// Escapes are only emitted when the mapped colour changes. Trailing
    /// blank cells on each line are dropped.
    pub fn encode(&self, frame: &TerminalFrame) -> String {
        let mut output = String::new();

        for y in 0..frame.height {
            let mut last_fg: Option<MappedColor> = None;
            let mut last_bg: Option<MappedColor> = None;
            let row_end = (0..frame.width)
                .rev()
                .find(|&x| frame.get(x, y).is_some_and(|c| !c.is_empty()))
                .map(|x| x + 1)
                .unwrap_or(0);

            for x in 0..row_end {
                let Some(cell) = frame.get(x, y) else {
                    continue;
                };

                let fg = self.map_color(cell.fg);
                if last_fg != Some(fg) {
                    output.push_str(&self.fg_escape(cell.fg));
                    last_fg = Some(fg);
                }

                let bg = cell.bg.map(|bg| self.map_color(bg));
                if bg != last_bg {
                    match cell.bg {
                        Some(rgb) => output.push_str(&self.bg_escape(rgb)),
                        None => output.push_str("\x1b[49m"),
                    }
                    last_bg = bg;
                }

                if cell.bold {
                    output.push_str("\x1b[1m");
                }
                output.push(cell.char);
                if cell.bold {
                    output.push_str("\x1b[22m");
                }
            }

            output.push_str("\x1b[0m\n");
        }

        output
    }

    /// Get color depth
    pub fn depth(&self) -> ColorDepth {
        self.depth
    }
}

impl Default for ColorMapper {
    fn default() -> Self {
        Self::new(ColorDepth::TrueColor)
    }
}

/// Mapped terminal color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappedColor {
    /// Basic 16-color (0-15)
    Basic(u8),
    /// Extended 256-color (0-255)
    Extended(u8),
    /// True color RGB
    TrueColor([u8; 3]),
}

/// Convert to monochrome (on/off)
fn to_monochrome(rgb: [u8; 3]) -> MappedColor {
    let brightness = (rgb[0] as u16 + rgb[1] as u16 + rgb[2] as u16) / 3;
    if brightness > 127 {
        MappedColor::Basic(15) // White
    } else {
        MappedColor::Basic(8) // Dark gray
    }
}

const BASIC_COLORS: [(u8, [u8; 3]); 16] = [
    (0, [0, 0, 0]),        // Black
    (1, [128, 0, 0]),      // Dark Red
    (2, [0, 128, 0]),      // Dark Green
    (3, [128, 128, 0]),    // Dark Yellow
    (4, [0, 0, 128]),      // Dark Blue
    (5, [128, 0, 128]),    // Dark Magenta
    (6, [0, 128, 128]),    // Dark Cyan
    (7, [192, 192, 192]),  // Light Gray
    (8, [128, 128, 128]),  // Dark Gray
    (9, [255, 0, 0]),      // Red
    (10, [0, 255, 0]),     // Green
    (11, [255, 255, 0]),   // Yellow
    (12, [0, 0, 255]),     // Blue
    (13, [255, 0, 255]),   // Magenta
    (14, [0, 255, 255]),   // Cyan
    (15, [255, 255, 255]), // White
];

/// Convert to 16-color ANSI
fn to_basic_16(rgb: [u8; 3]) -> MappedColor {
    let best = BASIC_COLORS
        .iter()
        .min_by_key(|(_, color)| color_distance(rgb, *color))
        .map(|(idx, _)| *idx)
        .unwrap_or(7);
    MappedColor::Basic(best)
}

/// Convert to 256-color mode: 16 basic + 216 color cube + 24 grayscale
fn to_256(rgb: [u8; 3]) -> MappedColor {
    let gray_diff = (rgb[0] as i32 - rgb[1] as i32).abs()
        + (rgb[1] as i32 - rgb[2] as i32).abs()
        + (rgb[0] as i32 - rgb[2] as i32).abs();

    if gray_diff < 30 {
        // Grayscale ramp (232-255)
        let avg = (rgb[0] as u16 + rgb[1] as u16 + rgb[2] as u16) / 3;
        let gray_idx = ((avg as f32 / 255.0 * 23.0) as u8).min(23);
        return MappedColor::Extended(232 + gray_idx);
    }

    // 6x6x6 color cube (16-231)
    let r = (rgb[0] as f32 / 255.0 * 5.0).round() as u8;
    let g = (rgb[1] as f32 / 255.0 * 5.0).round() as u8;
    let b = (rgb[2] as f32 / 255.0 * 5.0).round() as u8;

    MappedColor::Extended(16 + 36 * r + 6 * g + b)
}

/// Calculate color distance (squared Euclidean)
fn color_distance(a: [u8; 3], b: [u8; 3]) -> u32 {
    let dr = a[0] as i32 - b[0] as i32;
    let dg = a[1] as i32 - b[1] as i32;
    let db = a[2] as i32 - b[2] as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// Fixed colours used around portraits
pub mod colors {
    pub const CAPTION: [u8; 3] = [220, 220, 220];
    pub const NOSE_PINK: [u8; 3] = [0xFF, 0x9E, 0xB5];
    pub const SPARKLE: [u8; 3] = [0xFF, 0xE0, 0x60];
}
