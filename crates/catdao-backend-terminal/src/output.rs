//! Terminal output handling
//!
//! Presents portrait frames full-screen using crossterm.

use catdao_core::{TerminalCell, TerminalFrame};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Write};
use thiserror::Error;

use crate::color::{ColorMapper, MappedColor};

/// Terminal output errors
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Frame {0}x{1} does not fit the terminal")]
    TooLarge(u32, u32),
}

/// Full-screen terminal presenter
pub struct TerminalOutput {
    /// Whether we're in alternate screen mode
    alternate_screen: bool,
    /// Whether cursor is hidden
    cursor_hidden: bool,
    /// Last frame for diff rendering
    last_frame: Option<TerminalFrame>,
    /// Enable diff rendering (only update changed cells)
    diff_mode: bool,
    /// Colour depth reduction
    mapper: ColorMapper,
}

impl TerminalOutput {
    /// Create a new terminal output handler
    pub fn new(mapper: ColorMapper) -> Self {
        Self {
            alternate_screen: false,
            cursor_hidden: false,
            last_frame: None,
            diff_mode: true,
            mapper,
        }
    }

    /// Enable or disable diff mode
    pub fn set_diff_mode(&mut self, enabled: bool) {
        self.diff_mode = enabled;
        if !enabled {
            self.last_frame = None;
        }
    }

    /// Enter the alternate screen and hide the cursor
    pub fn init(&mut self) -> Result<(), OutputError> {
        let mut stdout = io::stdout();

        execute!(stdout, EnterAlternateScreen)?;
        self.alternate_screen = true;

        execute!(stdout, Hide)?;
        self.cursor_hidden = true;

        execute!(stdout, Clear(ClearType::All))?;
        Ok(())
    }

    /// Restore the terminal
    pub fn cleanup(&mut self) -> Result<(), OutputError> {
        let mut stdout = io::stdout();

        if self.cursor_hidden {
            execute!(stdout, Show)?;
            self.cursor_hidden = false;
        }

        if self.alternate_screen {
            execute!(stdout, LeaveAlternateScreen)?;
            self.alternate_screen = false;
        }

        self.last_frame = None;
        Ok(())
    }

    /// Draw a frame
    ///
    /// Frames of a different size than the previous one are redrawn in full.
    pub fn render(&mut self, frame: &TerminalFrame) -> Result<(), OutputError> {
        if let Ok((cols, rows)) = terminal::size() {
            if frame.width > cols as u32 || frame.height > rows as u32 {
                return Err(OutputError::TooLarge(frame.width, frame.height));
            }
        }

        let mut stdout = io::stdout();
        self.write_frame(&mut stdout, frame)?;
        stdout.flush()?;

        if self.diff_mode {
            self.last_frame = Some(frame.clone());
        }

        Ok(())
    }

    /// Write frame commands to any writer
    pub fn write_frame<W: Write>(&self, out: &mut W, frame: &TerminalFrame) -> Result<(), OutputError> {
        let previous = self
            .last_frame
            .as_ref()
            .filter(|last| self.diff_mode && last.width == frame.width && last.height == frame.height);

        match previous {
            Some(last) => self.render_diff(out, frame, last)?,
            None => self.render_full(out, frame)?,
        }
        Ok(())
    }

    /// Render entire frame
    fn render_full<W: Write>(&self, out: &mut W, frame: &TerminalFrame) -> io::Result<()> {
        queue!(out, Clear(ClearType::All))?;

        for y in 0..frame.height {
            queue!(out, MoveTo(0, y as u16))?;
            for x in 0..frame.width {
                if let Some(cell) = frame.get(x, y) {
                    self.queue_cell(out, cell)?;
                }
            }
        }

        queue!(out, ResetColor)
    }

    /// Render only changed cells
    fn render_diff<W: Write>(
        &self,
        out: &mut W,
        frame: &TerminalFrame,
        last: &TerminalFrame,
    ) -> io::Result<()> {
        for (x, y, cell) in frame.iter() {
            if last.get(x, y) != Some(cell) {
                queue!(out, MoveTo(x as u16, y as u16))?;
                self.queue_cell(out, cell)?;
            }
        }

        queue!(out, ResetColor)
    }

    fn queue_cell<W: Write>(&self, out: &mut W, cell: &TerminalCell) -> io::Result<()> {
        queue!(out, SetForegroundColor(self.crossterm_color(cell.fg)))?;
        match cell.bg {
            Some(bg) => queue!(out, SetBackgroundColor(self.crossterm_color(bg)))?,
            None => queue!(out, SetBackgroundColor(Color::Reset))?,
        }
        if cell.bold {
            queue!(out, SetAttribute(Attribute::Bold), Print(cell.char), SetAttribute(Attribute::NormalIntensity))
        } else {
            queue!(out, Print(cell.char))
        }
    }

    fn crossterm_color(&self, rgb: [u8; 3]) -> Color {
        match self.mapper.map_color(rgb) {
            MappedColor::Basic(idx) | MappedColor::Extended(idx) => Color::AnsiValue(idx),
            MappedColor::TrueColor([r, g, b]) => Color::Rgb { r, g, b },
        }
    }

    /// Get terminal size
    pub fn size() -> Result<(u32, u32), OutputError> {
        let (cols, rows) = terminal::size()?;
        Ok((cols as u32, rows as u32))
    }

    /// Check if terminal supports true color
    pub fn supports_true_color() -> bool {
        if let Ok(colorterm) = std::env::var("COLORTERM") {
            return colorterm == "truecolor" || colorterm == "24bit";
        }

        if let Ok(term) = std::env::var("TERM") {
            return term.contains("truecolor") || term.contains("direct");
        }

        false
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new(ColorMapper::default())
    }
}

impl Drop for TerminalOutput {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catdao_core::ColorDepth;

    fn frame(ch: char) -> TerminalFrame {
        let mut frame = TerminalFrame::new(4, 2);
        frame.set(1, 1, TerminalCell::new(ch).with_fg([255, 0, 0]));
        frame
    }

    #[test]
    fn test_full_write_contains_cells() {
        let output = TerminalOutput::new(ColorMapper::new(ColorDepth::TrueColor));
        let mut buf = Vec::new();
        output.write_frame(&mut buf, &frame('X')).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains('X'));
        assert!(text.contains("38;2;255;0;0"));
    }

    #[test]
    fn test_diff_writes_only_changes() {
        let mut output = TerminalOutput::new(ColorMapper::new(ColorDepth::Extended));
        output.last_frame = Some(frame('X'));

        let mut buf = Vec::new();
        output.write_frame(&mut buf, &frame('Y')).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains('Y'));
        assert!(!text.contains("\x1b[2J"));
        assert_eq!(text.matches("38;5;").count(), 1);
    }

    #[test]
    fn test_resized_frame_redrawn_in_full() {
        let mut output = TerminalOutput::default();
        output.last_frame = Some(TerminalFrame::new(2, 2));

        let mut buf = Vec::new();
        output.write_frame(&mut buf, &frame('Z')).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("\x1b[2J"));
    }

    #[test]
    fn test_diff_mode() {
        let mut output = TerminalOutput::default();
        assert!(output.diff_mode);

        output.last_frame = Some(frame('X'));
        output.set_diff_mode(false);
        assert!(!output.diff_mode);
        assert!(output.last_frame.is_none());
    }

    #[test]
    fn test_terminal_size() {
        // No terminal in CI; must not panic either way
        let _ = TerminalOutput::size();
    }
}
