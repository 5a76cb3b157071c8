//! Engine configuration
//!
//! Loaded from a JSON file; every field has a default so partial files are
//! accepted.

use crate::error::{CatDaoError, Result};
use crate::kind::{CatKind, Rarity};
use crate::output::OutputFormat;
use crate::style::{ColorDepth, Palette};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatDaoConfig {
    /// Kind used when none is given
    pub default_kind: CatKind,
    /// Rarity label used when none is given
    pub default_rarity: String,
    /// Format used when none is given
    pub default_format: OutputFormat,
    /// Columns for ASCII portraits
    pub ascii_width: u32,
    /// Pixel size for canvas, SVG and PNG portraits
    pub canvas_size: u32,
    /// Palette override; `None` uses the kind's own palette
    pub palette: Option<Palette>,
    /// Terminal colour depth
    pub color_depth: ColorDepth,
    /// Rendered portraits kept in memory
    pub cache_capacity: usize,
    /// Observation ledger location
    pub ledger_path: PathBuf,
}

impl Default for CatDaoConfig {
    fn default() -> Self {
        Self {
            default_kind: CatKind::Quantum,
            default_rarity: Rarity::Common.label().to_string(),
            default_format: OutputFormat::Ascii,
            ascii_width: 40,
            canvas_size: 256,
            palette: None,
            color_depth: ColorDepth::TrueColor,
            cache_capacity: 64,
            ledger_path: PathBuf::from("catdao-observations.json"),
        }
    }
}

impl CatDaoConfig {
    /// Smallest accepted ASCII width
    pub const MIN_ASCII_WIDTH: u32 = 24;
    /// Smallest accepted canvas size
    pub const MIN_CANVAS_SIZE: u32 = 32;

    /// Load from a JSON file
    ///
    /// A missing file is not an error: a warning is logged and defaults are
    /// returned. Unreadable or malformed files are errors.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;

        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Write to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.ascii_width < Self::MIN_ASCII_WIDTH {
            return Err(CatDaoError::Config(format!(
                "ascii_width must be at least {}, got {}",
                Self::MIN_ASCII_WIDTH,
                self.ascii_width
            )));
        }
        if self.canvas_size < Self::MIN_CANVAS_SIZE {
            return Err(CatDaoError::Config(format!(
                "canvas_size must be at least {}, got {}",
                Self::MIN_CANVAS_SIZE,
                self.canvas_size
            )));
        }
        Ok(())
    }

    /// Default rarity as a tier
    pub fn rarity(&self) -> Rarity {
        Rarity::from_label(&self.default_rarity)
    }

    /// Palette to use for a kind
    pub fn palette_for(&self, kind: CatKind) -> Palette {
        self.palette.unwrap_or_else(|| Palette::for_kind(kind))
    }

    /// Detail width appropriate for a format
    pub fn width_for(&self, format: OutputFormat) -> u32 {
        match format {
            OutputFormat::Ascii => self.ascii_width,
            OutputFormat::Canvas | OutputFormat::Svg | OutputFormat::Png => self.canvas_size,
        }
    }
}
