//! Colour styling applied at render time
//!
//! Palettes recolour a finished portrait without touching its traits, so
//! the same cat can be shown warm, neon or monochrome.

use crate::error::CatDaoError;
use crate::kind::CatKind;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Colour palette adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    /// Colours as generated
    #[default]
    Natural,
    HighContrast,
    Warm,
    Cool,
    Neon,
    Muted,
    Monochrome,
    Sepia,
}

impl Palette {
    /// Palette matching a kind's theme
    pub fn for_kind(kind: CatKind) -> Self {
        match kind {
            CatKind::Bitcoin => Self::Warm,
            CatKind::Cypherpunk => Self::Neon,
            CatKind::Schrodinger => Self::Cool,
            CatKind::Quantum | CatKind::Generic => Self::Natural,
        }
    }

    /// Apply palette adjustment to a color
    pub fn adjust_color(&self, rgb: [u8; 3]) -> [u8; 3] {
        match self {
            Self::Natural => rgb,
            Self::HighContrast => rgb.map(|c| {
                let f = c as f32 / 255.0;
                (((f - 0.5) * 1.5 + 0.5).clamp(0.0, 1.0) * 255.0) as u8
            }),
            Self::Warm => [
                rgb[0].saturating_add(20),
                rgb[1].saturating_add(10),
                rgb[2].saturating_sub(10),
            ],
            Self::Cool => [
                rgb[0].saturating_sub(10),
                rgb[1].saturating_add(5),
                rgb[2].saturating_add(20),
            ],
            Self::Neon => {
                // Stretch channels to full range
                let max = rgb[0].max(rgb[1]).max(rgb[2]) as f32;
                let min = rgb[0].min(rgb[1]).min(rgb[2]) as f32;
                if max == min {
                    return rgb;
                }
                rgb.map(|c| ((c as f32 - min) / (max - min) * 255.0).clamp(0.0, 255.0) as u8)
            }
            Self::Muted => {
                let gray = (rgb[0] as u16 + rgb[1] as u16 + rgb[2] as u16) / 3;
                rgb.map(|c| ((c as u16 + gray) / 2) as u8)
            }
            Self::Monochrome => {
                let gray = ((rgb[0] as u32 * 299 + rgb[1] as u32 * 587 + rgb[2] as u32 * 114)
                    / 1000) as u8;
                [gray, gray, gray]
            }
            Self::Sepia => {
                let gray =
                    (rgb[0] as f32 * 0.299 + rgb[1] as f32 * 0.587 + rgb[2] as f32 * 0.114) as u8;
                [
                    (gray as f32 * 1.2).min(255.0) as u8,
                    gray,
                    (gray as f32 * 0.8) as u8,
                ]
            }
        }
    }

    /// Adjust an RGBA colour, preserving alpha
    pub fn adjust_rgba(&self, rgba: [u8; 4]) -> [u8; 4] {
        let [r, g, b] = self.adjust_color([rgba[0], rgba[1], rgba[2]]);
        [r, g, b, rgba[3]]
    }
}

impl FromStr for Palette {
    type Err = CatDaoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "natural" => Ok(Self::Natural),
            "high_contrast" => Ok(Self::HighContrast),
            "warm" => Ok(Self::Warm),
            "cool" => Ok(Self::Cool),
            "neon" => Ok(Self::Neon),
            "muted" => Ok(Self::Muted),
            "monochrome" | "mono" => Ok(Self::Monochrome),
            "sepia" => Ok(Self::Sepia),
            other => Err(CatDaoError::Config(format!("unknown palette '{}'", other))),
        }
    }
}

/// Terminal color depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColorDepth {
    /// 2 colors (black/white)
    Monochrome,
    /// 16 ANSI colors
    Basic,
    /// 256 colors
    Extended,
    /// 24-bit RGB
    #[default]
    TrueColor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_monochrome() {
        let result = Palette::Monochrome.adjust_color([255, 0, 0]);
        assert_eq!(result[0], result[1]);
        assert_eq!(result[1], result[2]);
    }

    #[test]
    fn test_palette_warm() {
        let original = [100, 100, 100];
        let result = Palette::Warm.adjust_color(original);
        assert!(result[0] > original[0]);
        assert!(result[2] < original[2]);
    }

    #[test]
    fn test_neon_gray_unchanged() {
        assert_eq!(Palette::Neon.adjust_color([90, 90, 90]), [90, 90, 90]);
    }

    #[test]
    fn test_adjust_rgba_keeps_alpha() {
        assert_eq!(Palette::Monochrome.adjust_rgba([10, 10, 10, 77])[3], 77);
    }

    #[test]
    fn test_palette_parse() {
        assert_eq!("high-contrast".parse::<Palette>().unwrap(), Palette::HighContrast);
        assert_eq!("Mono".parse::<Palette>().unwrap(), Palette::Monochrome);
        assert!("plaid".parse::<Palette>().is_err());
    }

    #[test]
    fn test_kind_palettes() {
        assert_eq!(Palette::for_kind(CatKind::Cypherpunk), Palette::Neon);
        assert_eq!(Palette::for_kind(CatKind::Generic), Palette::Natural);
    }
}
