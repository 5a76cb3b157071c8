//! Cat kinds and rarity tiers

use crate::error::CatDaoError;
use crate::seed::{Seed, sine_fraction};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Thematic cat family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CatKind {
    /// Qubit-themed cats with auras and wave functions
    Quantum,
    /// Orange, coin-adorned cats
    Bitcoin,
    /// Hooded privacy cats
    Cypherpunk,
    /// Boxed cats that are both present and absent until observed
    Schrodinger,
    /// Plain house cats
    #[default]
    Generic,
}

impl CatKind {
    /// All kinds in display order
    pub const ALL: [CatKind; 5] = [
        CatKind::Quantum,
        CatKind::Bitcoin,
        CatKind::Cypherpunk,
        CatKind::Schrodinger,
        CatKind::Generic,
    ];

    /// Lowercase label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Quantum => "quantum",
            Self::Bitcoin => "bitcoin",
            Self::Cypherpunk => "cypherpunk",
            Self::Schrodinger => "schrodinger",
            Self::Generic => "generic",
        }
    }

    /// Human-readable collection name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Quantum => "Quantum Cat",
            Self::Bitcoin => "Bitcoin Cat",
            Self::Cypherpunk => "Cypherpunk Cat",
            Self::Schrodinger => "Schrödinger's Cat",
            Self::Generic => "CatDAO Cat",
        }
    }

    /// Whether observation changes how this kind is drawn
    pub fn is_quantum(&self) -> bool {
        matches!(self, Self::Quantum | Self::Schrodinger)
    }

    /// Accent colour used for backgrounds and captions
    pub fn accent(&self) -> [u8; 3] {
        match self {
            Self::Quantum => [0x7B, 0x61, 0xFF],
            Self::Bitcoin => [0xF7, 0x93, 0x1A],
            Self::Cypherpunk => [0x00, 0xFF, 0x9C],
            Self::Schrodinger => [0x4A, 0x90, 0xE2],
            Self::Generic => [0xC0, 0xA0, 0x80],
        }
    }

    /// Parse a label, falling back to `Generic` for anything unrecognised
    pub fn from_label_lossy(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }
}

impl FromStr for CatKind {
    type Err = CatDaoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quantum" => Ok(Self::Quantum),
            "bitcoin" | "btc" => Ok(Self::Bitcoin),
            "cypherpunk" => Ok(Self::Cypherpunk),
            "schrodinger" | "schrödinger" => Ok(Self::Schrodinger),
            "generic" | "cat" => Ok(Self::Generic),
            _ => Err(CatDaoError::UnknownKind(s.to_string())),
        }
    }
}

impl fmt::Display for CatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rarity tier
///
/// Ordered from most to least common.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// All tiers, most common first
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    /// Parse a free-form rarity label
    ///
    /// Labels are case-insensitive; anything unrecognised is treated as
    /// `Common`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "common" | "" => Self::Common,
            "uncommon" => Self::Uncommon,
            "rare" => Self::Rare,
            "epic" => Self::Epic,
            "legendary" => Self::Legendary,
            other => {
                warn!(label = other, "Unrecognised rarity label, using common");
                Self::Common
            }
        }
    }

    /// Lowercase label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }

    /// Probability that a cat of this tier is flagged special
    pub fn special_chance(&self) -> f64 {
        match self {
            Self::Common => 0.02,
            Self::Uncommon => 0.08,
            Self::Rare => 0.2,
            Self::Epic => 0.45,
            Self::Legendary => 1.0,
        }
    }

    /// Maximum number of accessories a cat of this tier may wear
    pub fn max_accessories(&self) -> usize {
        match self {
            Self::Common => 1,
            Self::Uncommon => 1,
            Self::Rare => 2,
            Self::Epic => 3,
            Self::Legendary => 4,
        }
    }

    /// Irrational stride for [`Rarity::from_seed`]
    const ROLL_SALT: f64 = 1.618_033_988_749_895;

    /// Minting weight (out of 1000)
    pub fn weight(&self) -> u32 {
        match self {
            Self::Common => 600,
            Self::Uncommon => 250,
            Self::Rare => 100,
            Self::Epic => 40,
            Self::Legendary => 10,
        }
    }

    /// Deterministic weighted roll for a seed
    ///
    /// Samples the sine curve off the integer lattice that trait draws use,
    /// so the tier does not follow any trait.
    pub fn from_seed(seed: Seed) -> Self {
        let roll = (sine_fraction(seed.value() as f64 * Self::ROLL_SALT) * 1000.0) as u32;

        let mut cumulative = 0;
        for tier in Self::ALL {
            cumulative += tier.weight();
            if roll < cumulative {
                return tier;
            }
        }
        Self::Common
    }

    /// Caption colour
    pub fn color(&self) -> [u8; 3] {
        match self {
            Self::Common => [0xB0, 0xB0, 0xB0],
            Self::Uncommon => [0x4C, 0xAF, 0x50],
            Self::Rare => [0x21, 0x96, 0xF3],
            Self::Epic => [0x9C, 0x27, 0xB0],
            Self::Legendary => [0xFF, 0xC1, 0x07],
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&str> for Rarity {
    fn from(label: &str) -> Self {
        Self::from_label(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!("Quantum".parse::<CatKind>().unwrap(), CatKind::Quantum);
        assert_eq!(" btc ".parse::<CatKind>().unwrap(), CatKind::Bitcoin);
        assert_eq!("schrödinger".parse::<CatKind>().unwrap(), CatKind::Schrodinger);
        assert!(matches!(
            "dog".parse::<CatKind>(),
            Err(CatDaoError::UnknownKind(_))
        ));
        assert_eq!(CatKind::from_label_lossy("dog"), CatKind::Generic);
    }

    #[test]
    fn test_kind_label_roundtrip() {
        for kind in CatKind::ALL {
            assert_eq!(kind.label().parse::<CatKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_rarity_labels() {
        assert_eq!(Rarity::from_label("LEGENDARY"), Rarity::Legendary);
        assert_eq!(Rarity::from_label("mythic"), Rarity::Common);
        assert_eq!(Rarity::from_label("shiny"), Rarity::Common);
        assert_eq!(Rarity::from_label(""), Rarity::Common);
    }

    #[test]
    fn test_rarity_ordering() {
        assert!(Rarity::Common < Rarity::Legendary);
        for pair in Rarity::ALL.windows(2) {
            assert!(pair[0].special_chance() <= pair[1].special_chance());
            assert!(pair[0].max_accessories() <= pair[1].max_accessories());
        }
    }

    #[test]
    fn test_rarity_weights_sum() {
        let total: u32 = Rarity::ALL.iter().map(|r| r.weight()).sum();
        assert_eq!(total, 1000);
    }

    #[test]
    fn test_rarity_from_seed_deterministic() {
        for raw in 1..200 {
            let seed = Seed::new(raw);
            assert_eq!(Rarity::from_seed(seed), Rarity::from_seed(seed));
        }
    }

    #[test]
    fn test_rarity_from_seed_ignores_first_draw() {
        // The first trait draw for a seed is `sine_fraction(seed)`
        let legendary: Vec<f64> = (1..20_000)
            .filter(|&raw| Rarity::from_seed(Seed::new(raw)) == Rarity::Legendary)
            .map(|raw| sine_fraction(raw as f64))
            .collect();

        assert!(legendary.len() > 50);
        assert!(legendary.iter().any(|&d| d < 0.5));
        assert!(legendary.iter().any(|&d| d >= 0.5));
    }

    #[test]
    fn test_quantum_kinds() {
        assert!(CatKind::Quantum.is_quantum());
        assert!(CatKind::Schrodinger.is_quantum());
        assert!(!CatKind::Bitcoin.is_quantum());
    }
}
