//! Visual trait vocabulary
//!
//! Each trait category is a closed enum. A [`TraitCatalog`] lists the values
//! a given [`CatKind`] may draw from: the shared base list followed by the
//! kind's own additions.

use crate::kind::{CatKind, Rarity};
use crate::seed::Seed;
use serde::{Deserialize, Serialize};

/// Eye shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EyeStyle {
    Round,
    Almond,
    Sleepy,
    Wide,
    Slit,
    /// Bitcoin only
    Laser,
    /// Cypherpunk only
    Visor,
    /// Quantum only
    Glowing,
    /// Schrödinger only
    Hollow,
}

impl EyeStyle {
    pub const BASE: [EyeStyle; 5] = [
        EyeStyle::Round,
        EyeStyle::Almond,
        EyeStyle::Sleepy,
        EyeStyle::Wide,
        EyeStyle::Slit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Round => "round",
            Self::Almond => "almond",
            Self::Sleepy => "sleepy",
            Self::Wide => "wide",
            Self::Slit => "slit",
            Self::Laser => "laser",
            Self::Visor => "visor",
            Self::Glowing => "glowing",
            Self::Hollow => "hollow",
        }
    }
}

/// Iris colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EyeColor {
    Green,
    Amber,
    Blue,
    Copper,
    Hazel,
    Violet,
    Orange,
    Neon,
}

impl EyeColor {
    pub const BASE: [EyeColor; 5] = [
        EyeColor::Green,
        EyeColor::Amber,
        EyeColor::Blue,
        EyeColor::Copper,
        EyeColor::Hazel,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Amber => "amber",
            Self::Blue => "blue",
            Self::Copper => "copper",
            Self::Hazel => "hazel",
            Self::Violet => "violet",
            Self::Orange => "orange",
            Self::Neon => "neon",
        }
    }

    pub fn rgb(&self) -> [u8; 3] {
        match self {
            Self::Green => [0x4C, 0xC0, 0x4C],
            Self::Amber => [0xFF, 0xBF, 0x00],
            Self::Blue => [0x40, 0x90, 0xFF],
            Self::Copper => [0xB8, 0x73, 0x33],
            Self::Hazel => [0x8E, 0x76, 0x18],
            Self::Violet => [0xA0, 0x60, 0xFF],
            Self::Orange => [0xFF, 0x80, 0x00],
            Self::Neon => [0x39, 0xFF, 0x14],
        }
    }
}

/// Facial expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    Happy,
    Curious,
    Grumpy,
    Smug,
    Sleepy,
    Surprised,
    Mischievous,
}

impl Expression {
    pub const ALL: [Expression; 7] = [
        Expression::Happy,
        Expression::Curious,
        Expression::Grumpy,
        Expression::Smug,
        Expression::Sleepy,
        Expression::Surprised,
        Expression::Mischievous,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Curious => "curious",
            Self::Grumpy => "grumpy",
            Self::Smug => "smug",
            Self::Sleepy => "sleepy",
            Self::Surprised => "surprised",
            Self::Mischievous => "mischievous",
        }
    }
}

/// Coat pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    Solid,
    Tabby,
    Tuxedo,
    Calico,
    Spotted,
    Striped,
    Tortoiseshell,
    /// Cypherpunk only
    Circuit,
    /// Quantum only
    Waveform,
    /// Bitcoin only
    Blockchain,
    /// Schrödinger only
    Ghost,
}

impl Pattern {
    pub const BASE: [Pattern; 7] = [
        Pattern::Solid,
        Pattern::Tabby,
        Pattern::Tuxedo,
        Pattern::Calico,
        Pattern::Spotted,
        Pattern::Striped,
        Pattern::Tortoiseshell,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Tabby => "tabby",
            Self::Tuxedo => "tuxedo",
            Self::Calico => "calico",
            Self::Spotted => "spotted",
            Self::Striped => "striped",
            Self::Tortoiseshell => "tortoiseshell",
            Self::Circuit => "circuit",
            Self::Waveform => "waveform",
            Self::Blockchain => "blockchain",
            Self::Ghost => "ghost",
        }
    }
}

/// Coat base colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FurColor {
    Black,
    White,
    Ginger,
    Gray,
    Cream,
    Brown,
    Silver,
    Gold,
    Nebula,
    Midnight,
}

impl FurColor {
    pub const BASE: [FurColor; 7] = [
        FurColor::Black,
        FurColor::White,
        FurColor::Ginger,
        FurColor::Gray,
        FurColor::Cream,
        FurColor::Brown,
        FurColor::Silver,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::White => "white",
            Self::Ginger => "ginger",
            Self::Gray => "gray",
            Self::Cream => "cream",
            Self::Brown => "brown",
            Self::Silver => "silver",
            Self::Gold => "gold",
            Self::Nebula => "nebula",
            Self::Midnight => "midnight",
        }
    }

    pub fn rgb(&self) -> [u8; 3] {
        match self {
            Self::Black => [0x2B, 0x2B, 0x2B],
            Self::White => [0xF5, 0xF5, 0xF0],
            Self::Ginger => [0xE0, 0x8A, 0x3C],
            Self::Gray => [0x8C, 0x8C, 0x94],
            Self::Cream => [0xF0, 0xDC, 0xB4],
            Self::Brown => [0x8B, 0x5A, 0x2B],
            Self::Silver => [0xC0, 0xC6, 0xCC],
            Self::Gold => [0xE6, 0xB8, 0x22],
            Self::Nebula => [0x6A, 0x4C, 0xC8],
            Self::Midnight => [0x1C, 0x24, 0x48],
        }
    }

    /// Secondary colour for pattern marks
    pub fn marking(&self) -> [u8; 3] {
        let [r, g, b] = self.rgb();
        let luma = (r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000;
        if luma > 128 {
            [r / 2, g / 2, b / 2]
        } else {
            [
                r.saturating_add(0x50),
                g.saturating_add(0x50),
                b.saturating_add(0x50),
            ]
        }
    }
}

/// Coat length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FurLength {
    Short,
    Medium,
    Long,
    Fluffy,
}

impl FurLength {
    pub const ALL: [FurLength; 4] = [
        FurLength::Short,
        FurLength::Medium,
        FurLength::Long,
        FurLength::Fluffy,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
            Self::Fluffy => "fluffy",
        }
    }

    /// Outline roughness, 0 for smooth
    pub fn tufts(&self) -> u32 {
        match self {
            Self::Short => 0,
            Self::Medium => 1,
            Self::Long => 2,
            Self::Fluffy => 3,
        }
    }
}

/// Ear shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EarShape {
    Pointed,
    Rounded,
    Folded,
    Tufted,
}

impl EarShape {
    pub const ALL: [EarShape; 4] = [
        EarShape::Pointed,
        EarShape::Rounded,
        EarShape::Folded,
        EarShape::Tufted,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pointed => "pointed",
            Self::Rounded => "rounded",
            Self::Folded => "folded",
            Self::Tufted => "tufted",
        }
    }
}

/// Tail shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TailType {
    Straight,
    Curled,
    Fluffy,
    Bobbed,
    Zigzag,
    /// Quantum only: two tails in superposition
    Forked,
}

impl TailType {
    pub const BASE: [TailType; 5] = [
        TailType::Straight,
        TailType::Curled,
        TailType::Fluffy,
        TailType::Bobbed,
        TailType::Zigzag,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Straight => "straight",
            Self::Curled => "curled",
            Self::Fluffy => "fluffy",
            Self::Bobbed => "bobbed",
            Self::Zigzag => "zigzag",
            Self::Forked => "forked",
        }
    }
}

/// Worn items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessory {
    Collar,
    Bell,
    Bowtie,
    TopHat,
    Crown,
    CoinPendant,
    GoldChain,
    Shades,
    Hoodie,
    Headphones,
    Halo,
    QubitEarring,
    Vial,
    GeigerCounter,
}

impl Accessory {
    pub const BASE: [Accessory; 5] = [
        Accessory::Collar,
        Accessory::Bell,
        Accessory::Bowtie,
        Accessory::TopHat,
        Accessory::Crown,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Collar => "collar",
            Self::Bell => "bell",
            Self::Bowtie => "bowtie",
            Self::TopHat => "top_hat",
            Self::Crown => "crown",
            Self::CoinPendant => "coin_pendant",
            Self::GoldChain => "gold_chain",
            Self::Shades => "shades",
            Self::Hoodie => "hoodie",
            Self::Headphones => "headphones",
            Self::Halo => "halo",
            Self::QubitEarring => "qubit_earring",
            Self::Vial => "vial",
            Self::GeigerCounter => "geiger_counter",
        }
    }

    /// Whether the item sits on the head (drawn in profile images)
    pub fn is_headwear(&self) -> bool {
        matches!(
            self,
            Self::TopHat
                | Self::Crown
                | Self::Shades
                | Self::Headphones
                | Self::Halo
                | Self::QubitEarring
                | Self::Hoodie
        )
    }
}

/// Cosmetic quantum-state label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantumState {
    Superposition,
    Entangled,
    Coherent,
    Tunneling,
    Decoherent,
    Classical,
    /// Wave function collapsed by observation
    Observed,
}

impl QuantumState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Superposition => "superposition",
            Self::Entangled => "entangled",
            Self::Coherent => "coherent",
            Self::Tunneling => "tunneling",
            Self::Decoherent => "decoherent",
            Self::Classical => "classical",
            Self::Observed => "observed",
        }
    }

    /// Whether the cat is still "unobserved"
    pub fn is_unobserved(&self) -> bool {
        matches!(
            self,
            Self::Superposition | Self::Entangled | Self::Coherent | Self::Tunneling
        )
    }
}

/// Values available to one kind, per category
#[derive(Debug, Clone)]
pub struct TraitCatalog {
    pub eye_styles: Vec<EyeStyle>,
    pub eye_colors: Vec<EyeColor>,
    pub expressions: Vec<Expression>,
    pub patterns: Vec<Pattern>,
    pub fur_colors: Vec<FurColor>,
    pub fur_lengths: Vec<FurLength>,
    pub ear_shapes: Vec<EarShape>,
    pub tail_types: Vec<TailType>,
    pub accessories: Vec<Accessory>,
    pub quantum_states: Vec<QuantumState>,
}

impl TraitCatalog {
    /// Build the catalog for a kind
    pub fn for_kind(kind: CatKind) -> Self {
        let mut catalog = Self {
            eye_styles: EyeStyle::BASE.to_vec(),
            eye_colors: EyeColor::BASE.to_vec(),
            expressions: Expression::ALL.to_vec(),
            patterns: Pattern::BASE.to_vec(),
            fur_colors: FurColor::BASE.to_vec(),
            fur_lengths: FurLength::ALL.to_vec(),
            ear_shapes: EarShape::ALL.to_vec(),
            tail_types: TailType::BASE.to_vec(),
            accessories: Accessory::BASE.to_vec(),
            quantum_states: vec![QuantumState::Classical, QuantumState::Decoherent],
        };

        match kind {
            CatKind::Quantum => {
                catalog.eye_styles.push(EyeStyle::Glowing);
                catalog.eye_colors.push(EyeColor::Violet);
                catalog.patterns.push(Pattern::Waveform);
                catalog.fur_colors.push(FurColor::Nebula);
                catalog.tail_types.push(TailType::Forked);
                catalog
                    .accessories
                    .extend([Accessory::Halo, Accessory::QubitEarring]);
                catalog.quantum_states = vec![
                    QuantumState::Superposition,
                    QuantumState::Entangled,
                    QuantumState::Coherent,
                    QuantumState::Tunneling,
                ];
            }
            CatKind::Bitcoin => {
                catalog.eye_styles.push(EyeStyle::Laser);
                catalog.eye_colors.push(EyeColor::Orange);
                catalog.patterns.push(Pattern::Blockchain);
                catalog.fur_colors.push(FurColor::Gold);
                catalog
                    .accessories
                    .extend([Accessory::CoinPendant, Accessory::GoldChain]);
            }
            CatKind::Cypherpunk => {
                catalog.eye_styles.push(EyeStyle::Visor);
                catalog.eye_colors.push(EyeColor::Neon);
                catalog.patterns.push(Pattern::Circuit);
                catalog.fur_colors.push(FurColor::Midnight);
                catalog.accessories.extend([
                    Accessory::Shades,
                    Accessory::Hoodie,
                    Accessory::Headphones,
                ]);
            }
            CatKind::Schrodinger => {
                catalog.eye_styles.push(EyeStyle::Hollow);
                catalog.patterns.push(Pattern::Ghost);
                catalog
                    .accessories
                    .extend([Accessory::Vial, Accessory::GeigerCounter]);
                catalog.quantum_states =
                    vec![QuantumState::Superposition, QuantumState::Entangled];
            }
            CatKind::Generic => {}
        }

        catalog
    }
}

/// The complete trait record for one portrait
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatTraits {
    pub seed: Seed,
    pub kind: CatKind,
    pub rarity: Rarity,
    pub eye_style: EyeStyle,
    pub eye_color: EyeColor,
    pub expression: Expression,
    pub pattern: Pattern,
    pub fur_color: FurColor,
    pub fur_length: FurLength,
    pub ear_shape: EarShape,
    pub tail_type: TailType,
    /// Rare visual flourish (sparkles, golden outline)
    pub special: bool,
    /// Distinct worn items, in draw order
    pub accessories: Vec<Accessory>,
    pub quantum_state: QuantumState,
}

impl CatTraits {
    /// Collection-style display name, e.g. "Quantum Cat #42"
    pub fn title(&self) -> String {
        format!("{} #{}", self.kind.display_name(), self.seed)
    }

    /// Whether the portrait should be drawn in its unobserved form
    pub fn is_unobserved(&self) -> bool {
        self.kind.is_quantum() && self.quantum_state.is_unobserved()
    }

    /// Whether the cat wears the given item
    pub fn has(&self, accessory: Accessory) -> bool {
        self.accessories.contains(&accessory)
    }

    /// Label/value pairs for captions and listings
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        let accessories = if self.accessories.is_empty() {
            "none".to_string()
        } else {
            self.accessories
                .iter()
                .map(|a| a.label())
                .collect::<Vec<_>>()
                .join(", ")
        };

        vec![
            ("rarity", self.rarity.label().to_string()),
            ("eyes", format!("{} {}", self.eye_color.label(), self.eye_style.label())),
            ("expression", self.expression.label().to_string()),
            (
                "coat",
                format!(
                    "{} {} {}",
                    self.fur_length.label(),
                    self.fur_color.label(),
                    self.pattern.label()
                ),
            ),
            ("ears", self.ear_shape.label().to_string()),
            ("tail", self.tail_type.label().to_string()),
            ("accessories", accessories),
            ("state", self.quantum_state.label().to_string()),
            ("special", if self.special { "yes" } else { "no" }.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_extends_base() {
        let generic = TraitCatalog::for_kind(CatKind::Generic);
        let quantum = TraitCatalog::for_kind(CatKind::Quantum);

        assert_eq!(generic.eye_styles.len(), EyeStyle::BASE.len());
        assert!(quantum.eye_styles.contains(&EyeStyle::Glowing));
        assert!(!generic.eye_styles.contains(&EyeStyle::Glowing));
        assert!(quantum.tail_types.contains(&TailType::Forked));
    }

    #[test]
    fn test_catalogs_non_empty() {
        for kind in CatKind::ALL {
            let c = TraitCatalog::for_kind(kind);
            assert!(!c.eye_styles.is_empty());
            assert!(!c.eye_colors.is_empty());
            assert!(!c.expressions.is_empty());
            assert!(!c.patterns.is_empty());
            assert!(!c.fur_colors.is_empty());
            assert!(!c.fur_lengths.is_empty());
            assert!(!c.ear_shapes.is_empty());
            assert!(!c.tail_types.is_empty());
            assert!(!c.accessories.is_empty());
            assert!(!c.quantum_states.is_empty());
        }
    }

    #[test]
    fn test_classical_kinds_never_unobserved() {
        for kind in [CatKind::Bitcoin, CatKind::Cypherpunk, CatKind::Generic] {
            let c = TraitCatalog::for_kind(kind);
            assert!(c.quantum_states.iter().all(|s| !s.is_unobserved()));
        }
    }

    #[test]
    fn test_marking_contrasts() {
        assert_ne!(FurColor::White.marking(), FurColor::White.rgb());
        assert_ne!(FurColor::Black.marking(), FurColor::Black.rgb());
    }
}
