//! Deterministic trait generation

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::kind::{CatKind, Rarity};
use crate::seed::{Seed, SineRng};
use crate::traits::{CatTraits, QuantumState, TraitCatalog};

bitflags! {
    /// Presentation flags for a portrait request
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct RenderFlags: u32 {
        /// Head-only avatar framing
        const PROFILE_IMAGE = 0b0000_0001;
        /// The viewer has observed this cat
        const OBSERVED      = 0b0000_0010;
    }
}

impl Serialize for RenderFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RenderFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u32::deserialize(deserializer)?;
        RenderFlags::from_bits(bits)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid RenderFlags bits: {}", bits)))
    }
}

/// Everything that determines one rendered portrait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortraitRequest {
    pub seed: Seed,
    pub kind: CatKind,
    pub rarity: Rarity,
    pub flags: RenderFlags,
    /// Target detail: terminal columns for ASCII, pixels for canvas/SVG/PNG
    pub width: u32,
}

impl PortraitRequest {
    /// Default detail width
    pub const DEFAULT_WIDTH: u32 = 40;

    /// Create a request with default flags and width
    pub fn new(seed: impl Into<Seed>, kind: CatKind, rarity: Rarity) -> Self {
        Self {
            seed: seed.into(),
            kind,
            rarity,
            flags: RenderFlags::empty(),
            width: Self::DEFAULT_WIDTH,
        }
    }

    /// Set the detail width
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Set or clear profile-image framing
    pub fn with_profile(mut self, profile: bool) -> Self {
        self.flags.set(RenderFlags::PROFILE_IMAGE, profile);
        self
    }

    /// Set or clear the observed flag
    pub fn with_observed(mut self, observed: bool) -> Self {
        self.flags.set(RenderFlags::OBSERVED, observed);
        self
    }

    pub fn is_profile(&self) -> bool {
        self.flags.contains(RenderFlags::PROFILE_IMAGE)
    }

    pub fn is_observed(&self) -> bool {
        self.flags.contains(RenderFlags::OBSERVED)
    }
}

/// Maps seeds to trait records
///
/// Stateless; every call builds a fresh [`SineRng`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TraitGenerator;

impl TraitGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate traits for a seed, kind and rarity
    ///
    /// Draw order is fixed: eye style, eye colour, expression, pattern, fur
    /// colour, fur length, ears, tail, special roll, accessory count,
    /// accessories, quantum state.
    pub fn generate(&self, seed: Seed, kind: CatKind, rarity: Rarity) -> CatTraits {
        let catalog = TraitCatalog::for_kind(kind);
        let mut rng = SineRng::new(seed);

        // Catalog lists are never empty
        let eye_style = pick_or_first(&mut rng, &catalog.eye_styles);
        let eye_color = pick_or_first(&mut rng, &catalog.eye_colors);
        let expression = pick_or_first(&mut rng, &catalog.expressions);
        let pattern = pick_or_first(&mut rng, &catalog.patterns);
        let fur_color = pick_or_first(&mut rng, &catalog.fur_colors);
        let fur_length = pick_or_first(&mut rng, &catalog.fur_lengths);
        let ear_shape = pick_or_first(&mut rng, &catalog.ear_shapes);
        let tail_type = pick_or_first(&mut rng, &catalog.tail_types);

        let special = rng.chance(rarity.special_chance());

        let count = rng.range(0, rarity.max_accessories() as i64) as usize;
        let mut accessories = Vec::with_capacity(count);
        for _ in 0..count {
            if let Some(&item) = rng.pick(&catalog.accessories) {
                if !accessories.contains(&item) {
                    accessories.push(item);
                }
            }
        }

        let quantum_state = rng
            .pick(&catalog.quantum_states)
            .copied()
            .unwrap_or(QuantumState::Classical);

        debug!(
            seed = seed.value(),
            kind = kind.label(),
            rarity = rarity.label(),
            draws = rng.draws(),
            "Generated traits"
        );

        CatTraits {
            seed,
            kind,
            rarity,
            eye_style,
            eye_color,
            expression,
            pattern,
            fur_color,
            fur_length,
            ear_shape,
            tail_type,
            special,
            accessories,
            quantum_state,
        }
    }

    /// Generate traits for a full request
    ///
    /// An observed quantum or Schrödinger cat has its state collapsed to
    /// `Observed`; all other traits are unaffected by flags and width.
    pub fn generate_for(&self, request: &PortraitRequest) -> CatTraits {
        let mut traits = self.generate(request.seed, request.kind, request.rarity);
        if request.is_observed() && request.kind.is_quantum() {
            traits.quantum_state = QuantumState::Observed;
        }
        traits
    }
}

fn pick_or_first<T: Copy>(rng: &mut SineRng, items: &[T]) -> T {
    match rng.pick(items) {
        Some(item) => *item,
        None => items[0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{Accessory, TraitCatalog};

    #[test]
    fn test_determinism() {
        let generator = TraitGenerator::new();
        for kind in CatKind::ALL {
            for rarity in Rarity::ALL {
                for raw in [1, 7, 42, 1337, 999_999, i64::MAX] {
                    let a = generator.generate(Seed::new(raw), kind, rarity);
                    let b = generator.generate(Seed::new(raw), kind, rarity);
                    assert_eq!(a, b);
                }
            }
        }
    }

    #[test]
    fn test_traits_within_catalog() {
        let generator = TraitGenerator::new();
        for kind in CatKind::ALL {
            let catalog = TraitCatalog::for_kind(kind);
            for raw in 1..300 {
                let t = generator.generate(Seed::new(raw), kind, Rarity::Epic);
                assert!(catalog.eye_styles.contains(&t.eye_style));
                assert!(catalog.eye_colors.contains(&t.eye_color));
                assert!(catalog.expressions.contains(&t.expression));
                assert!(catalog.patterns.contains(&t.pattern));
                assert!(catalog.fur_colors.contains(&t.fur_color));
                assert!(catalog.fur_lengths.contains(&t.fur_length));
                assert!(catalog.ear_shapes.contains(&t.ear_shape));
                assert!(catalog.tail_types.contains(&t.tail_type));
                assert!(catalog.quantum_states.contains(&t.quantum_state));
                assert!(t.accessories.iter().all(|a| catalog.accessories.contains(a)));
            }
        }
    }

    #[test]
    fn test_non_positive_seeds_coerced() {
        let generator = TraitGenerator::new();
        let fallback = generator.generate(Seed::new(Seed::FALLBACK), CatKind::Quantum, Rarity::Rare);
        for raw in [0, -1, -1337, i64::MIN] {
            let t = generator.generate(Seed::new(raw), CatKind::Quantum, Rarity::Rare);
            assert_eq!(t, fallback);
            assert_eq!(t.seed.value(), Seed::FALLBACK);
        }
    }

    #[test]
    fn test_accessories_distinct_and_bounded() {
        let generator = TraitGenerator::new();
        for rarity in Rarity::ALL {
            for raw in 1..500 {
                let t = generator.generate(Seed::new(raw), CatKind::Cypherpunk, rarity);
                assert!(t.accessories.len() <= rarity.max_accessories());

                let mut sorted: Vec<Accessory> = t.accessories.clone();
                sorted.sort();
                sorted.dedup();
                assert_eq!(sorted.len(), t.accessories.len());
            }
        }
    }

    #[test]
    fn test_legendary_always_special() {
        let generator = TraitGenerator::new();
        for raw in 1..100 {
            assert!(generator.generate(Seed::new(raw), CatKind::Generic, Rarity::Legendary).special);
        }
    }

    #[test]
    fn test_observed_collapses_quantum_state() {
        let generator = TraitGenerator::new();
        let request = PortraitRequest::new(77, CatKind::Schrodinger, Rarity::Common);

        let unobserved = generator.generate_for(&request);
        assert!(unobserved.is_unobserved());

        let observed = generator.generate_for(&request.with_observed(true));
        assert_eq!(observed.quantum_state, QuantumState::Observed);
        assert!(!observed.is_unobserved());
        assert_eq!(observed.eye_style, unobserved.eye_style);
    }

    #[test]
    fn test_observed_ignored_for_classical_kinds() {
        let generator = TraitGenerator::new();
        let request = PortraitRequest::new(77, CatKind::Bitcoin, Rarity::Common);
        assert_eq!(
            generator.generate_for(&request),
            generator.generate_for(&request.with_observed(true))
        );
    }

    #[test]
    fn test_profile_does_not_change_traits() {
        let generator = TraitGenerator::new();
        let request = PortraitRequest::new(314, CatKind::Quantum, Rarity::Rare);
        assert_eq!(
            generator.generate_for(&request),
            generator.generate_for(&request.with_profile(true).with_width(120))
        );
    }

    #[test]
    fn test_request_flags_serde() {
        let request = PortraitRequest::new(5, CatKind::Generic, Rarity::Common)
            .with_profile(true)
            .with_observed(true);
        let json = serde_json::to_string(&request).unwrap();
        let decoded: PortraitRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, request);
    }
}
