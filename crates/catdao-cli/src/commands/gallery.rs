//! Gallery command

use catdao_core::{CatKind, CatTraits, Rarity, Seed, TraitGenerator};
use rayon::prelude::*;
use tracing::info;

pub fn run(start: i64, count: usize, kind: Option<CatKind>) -> Result<(), Box<dyn std::error::Error>> {
    info!(start, count, "Building gallery");
    let listing = listing(start, count, kind);
    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}

/// Traits for `count` consecutive seeds
///
/// Rarity is rolled from the seed; without a fixed kind, kinds rotate
/// through [`CatKind::ALL`]. Listings start at seed 1 at the earliest.
pub fn listing(start: i64, count: usize, kind: Option<CatKind>) -> Vec<CatTraits> {
    let generator = TraitGenerator::new();
    let start = start.max(1);

    (0..count as i64)
        .into_par_iter()
        .map(|offset| {
            let seed = Seed::new(start.saturating_add(offset));
            let kind = kind.unwrap_or_else(|| {
                CatKind::ALL[(seed.value() as usize) % CatKind::ALL.len()]
            });
            generator.generate(seed, kind, Rarity::from_seed(seed))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_listing_in_seed_order() {
        let cats = listing(10, 20, None);
        assert_eq!(cats.len(), 20);
        for (i, cat) in cats.iter().enumerate() {
            assert_eq!(cat.seed.value(), 10 + i as i64);
            assert_eq!(cat.rarity, Rarity::from_seed(cat.seed));
        }
        assert_eq!(cats, listing(10, 20, None));
    }

    #[test]
    fn test_listing_kind_filter() {
        let cats = listing(1, 8, Some(CatKind::Bitcoin));
        assert!(cats.iter().all(|c| c.kind == CatKind::Bitcoin));

        let mixed = listing(1, 5, None);
        let kinds: Vec<CatKind> = mixed.iter().map(|c| c.kind).collect();
        assert_eq!(kinds.len(), 5);
        for kind in CatKind::ALL {
            assert!(kinds.contains(&kind));
        }
    }

    #[test]
    fn test_listing_clamps_start() {
        let cats = listing(-5, 3, Some(CatKind::Generic));
        let seeds: Vec<i64> = cats.iter().map(|c| c.seed.value()).collect();
        assert_eq!(seeds, vec![1, 2, 3]);
    }

    #[test]
    fn test_legendary_eye_styles_vary() {
        let legendary: HashSet<_> = listing(1, 5_000, Some(CatKind::Bitcoin))
            .into_iter()
            .filter(|c| c.rarity == Rarity::Legendary)
            .map(|c| c.eye_style)
            .collect();
        assert!(legendary.len() > 1);
    }

    #[test]
    fn test_listing_json() {
        let json = serde_json::to_string(&listing(1, 2, Some(CatKind::Quantum))).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("\"kind\":\"quantum\""));
    }
}
