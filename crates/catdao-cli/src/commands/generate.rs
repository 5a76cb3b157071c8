//! Generate command

use catdao_core::{CatDaoConfig, CatKind, TraitGenerator};
use tracing::info;

use super::{resolve_rarity, resolve_seed};

pub fn run(
    config: &CatDaoConfig,
    seed: Option<i64>,
    kind: Option<CatKind>,
    rarity: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let seed = resolve_seed(seed);
    let kind = kind.unwrap_or(config.default_kind);
    let rarity = resolve_rarity(config, rarity);

    info!(seed = seed.value(), kind = kind.label(), rarity = rarity.label(), "Generating traits");
    let traits = TraitGenerator::new().generate(seed, kind, rarity);

    if json {
        println!("{}", serde_json::to_string_pretty(&traits)?);
    } else {
        println!("{}", traits.title());
        for (label, value) in traits.describe() {
            println!("  {:<12} {}", label, value);
        }
    }

    Ok(())
}
