//! Observe command

use catdao_core::{CatDaoConfig, CatKind, ObservationLedger, Seed};
use tracing::info;

pub fn run(
    config: &CatDaoConfig,
    seed: i64,
    kind: CatKind,
) -> Result<(), Box<dyn std::error::Error>> {
    let seed = Seed::new(seed);
    let mut ledger = ObservationLedger::load(&config.ledger_path)?;

    if ledger.mark(kind, seed) {
        ledger.save()?;
        println!("{} #{} is now observed", kind.display_name(), seed);
    } else {
        println!("{} #{} was already observed", kind.display_name(), seed);
    }

    info!(
        ledger = %config.ledger_path.display(),
        observed = ledger.len(),
        "Ledger updated"
    );
    Ok(())
}
