//! Showcase command

use std::time::Duration;

use catdao_backend_terminal::{ColorMapper, TerminalOutput};
use catdao_core::{
    CatDaoConfig, CatKind, ColorDepth, ObservationLedger, OutputFormat, PortraitRequest,
    TerminalFrame,
};
use tracing::{info, warn};

use super::{build_pipeline, resolve_rarity, resolve_seed};

pub async fn run(
    config: &CatDaoConfig,
    seed: Option<i64>,
    rarity: Option<&str>,
    screen: bool,
    delay_ms: u64,
    color: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let seed = resolve_seed(seed);
    let rarity = resolve_rarity(config, rarity);
    let ledger = ObservationLedger::load(&config.ledger_path)?;
    let mut pipeline = build_pipeline(config)?;

    info!(seed = seed.value(), rarity = rarity.label(), "Showcasing every kind");

    let mut frames: Vec<TerminalFrame> = Vec::with_capacity(CatKind::ALL.len());
    for kind in CatKind::ALL {
        let request = PortraitRequest::new(seed, kind, rarity)
            .with_width(config.ascii_width)
            .with_observed(ledger.is_observed(kind, seed));
        let output = pipeline.render(&request, OutputFormat::Ascii).await?;
        if let Some(frame) = output.as_terminal() {
            frames.push(frame.clone());
        }
    }

    let depth = effective_depth(config.color_depth);
    if screen {
        present(&frames, depth, Duration::from_millis(delay_ms)).await?;
    } else {
        let mapper = ColorMapper::new(depth);
        for frame in &frames {
            if color {
                println!("{}", mapper.encode(frame));
            } else {
                println!("{}", frame.to_plain());
            }
        }
    }

    Ok(())
}

/// One portrait at a time on the alternate screen
async fn present(
    frames: &[TerminalFrame],
    depth: ColorDepth,
    delay: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut output = TerminalOutput::new(ColorMapper::new(depth));
    output.init()?;

    for frame in frames {
        if let Err(e) = output.render(frame) {
            output.cleanup()?;
            return Err(e.into());
        }
        tokio::time::sleep(delay).await;
    }

    output.cleanup()?;
    Ok(())
}

/// Step true colour down to 256 colours on terminals that lack it
fn effective_depth(configured: ColorDepth) -> ColorDepth {
    if configured == ColorDepth::TrueColor && !TerminalOutput::supports_true_color() {
        warn!("Terminal does not advertise true colour, using 256 colours");
        ColorDepth::Extended
    } else {
        configured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_depth_keeps_reduced() {
        assert_eq!(effective_depth(ColorDepth::Basic), ColorDepth::Basic);
        assert_eq!(effective_depth(ColorDepth::Extended), ColorDepth::Extended);
    }
}
