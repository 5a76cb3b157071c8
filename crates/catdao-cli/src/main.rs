//! CatDAO CLI - Deterministic Cat Portraits
//!
//! Generate, render and browse cat portraits from the command line.

use std::path::PathBuf;

use catdao_core::{CatDaoConfig, CatKind, OutputFormat};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod commands;

/// CatDAO - deterministic cat portraits
///
/// Every portrait is a pure function of its seed, kind and rarity: the same
/// inputs always draw the same cat.
#[derive(Parser)]
#[command(name = "catdao")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the traits for a seed
    Generate {
        /// Seed (random if omitted)
        #[arg(short, long)]
        seed: Option<i64>,

        /// Cat kind: quantum, bitcoin, cypherpunk, schrodinger, generic
        #[arg(short, long)]
        kind: Option<CatKind>,

        /// Rarity tier; unknown labels count as common
        #[arg(short, long)]
        rarity: Option<String>,

        /// Print traits as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a portrait
    Render {
        /// Seed (random if omitted)
        #[arg(short, long)]
        seed: Option<i64>,

        /// Cat kind
        #[arg(short, long)]
        kind: Option<CatKind>,

        /// Rarity tier
        #[arg(short, long)]
        rarity: Option<String>,

        /// Output format: ascii, canvas, svg, png
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Columns for ASCII, pixels for canvas/svg/png
        #[arg(short, long)]
        width: Option<u32>,

        /// Head-only avatar framing
        #[arg(long)]
        profile: bool,

        /// Render as observed even if the ledger has no record
        #[arg(long)]
        observed: bool,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show one portrait of every kind
    Showcase {
        /// Seed shared by all portraits (random if omitted)
        #[arg(short, long)]
        seed: Option<i64>,

        /// Rarity tier
        #[arg(short, long)]
        rarity: Option<String>,

        /// Present portraits one at a time on the alternate screen
        #[arg(long)]
        screen: bool,

        /// Milliseconds each portrait stays up in screen mode
        #[arg(long, default_value = "1500")]
        delay_ms: u64,
    },

    /// List traits for a range of seeds as JSON
    Gallery {
        /// First seed
        #[arg(long, default_value = "1")]
        start: i64,

        /// Number of portraits
        #[arg(short = 'n', long, default_value = "12")]
        count: usize,

        /// Restrict to one kind (otherwise kinds rotate with the seed)
        #[arg(short, long)]
        kind: Option<CatKind>,
    },

    /// Mark a portrait as observed
    Observe {
        /// Seed
        #[arg(short, long)]
        seed: i64,

        /// Cat kind
        #[arg(short, long)]
        kind: CatKind,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &cli.config {
        Some(path) => CatDaoConfig::load(path)?,
        None => CatDaoConfig::default(),
    };

    match cli.command {
        Commands::Generate {
            seed,
            kind,
            rarity,
            json,
        } => {
            commands::generate::run(&config, seed, kind, rarity.as_deref(), json)?;
        }

        Commands::Render {
            seed,
            kind,
            rarity,
            format,
            width,
            profile,
            observed,
            output,
        } => {
            let options = commands::render::RenderOptions {
                seed,
                kind,
                rarity,
                format,
                width,
                profile,
                observed,
                output,
                color: !cli.no_color,
            };
            commands::render::run(&config, options).await?;
        }

        Commands::Showcase {
            seed,
            rarity,
            screen,
            delay_ms,
        } => {
            commands::showcase::run(&config, seed, rarity.as_deref(), screen, delay_ms, !cli.no_color)
                .await?;
        }

        Commands::Gallery { start, count, kind } => {
            commands::gallery::run(start, count, kind)?;
        }

        Commands::Observe { seed, kind } => {
            commands::observe::run(&config, seed, kind)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render() {
        let cli = Cli::try_parse_from([
            "catdao", "render", "--seed", "42", "--kind", "btc", "--format", "svg", "--profile",
        ])
        .unwrap();

        match cli.command {
            Commands::Render {
                seed,
                kind,
                format,
                profile,
                ..
            } => {
                assert_eq!(seed, Some(42));
                assert_eq!(kind, Some(CatKind::Bitcoin));
                assert_eq!(format, Some(OutputFormat::Svg));
                assert!(profile);
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(Cli::try_parse_from(["catdao", "observe", "--seed", "1", "--kind", "dog"]).is_err());
    }
}
