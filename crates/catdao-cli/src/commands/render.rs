//! Render command

use std::path::{Path, PathBuf};

use catdao_backend_raster::RasterRenderer;
use catdao_backend_terminal::ColorMapper;
use catdao_core::{
    CatDaoConfig, CatKind, ObservationLedger, OutputFormat, PortraitRequest, RenderOutput, Seed,
};
use tracing::info;

use super::{build_pipeline, resolve_rarity, resolve_seed};

/// Options collected from the command line
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub seed: Option<i64>,
    pub kind: Option<CatKind>,
    pub rarity: Option<String>,
    pub format: Option<OutputFormat>,
    pub width: Option<u32>,
    pub profile: bool,
    pub observed: bool,
    pub output: Option<PathBuf>,
    pub color: bool,
}

pub async fn run(
    config: &CatDaoConfig,
    options: RenderOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = build_request(config, &options)?;
    let format = options.format.unwrap_or(config.default_format);

    let mut pipeline = build_pipeline(config)?;
    let output = pipeline.render(&request, format).await?;

    let (width, height) = output.dimensions();
    info!(
        seed = request.seed.value(),
        kind = request.kind.label(),
        format = format.label(),
        width,
        height,
        "Portrait rendered"
    );

    match &output {
        RenderOutput::Image(frame) => {
            let path = options
                .output
                .clone()
                .unwrap_or_else(|| default_png_path(request.kind, request.seed));
            RasterRenderer::save_png(frame, &path)?;
            println!("{}", path.display());
        }
        _ => {
            let text = to_text(config, &output, options.color && options.output.is_none())?;
            write_text(options.output.as_deref(), &text)?;
        }
    }

    Ok(())
}

/// Resolve command-line options against the configuration
///
/// The observed flag is set when asked for explicitly or when the ledger
/// already records this cat.
pub fn build_request(
    config: &CatDaoConfig,
    options: &RenderOptions,
) -> Result<PortraitRequest, Box<dyn std::error::Error>> {
    let seed = resolve_seed(options.seed);
    let kind = options.kind.unwrap_or(config.default_kind);
    let rarity = resolve_rarity(config, options.rarity.as_deref());
    let format = options.format.unwrap_or(config.default_format);
    let width = options.width.unwrap_or_else(|| config.width_for(format));

    let observed =
        options.observed || ObservationLedger::load(&config.ledger_path)?.is_observed(kind, seed);

    Ok(PortraitRequest::new(seed, kind, rarity)
        .with_width(width)
        .with_profile(options.profile)
        .with_observed(observed))
}

/// Textual form of a non-image output
fn to_text(
    config: &CatDaoConfig,
    output: &RenderOutput,
    color: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    let text = match output {
        RenderOutput::Terminal(frame) if color => ColorMapper::new(config.color_depth).encode(frame),
        RenderOutput::Terminal(frame) => frame.to_plain(),
        RenderOutput::Canvas(drawing) => drawing.to_json()? + "\n",
        RenderOutput::Svg(svg) => svg.clone(),
        RenderOutput::Image(_) => return Err("image output has no text form".into()),
    };
    Ok(text)
}

fn write_text(path: Option<&Path>, text: &str) -> std::io::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, text)?;
            info!(path = %path.display(), "Wrote output");
        }
        None => print!("{}", text),
    }
    Ok(())
}

/// `catdao-<kind>-<seed>.png` in the working directory
pub fn default_png_path(kind: CatKind, seed: Seed) -> PathBuf {
    PathBuf::from(format!("catdao-{}-{}.png", kind.label(), seed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use catdao_core::Rarity;

    fn config_in(dir: &Path) -> CatDaoConfig {
        CatDaoConfig {
            ledger_path: dir.join("ledger.json"),
            ..Default::default()
        }
    }

    #[test]
    fn test_request_defaults_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = CatDaoConfig {
            default_kind: CatKind::Bitcoin,
            default_rarity: "legendary".to_string(),
            ..config_in(dir.path())
        };

        let request = build_request(
            &config,
            &RenderOptions {
                seed: Some(42),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(request.seed.value(), 42);
        assert_eq!(request.kind, CatKind::Bitcoin);
        assert_eq!(request.rarity, Rarity::Legendary);
        assert_eq!(request.width, config.ascii_width);
        assert!(!request.is_observed());
    }

    #[test]
    fn test_width_follows_format() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let request = build_request(
            &config,
            &RenderOptions {
                seed: Some(1),
                format: Some(OutputFormat::Svg),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(request.width, config.canvas_size);
    }

    #[test]
    fn test_ledger_sets_observed() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let mut ledger = ObservationLedger::load(&config.ledger_path).unwrap();
        ledger.mark(CatKind::Schrodinger, Seed::new(7));
        ledger.save().unwrap();

        let options = RenderOptions {
            seed: Some(7),
            kind: Some(CatKind::Schrodinger),
            ..Default::default()
        };
        assert!(build_request(&config, &options).unwrap().is_observed());

        let other = RenderOptions {
            seed: Some(8),
            ..options
        };
        assert!(!build_request(&config, &other).unwrap().is_observed());
    }

    #[test]
    fn test_default_png_path() {
        assert_eq!(
            default_png_path(CatKind::Quantum, Seed::new(42)),
            PathBuf::from("catdao-quantum-42.png")
        );
    }

    #[tokio::test]
    async fn test_render_svg_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let path = dir.path().join("cat.svg");

        run(
            &config,
            RenderOptions {
                seed: Some(42),
                kind: Some(CatKind::Cypherpunk),
                format: Some(OutputFormat::Svg),
                width: Some(128),
                output: Some(path.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="128""#));
    }

    #[tokio::test]
    async fn test_render_png_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let path = dir.path().join("cat.png");

        run(
            &config,
            RenderOptions {
                seed: Some(3),
                format: Some(OutputFormat::Png),
                width: Some(64),
                output: Some(path.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
