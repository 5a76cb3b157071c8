//! CatDAO Core - Deterministic cat portrait traits
//!
//! A seed, a cat kind and a rarity tier map to a fixed set of visual traits.
//! Every back-end (ASCII, canvas, SVG, PNG) renders from those traits alone,
//! so the same input always yields the same portrait.
//!
//! ```text
//! (seed, kind, rarity, flags) → TraitGenerator → CatTraits → Renderer → RenderOutput
//! ```
//!
//! Seeds that are zero or negative are coerced to [`Seed::FALLBACK`] before
//! any draw happens, so generation has no failure modes.
//!
//! # Example
//!
//! ```
//! use catdao_core::{CatKind, PortraitRequest, Rarity, TraitGenerator};
//!
//! let request = PortraitRequest::new(42, CatKind::Quantum, Rarity::from_label("rare"));
//! let traits = TraitGenerator::new().generate_for(&request);
//! assert_eq!(traits.title(), "Quantum Cat #42");
//! ```

pub mod config;
pub mod drawing;
pub mod error;
pub mod generator;
pub mod kind;
pub mod observation;
pub mod output;
pub mod seed;
pub mod style;
pub mod traits;

// Re-export commonly used types
pub use config::CatDaoConfig;
pub use drawing::{BlendMode, DrawCommand, DrawLayer, Drawing, Paint, Rgba, Stroke};
pub use error::{CatDaoError, Result};
pub use generator::{PortraitRequest, RenderFlags, TraitGenerator};
pub use kind::{CatKind, Rarity};
pub use observation::ObservationLedger;
pub use output::{ImageFrame, OutputFormat, RenderOutput, TerminalCell, TerminalFrame};
pub use seed::{Seed, SineRng};
pub use style::{ColorDepth, Palette};
pub use traits::{
    Accessory, CatTraits, EarShape, Expression, EyeColor, EyeStyle, FurColor, FurLength, Pattern,
    QuantumState, TailType, TraitCatalog,
};
