//! ASCII portrait renderer

use async_trait::async_trait;
use catdao_core::{
    CatKind, CatTraits, OutputFormat, Palette, PortraitRequest, RenderOutput, TerminalCell,
    TerminalFrame,
};
use catdao_pipeline::stage::{PipelineStage, RenderContext, StageError};
use rayon::prelude::*;
use tracing::debug;

use crate::color::colors;
use crate::sprites::{Ink, SPRITE_WIDTH, Sprite, SpriteGenerator, accessory_color};

/// ASCII renderer pipeline stage
///
/// Frame width follows the request, clamped to
/// [`AsciiRenderer::MIN_WIDTH`]..=[`AsciiRenderer::MAX_WIDTH`] columns.
#[derive(Debug, Default)]
pub struct AsciiRenderer {
    /// Sprite generator
    sprite_gen: SpriteGenerator,
}

impl AsciiRenderer {
    pub const MIN_WIDTH: u32 = 24;
    pub const MAX_WIDTH: u32 = 120;

    /// Create a new ASCII renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective frame width for a requested width
    pub fn clamp_width(width: u32) -> u32 {
        width.clamp(Self::MIN_WIDTH, Self::MAX_WIDTH)
    }

    /// Render traits into a frame
    pub fn render(
        &self,
        traits: &CatTraits,
        request: &PortraitRequest,
        palette: Palette,
    ) -> TerminalFrame {
        let width = Self::clamp_width(request.width);
        let sprite = self.sprite_gen.for_traits(traits, request.is_profile());
        let ghostly = traits.kind == CatKind::Quantum && traits.is_unobserved();

        let mut frame = if request.is_profile() {
            self.profile_frame(traits, &sprite, width, palette)
        } else {
            self.full_frame(traits, &sprite, width, palette)
        };

        if ghostly {
            let portrait_rows = if request.is_profile() {
                frame.height
            } else {
                sprite.height() as u32 + 1
            };
            dim_fur(&mut frame, portrait_rows);
            scatter_aura(
                &mut frame,
                portrait_rows,
                traits.seed.value(),
                palette.adjust_color(traits.kind.accent()),
            );
        }

        frame
    }

    /// Head in a box, seed in the bottom border
    fn profile_frame(
        &self,
        traits: &CatTraits,
        sprite: &Sprite,
        width: u32,
        palette: Palette,
    ) -> TerminalFrame {
        let height = sprite.height() as u32 + 4;
        let mut frame = TerminalFrame::new(width, height);

        let border = palette.adjust_color(traits.kind.accent());
        frame.draw_box(0, 0, width, height, border);
        self.blit(&mut frame, sprite, traits, palette, 2);
        frame.draw_centered(height - 1, &format!(" #{} ", traits.seed), border);

        frame
    }

    /// Whole cat with a three-line caption
    fn full_frame(
        &self,
        traits: &CatTraits,
        sprite: &Sprite,
        width: u32,
        palette: Palette,
    ) -> TerminalFrame {
        let caption_top = sprite.height() as u32 + 2;
        let mut frame = TerminalFrame::new(width, caption_top + 3);

        self.blit(&mut frame, sprite, traits, palette, 1);

        let accent = palette.adjust_color(traits.kind.accent());
        let rarity = palette.adjust_color(traits.rarity.color());
        let caption = palette.adjust_color(colors::CAPTION);

        frame.draw_centered(caption_top, &traits.title(), accent);
        for x in 0..width {
            if let Some(cell) = frame.get_mut(x, caption_top) {
                if !cell.is_empty() {
                    cell.bold = true;
                }
            }
        }

        let special = if traits.special { " *special*" } else { "" };
        frame.draw_centered(
            caption_top + 1,
            &format!("{}{}", traits.rarity.label().to_uppercase(), special),
            rarity,
        );
        frame.draw_centered(
            caption_top + 2,
            &format!(
                "{} {} | {} | {}",
                traits.fur_color.label(),
                traits.pattern.label(),
                traits.expression.label(),
                traits.quantum_state.label()
            ),
            caption,
        );

        frame
    }

    /// Copy a sprite into the frame, centred horizontally, starting at row `top`
    fn blit(
        &self,
        frame: &mut TerminalFrame,
        sprite: &Sprite,
        traits: &CatTraits,
        palette: Palette,
        top: u32,
    ) {
        let left = frame.width.saturating_sub(SPRITE_WIDTH as u32) / 2;
        for (x, y, glyph) in sprite.glyphs() {
            let fg = palette.adjust_color(ink_color(traits, glyph.ink));
            let cell = TerminalCell::new(glyph.ch)
                .with_fg(fg)
                .with_bold(matches!(glyph.ink, Ink::Eye | Ink::Sparkle));
            frame.set(left + x as u32, top + y as u32, cell);
        }
    }
}

/// Resolve an ink role to a colour for these traits
pub fn ink_color(traits: &CatTraits, ink: Ink) -> [u8; 3] {
    match ink {
        Ink::Fur => traits.fur_color.rgb(),
        Ink::Marking => traits.fur_color.marking(),
        Ink::Eye => traits.eye_color.rgb(),
        Ink::Feature => colors::NOSE_PINK,
        Ink::Accessory(item) => accessory_color(item),
        Ink::Accent => traits.kind.accent(),
        Ink::Sparkle => colors::SPARKLE,
    }
}

/// Halve the brightness of the first `rows` rows
fn dim_fur(frame: &mut TerminalFrame, rows: u32) {
    let width = frame.width as usize;
    frame
        .cells
        .par_chunks_mut(width)
        .take(rows as usize)
        .for_each(|row| {
            for cell in row.iter_mut().filter(|c| !c.is_empty()) {
                cell.fg = cell.fg.map(|c| c / 2 + 24);
            }
        });
}

/// Sparse wave-function dots in empty cells of the first `rows` rows
fn scatter_aura(frame: &mut TerminalFrame, rows: u32, seed: i64, color: [u8; 3]) {
    let width = frame.width;
    let salt = seed.rem_euclid(97) as u32;

    frame
        .cells
        .par_chunks_mut(width as usize)
        .take(rows as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as u32;
            for x in 0..width {
                let cell = &mut row[x as usize];
                if !cell.is_empty() {
                    continue;
                }
                let hash = (x * 13 + y * 7 + x * y + salt) % 100;
                let ch = match hash {
                    0..=3 => '·',
                    4 => '∿',
                    5 => 'ψ',
                    _ => continue,
                };
                *cell = TerminalCell::new(ch).with_fg(color);
            }
        });
}

#[async_trait]
impl PipelineStage for AsciiRenderer {
    async fn process(&mut self, mut context: RenderContext) -> Result<RenderContext, StageError> {
        let traits = context.require_traits()?;
        let frame = self.render(traits, &context.request, context.palette);
        debug!(width = frame.width, height = frame.height, "ascii portrait rendered");
        context.output = Some(RenderOutput::Terminal(frame));
        Ok(context)
    }

    fn name(&self) -> &'static str {
        "ascii_renderer"
    }

    fn can_skip(&self, context: &RenderContext) -> bool {
        !context.wants(OutputFormat::Ascii)
    }
}
