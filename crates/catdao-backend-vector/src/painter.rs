//! Trait-to-drawing painter
//!
//! Portraits are laid out on a 100x100 grid and scaled to the requested
//! size. Feature positions are expressed relative to the head so the same
//! code draws both the small head of a full image and the enlarged head of
//! a profile image.

use std::f64::consts::{PI, TAU};

use catdao_core::drawing::{rgb, rgba};
use catdao_core::{
    Accessory, BlendMode, CatKind, CatTraits, DrawCommand, DrawLayer, Drawing, EarShape,
    Expression, EyeStyle, Paint, Palette, Pattern, PortraitRequest, Rgba, SineRng, Stroke,
    TailType,
};

/// Smallest drawing edge in pixels
pub const MIN_SIZE: u32 = 32;
/// Largest drawing edge in pixels
pub const MAX_SIZE: u32 = 2048;

/// Opacity of the portrait layer while a quantum cat is unobserved
pub const GHOST_OPACITY: f32 = 0.55;

const INK: [u8; 3] = [0x1A, 0x1A, 0x22];
const NOSE: [u8; 3] = [0xFF, 0x9E, 0xB5];
const GOLD: [u8; 3] = [0xFF, 0xD7, 0x00];
const CARDBOARD: [u8; 3] = [0xB0, 0x8D, 0x57];
const WHISKER: [u8; 3] = [0xEE, 0xEE, 0xEE];
const CAPTION: [u8; 3] = [0xDC, 0xDC, 0xDC];

/// Maps 100-unit grid coordinates onto the output size
#[derive(Debug, Clone, Copy)]
struct Grid {
    unit: f64,
}

impl Grid {
    fn new(size: f64) -> Self {
        Self { unit: size / 100.0 }
    }

    fn v(&self, v: f64) -> f64 {
        v * self.unit
    }

    fn pt(&self, (x, y): (f64, f64)) -> [f64; 2] {
        [self.v(x), self.v(y)]
    }

    fn pts(&self, points: &[(f64, f64)]) -> Vec<[f64; 2]> {
        points.iter().map(|&p| self.pt(p)).collect()
    }

    fn paint(&self, paint: Paint) -> Paint {
        Paint {
            fill: paint.fill,
            stroke: paint.stroke.map(|s| self.stroke(s.color, s.width)),
        }
    }

    fn stroke(&self, color: Rgba, width: f64) -> Stroke {
        Stroke::new(color, self.v(width))
    }

    fn circle(&self, (cx, cy): (f64, f64), r: f64, paint: Paint) -> DrawCommand {
        DrawCommand::Circle {
            cx: self.v(cx),
            cy: self.v(cy),
            r: self.v(r),
            paint: self.paint(paint),
        }
    }

    fn ellipse(&self, (cx, cy): (f64, f64), rx: f64, ry: f64, paint: Paint) -> DrawCommand {
        DrawCommand::Ellipse {
            cx: self.v(cx),
            cy: self.v(cy),
            rx: self.v(rx),
            ry: self.v(ry),
            paint: self.paint(paint),
        }
    }

    fn rect(&self, (x, y): (f64, f64), w: f64, h: f64, paint: Paint) -> DrawCommand {
        DrawCommand::Rect {
            x: self.v(x),
            y: self.v(y),
            w: self.v(w),
            h: self.v(h),
            paint: self.paint(paint),
        }
    }

    fn polygon(&self, points: &[(f64, f64)], paint: Paint) -> DrawCommand {
        DrawCommand::Polygon {
            points: self.pts(points),
            paint: self.paint(paint),
        }
    }

    fn line(&self, from: (f64, f64), to: (f64, f64), color: Rgba, width: f64) -> DrawCommand {
        DrawCommand::Line {
            from: self.pt(from),
            to: self.pt(to),
            stroke: self.stroke(color, width),
        }
    }

    fn polyline(&self, points: &[(f64, f64)], color: Rgba, width: f64) -> DrawCommand {
        DrawCommand::Polyline {
            points: self.pts(points),
            stroke: self.stroke(color, width),
        }
    }

    fn text(&self, (x, y): (f64, f64), size: f64, content: &str, color: Rgba) -> DrawCommand {
        DrawCommand::Text {
            x: self.v(x),
            y: self.v(y),
            size: self.v(size),
            content: content.to_string(),
            color,
        }
    }
}

/// Head placement in grid units; offsets are multiples of the radius
#[derive(Debug, Clone, Copy)]
struct Head {
    cx: f64,
    cy: f64,
    r: f64,
}

impl Head {
    const FULL: Head = Head {
        cx: 50.0,
        cy: 38.0,
        r: 18.0,
    };
    const PROFILE: Head = Head {
        cx: 50.0,
        cy: 54.0,
        r: 28.0,
    };

    fn at(&self, dx: f64, dy: f64) -> (f64, f64) {
        (self.cx + dx * self.r, self.cy + dy * self.r)
    }

    fn len(&self, d: f64) -> f64 {
        d * self.r
    }
}

/// Elliptical area that pattern markings are scattered over
#[derive(Debug, Clone, Copy)]
struct Region {
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
}

impl Region {
    fn at(&self, dx: f64, dy: f64) -> (f64, f64) {
        (self.cx + dx * self.rx, self.cy + dy * self.ry)
    }
}

/// Paints cat traits as layered drawing commands
#[derive(Debug, Clone, Copy, Default)]
pub struct PortraitPainter;

impl PortraitPainter {
    pub fn new() -> Self {
        Self
    }

    /// Effective drawing size for a requested width
    pub fn clamp_size(width: u32) -> u32 {
        width.clamp(MIN_SIZE, MAX_SIZE)
    }

    /// Paint a portrait
    ///
    /// Layers, back to front: `background`, `portrait`, `accessories` and,
    /// for unobserved quantum cats, a screen-blended `aura`. Empty layers are
    /// omitted.
    pub fn paint(&self, traits: &CatTraits, request: &PortraitRequest, palette: Palette) -> Drawing {
        let size = Self::clamp_size(request.width) as f64;
        let grid = Grid::new(size);
        let profile = request.is_profile();
        let head = if profile { Head::PROFILE } else { Head::FULL };

        let mut drawing = Drawing::new(size, size);
        drawing.add_layer(self.background(traits, &grid, profile));

        let sealed = traits.kind == CatKind::Schrodinger && traits.is_unobserved();
        let ghostly = traits.kind == CatKind::Quantum && traits.is_unobserved();

        if sealed {
            drawing.add_layer(self.sealed_box(&grid, profile));
        } else {
            let mut portrait = DrawLayer::new("portrait");
            if !profile {
                self.tail(&mut portrait, &grid, traits);
                self.body(&mut portrait, &grid, traits);
            }
            self.ears(&mut portrait, &grid, head, traits);
            self.head(&mut portrait, &grid, head, traits);
            self.eyes(&mut portrait, &grid, head, traits);
            self.muzzle(&mut portrait, &grid, head, traits);
            if ghostly {
                portrait = portrait.with_opacity(GHOST_OPACITY);
            }
            drawing.add_layer(portrait);
            drawing.add_layer(self.accessories(&grid, head, traits, profile));
            if ghostly {
                drawing.add_layer(self.aura(&grid, head, traits));
            }
        }

        apply_palette(&mut drawing, palette);
        drawing
    }

    fn background(&self, traits: &CatTraits, grid: &Grid, profile: bool) -> DrawLayer {
        let mut layer = DrawLayer::new("background");
        let accent = traits.kind.accent();
        let backdrop = accent.map(|c| c / 5 + 12);

        if profile {
            layer.push(grid.circle(
                (50.0, 50.0),
                49.0,
                Paint::fill(rgb(backdrop)).with_stroke(rgb(accent), 2.0),
            ));
        } else {
            layer.push(DrawCommand::Clear {
                color: rgb(backdrop),
            });
            if traits.special {
                layer.push(grid.rect((2.0, 2.0), 96.0, 96.0, Paint::stroke(rgb(GOLD), 1.5)));
            }
            layer.push(grid.text((50.0, 96.0), 5.0, &traits.title(), rgb(CAPTION)));
        }

        layer
    }

    fn sealed_box(&self, grid: &Grid, profile: bool) -> DrawLayer {
        let mut layer = DrawLayer::new("portrait");
        let (x0, y0, x1, y1) = if profile {
            (24.0, 38.0, 76.0, 80.0)
        } else {
            (28.0, 40.0, 72.0, 84.0)
        };
        let outline = Paint::fill(rgb(CARDBOARD)).with_stroke(rgb(INK), 0.8);

        layer.push(grid.rect((x0, y0), x1 - x0, y1 - y0, outline));
        // Closed flaps
        layer.push(grid.polygon(
            &[(x0, y0), (x0 - 4.0, y0 - 7.0), (x1 + 4.0, y0 - 7.0), (x1, y0)],
            Paint::fill(rgb(CARDBOARD.map(|c| c - c / 6))).with_stroke(rgb(INK), 0.8),
        ));
        layer.push(grid.line((50.0, y0 - 7.0), (50.0, y0 + 8.0), rgba(INK, 0.5), 2.0));
        layer.push(grid.text((50.0, (y0 + y1) / 2.0 + 3.0), 18.0, "?", rgb(INK)));
        layer
    }

    fn tail(&self, layer: &mut DrawLayer, grid: &Grid, traits: &CatTraits) {
        let fur = rgb(traits.fur_color.rgb());
        match traits.tail_type {
            TailType::Straight => {
                layer.push(grid.polyline(&[(68.0, 80.0), (82.0, 72.0), (90.0, 60.0)], fur, 4.0))
            }
            TailType::Curled => layer.push(grid.polyline(
                &[
                    (68.0, 80.0),
                    (84.0, 78.0),
                    (90.0, 68.0),
                    (86.0, 60.0),
                    (80.0, 62.0),
                    (82.0, 67.0),
                ],
                fur,
                4.0,
            )),
            TailType::Fluffy => layer.push(grid.polyline(
                &[(68.0, 80.0), (80.0, 74.0), (86.0, 62.0), (88.0, 52.0)],
                fur,
                7.0,
            )),
            TailType::Bobbed => layer.push(grid.circle((71.0, 80.0), 4.0, Paint::fill(fur))),
            TailType::Zigzag => layer.push(grid.polyline(
                &[
                    (68.0, 80.0),
                    (78.0, 76.0),
                    (74.0, 68.0),
                    (86.0, 64.0),
                    (82.0, 56.0),
                    (92.0, 52.0),
                ],
                fur,
                4.0,
            )),
            TailType::Forked => {
                layer.push(grid.polyline(&[(68.0, 80.0), (80.0, 72.0), (84.0, 62.0)], fur, 4.0));
                layer.push(grid.polyline(&[(84.0, 62.0), (80.0, 52.0)], fur, 3.0));
                layer.push(grid.polyline(&[(84.0, 62.0), (92.0, 54.0)], fur, 3.0));
            }
        }
    }

    fn body(&self, layer: &mut DrawLayer, grid: &Grid, traits: &CatTraits) {
        let fur = fur_fill(traits);
        let outline = Paint::fill(fur).with_stroke(rgb(INK), 0.8);

        layer.push(grid.ellipse((50.0, 72.0), 21.0, 16.0, outline));
        markings(
            layer,
            grid,
            Region {
                cx: 50.0,
                cy: 73.0,
                rx: 15.0,
                ry: 10.0,
            },
            traits,
        );
        for x in [41.0, 59.0] {
            layer.push(grid.ellipse((x, 87.0), 5.0, 3.0, outline));
        }
    }

    fn ears(&self, layer: &mut DrawLayer, grid: &Grid, head: Head, traits: &CatTraits) {
        let outer = Paint::fill(fur_fill(traits)).with_stroke(rgb(INK), 0.8);
        let inner = Paint::fill(rgba(NOSE, 0.7));

        for s in [-1.0, 1.0] {
            match traits.ear_shape {
                EarShape::Pointed | EarShape::Tufted => {
                    layer.push(grid.polygon(
                        &[head.at(s * 0.9, -0.4), head.at(s * 0.75, -1.25), head.at(s * 0.25, -0.9)],
                        outer,
                    ));
                    layer.push(grid.polygon(
                        &[head.at(s * 0.75, -0.6), head.at(s * 0.7, -1.05), head.at(s * 0.4, -0.85)],
                        inner,
                    ));
                    if traits.ear_shape == EarShape::Tufted {
                        layer.push(grid.line(
                            head.at(s * 0.75, -1.25),
                            head.at(s * 0.8, -1.5),
                            rgb(traits.fur_color.marking()),
                            0.8,
                        ));
                    }
                }
                EarShape::Rounded => {
                    layer.push(grid.circle(head.at(s * 0.65, -0.8), head.len(0.32), outer));
                    layer.push(grid.circle(head.at(s * 0.65, -0.8), head.len(0.18), inner));
                }
                EarShape::Folded => {
                    layer.push(grid.polygon(
                        &[
                            head.at(s * 0.9, -0.45),
                            head.at(s * 0.7, -1.05),
                            head.at(s * 0.3, -0.9),
                            head.at(s * 0.55, -0.8),
                        ],
                        outer,
                    ));
                }
            }
        }
    }

    fn head(&self, layer: &mut DrawLayer, grid: &Grid, head: Head, traits: &CatTraits) {
        let fur = fur_fill(traits);
        let outline = if traits.special {
            Paint::fill(fur).with_stroke(rgb(GOLD), 1.2)
        } else {
            Paint::fill(fur).with_stroke(rgb(INK), 0.8)
        };

        // Cheek tufts sit behind the head outline
        for i in 0..traits.fur_length.tufts() {
            let y = 0.15 + 0.2 * i as f64;
            for s in [-1.0, 1.0] {
                layer.push(grid.polygon(
                    &[head.at(s * 0.92, y - 0.12), head.at(s * 1.18, y), head.at(s * 0.88, y + 0.12)],
                    Paint::fill(fur),
                ));
            }
        }

        layer.push(grid.circle((head.cx, head.cy), head.r, outline));
        markings(
            layer,
            grid,
            Region {
                cx: head.cx,
                cy: head.cy - head.len(0.55),
                rx: head.len(0.45),
                ry: head.len(0.25),
            },
            traits,
        );
    }

    fn eyes(&self, layer: &mut DrawLayer, grid: &Grid, head: Head, traits: &CatTraits) {
        let iris = traits.eye_color.rgb();
        let pupil = Paint::fill(rgb(INK));
        let white = Paint::fill(rgb([0xFF, 0xFF, 0xFF]));

        if traits.eye_style == EyeStyle::Visor {
            layer.push(grid.rect(
                head.at(-0.7, -0.2),
                head.len(1.4),
                head.len(0.28),
                Paint::fill(rgba(iris, 0.85)).with_stroke(rgb(INK), 0.6),
            ));
            return;
        }

        for s in [-1.0, 1.0] {
            let eye = head.at(s * 0.38, -0.05);
            match traits.eye_style {
                EyeStyle::Round => {
                    layer.push(grid.circle(eye, head.len(0.16), Paint::fill(rgb(iris))));
                    layer.push(grid.circle(eye, head.len(0.07), pupil));
                }
                EyeStyle::Almond => {
                    layer.push(grid.ellipse(eye, head.len(0.2), head.len(0.11), Paint::fill(rgb(iris))));
                    layer.push(grid.ellipse(eye, head.len(0.05), head.len(0.1), pupil));
                }
                EyeStyle::Sleepy => {
                    layer.push(grid.polyline(
                        &[
                            head.at(s * 0.38 - 0.17, -0.05),
                            head.at(s * 0.38, 0.02),
                            head.at(s * 0.38 + 0.17, -0.05),
                        ],
                        rgb(INK),
                        0.8,
                    ));
                }
                EyeStyle::Wide => {
                    layer.push(grid.circle(eye, head.len(0.21), Paint::fill(rgb(iris))));
                    layer.push(grid.circle(eye, head.len(0.1), pupil));
                    layer.push(grid.circle(head.at(s * 0.38 + 0.06, -0.11), head.len(0.04), white));
                }
                EyeStyle::Slit => {
                    layer.push(grid.ellipse(eye, head.len(0.18), head.len(0.14), Paint::fill(rgb(iris))));
                    layer.push(grid.ellipse(eye, head.len(0.03), head.len(0.12), pupil));
                }
                EyeStyle::Laser => {
                    layer.push(grid.circle(eye, head.len(0.15), Paint::fill(rgb(iris))));
                    let target = (eye.0 + s * 30.0, eye.1 + 25.0);
                    layer.push(grid.line(eye, target, rgba(iris, 0.7), 1.2));
                }
                EyeStyle::Glowing => {
                    layer.push(grid.circle(eye, head.len(0.28), Paint::fill(rgba(iris, 0.35))));
                    layer.push(grid.circle(eye, head.len(0.15), Paint::fill(rgb(iris))));
                    layer.push(grid.circle(eye, head.len(0.05), white));
                }
                EyeStyle::Hollow => {
                    layer.push(grid.circle(eye, head.len(0.16), Paint::stroke(rgb(iris), 1.0)));
                }
                EyeStyle::Visor => {}
            }
        }
    }

    /// Nose, mouth and whiskers
    fn muzzle(&self, layer: &mut DrawLayer, grid: &Grid, head: Head, traits: &CatTraits) {
        let ink = rgb(INK);

        layer.push(grid.polygon(
            &[head.at(-0.09, 0.18), head.at(0.09, 0.18), head.at(0.0, 0.28)],
            Paint::fill(rgb(NOSE)),
        ));

        let mouth = |points: &[(f64, f64)]| -> Vec<(f64, f64)> {
            points.iter().map(|&(x, y)| head.at(x, y)).collect()
        };
        match traits.expression {
            Expression::Happy => layer.push(grid.polyline(
                &mouth(&[(-0.2, 0.34), (-0.1, 0.42), (0.0, 0.32), (0.1, 0.42), (0.2, 0.34)]),
                ink,
                0.6,
            )),
            Expression::Curious => {
                layer.push(grid.circle(head.at(0.0, 0.42), head.len(0.06), Paint::stroke(ink, 0.6)))
            }
            Expression::Grumpy => layer.push(grid.polyline(
                &mouth(&[(-0.18, 0.45), (0.0, 0.37), (0.18, 0.45)]),
                ink,
                0.6,
            )),
            Expression::Smug => layer.push(grid.polyline(
                &mouth(&[(-0.15, 0.4), (0.05, 0.4), (0.2, 0.33)]),
                ink,
                0.6,
            )),
            Expression::Sleepy => {
                layer.push(grid.line(head.at(-0.1, 0.4), head.at(0.1, 0.4), ink, 0.6))
            }
            Expression::Surprised => layer.push(grid.ellipse(
                head.at(0.0, 0.44),
                head.len(0.08),
                head.len(0.1),
                Paint::fill(ink),
            )),
            Expression::Mischievous => {
                layer.push(grid.polyline(
                    &mouth(&[(-0.2, 0.36), (0.0, 0.42), (0.2, 0.36)]),
                    ink,
                    0.6,
                ));
                layer.push(grid.polygon(
                    &mouth(&[(0.06, 0.4), (0.14, 0.38), (0.1, 0.48)]),
                    Paint::fill(rgb([0xFF, 0xFF, 0xFF])),
                ));
            }
        }

        let whisker = rgba(WHISKER, 0.8);
        for s in [-1.0, 1.0] {
            for dy in [-0.06, 0.04, 0.14] {
                layer.push(grid.line(
                    head.at(s * 0.3, 0.25 + dy),
                    head.at(s * 1.05, 0.15 + dy * 1.5),
                    whisker,
                    0.4,
                ));
            }
        }
    }

    fn accessories(&self, grid: &Grid, head: Head, traits: &CatTraits, profile: bool) -> DrawLayer {
        let mut layer = DrawLayer::new("accessories");
        let gold = rgb(GOLD);
        let ink = rgb(INK);

        for &item in &traits.accessories {
            if profile && !item.is_headwear() {
                continue;
            }
            match item {
                Accessory::Collar => {
                    layer.push(grid.rect((38.0, 55.0), 24.0, 3.0, Paint::fill(rgb([0xC0, 0x39, 0x2B]))))
                }
                Accessory::Bell => layer.push(grid.circle(
                    (50.0, 60.0),
                    2.0,
                    Paint::fill(gold).with_stroke(ink, 0.4),
                )),
                Accessory::Bowtie => {
                    let bow = Paint::fill(rgb([0x8E, 0x44, 0xAD]));
                    layer.push(grid.polygon(&[(50.0, 58.0), (44.0, 55.0), (44.0, 61.0)], bow));
                    layer.push(grid.polygon(&[(50.0, 58.0), (56.0, 55.0), (56.0, 61.0)], bow));
                }
                Accessory::TopHat => {
                    let hat = Paint::fill(ink);
                    layer.push(grid.rect(head.at(-0.7, -1.0), head.len(1.4), head.len(0.12), hat));
                    layer.push(grid.rect(head.at(-0.45, -1.6), head.len(0.9), head.len(0.6), hat));
                    layer.push(grid.rect(
                        head.at(-0.45, -1.15),
                        head.len(0.9),
                        head.len(0.1),
                        Paint::fill(rgb([0xC0, 0x39, 0x2B])),
                    ));
                }
                Accessory::Crown => layer.push(grid.polygon(
                    &[
                        head.at(-0.5, -0.85),
                        head.at(-0.5, -1.3),
                        head.at(-0.25, -1.05),
                        head.at(0.0, -1.4),
                        head.at(0.25, -1.05),
                        head.at(0.5, -1.3),
                        head.at(0.5, -0.85),
                    ],
                    Paint::fill(gold).with_stroke(ink, 0.4),
                )),
                Accessory::CoinPendant => {
                    layer.push(grid.polyline(&[(46.0, 56.0), (50.0, 61.0), (54.0, 56.0)], gold, 0.5));
                    layer.push(grid.circle((50.0, 64.0), 3.0, Paint::fill(gold).with_stroke(ink, 0.4)));
                    layer.push(grid.text((50.0, 64.0), 3.5, "₿", ink));
                }
                Accessory::GoldChain => layer.push(grid.polyline(
                    &[(38.0, 57.0), (44.0, 62.0), (50.0, 63.5), (56.0, 62.0), (62.0, 57.0)],
                    gold,
                    1.0,
                )),
                Accessory::Shades => {
                    let lens = Paint::fill(rgba(INK, 0.92));
                    for s in [-1.0, 1.0] {
                        layer.push(grid.rect(head.at(s * 0.38 - 0.22, -0.17), head.len(0.44), head.len(0.26), lens));
                    }
                    layer.push(grid.line(head.at(-0.16, -0.08), head.at(0.16, -0.08), ink, 0.6));
                }
                Accessory::Hoodie => {
                    let hood = arc(head, 1.12, PI * 1.05, PI * 1.95, 12);
                    layer.push(grid.polyline(&hood, rgb([0x34, 0x49, 0x5E]), head.len(0.22)));
                }
                Accessory::Headphones => {
                    let band = arc(head, 1.05, PI, TAU, 12);
                    layer.push(grid.polyline(&band, ink, head.len(0.1)));
                    for s in [-1.0, 1.0] {
                        layer.push(grid.rect(
                            head.at(s * 1.0 - 0.12, -0.25),
                            head.len(0.24),
                            head.len(0.4),
                            Paint::fill(rgb([0x55, 0x55, 0x66])),
                        ));
                    }
                }
                Accessory::Halo => layer.push(grid.ellipse(
                    head.at(0.0, -1.35),
                    head.len(0.55),
                    head.len(0.14),
                    Paint::stroke(gold, 1.2),
                )),
                Accessory::QubitEarring => {
                    layer.push(grid.line(head.at(0.92, 0.2), head.at(0.95, 0.3), ink, 0.3));
                    layer.push(grid.circle(
                        head.at(0.95, 0.38),
                        head.len(0.08),
                        Paint::fill(rgb(traits.kind.accent())),
                    ));
                }
                Accessory::Vial => layer.push(grid.rect(
                    (58.0, 62.0),
                    4.0,
                    8.0,
                    Paint::fill(rgba([0x39, 0xFF, 0x14], 0.7)).with_stroke(ink, 0.4),
                )),
                Accessory::GeigerCounter => {
                    layer.push(grid.rect(
                        (36.0, 62.0),
                        8.0,
                        6.0,
                        Paint::fill(rgb([0xF1, 0xC4, 0x0F])).with_stroke(ink, 0.4),
                    ));
                    layer.push(grid.line((40.0, 67.0), (42.0, 63.5), ink, 0.4));
                }
            }
        }

        if traits.special {
            for (x, y) in [(14.0, 16.0), (86.0, 22.0), (18.0, 74.0)] {
                layer.push(grid.polygon(&sparkle(x, y, 3.5), Paint::fill(gold)));
            }
        }

        layer
    }

    fn aura(&self, grid: &Grid, head: Head, traits: &CatTraits) -> DrawLayer {
        let mut layer = DrawLayer::new("aura").with_blend(BlendMode::Screen);
        let accent = traits.kind.accent();

        for (scale, alpha) in [(1.3, 0.5), (1.6, 0.35), (1.9, 0.2)] {
            layer.push(grid.circle(
                (head.cx, head.cy),
                head.len(scale),
                Paint::stroke(rgba(accent, alpha), 1.0),
            ));
        }

        // Wave offsets follow the seed so every cat has its own interference
        let mut rng = SineRng::new(traits.seed);
        for _ in 0..3 {
            let phase = rng.next_f64() * TAU;
            let base = 15.0 + 70.0 * rng.next_f64();
            let wave: Vec<(f64, f64)> = (0..=20)
                .map(|i| {
                    let x = i as f64 * 5.0;
                    (x, base + 3.0 * (x / 8.0 + phase).sin())
                })
                .collect();
            layer.push(grid.polyline(&wave, rgba(accent, 0.4), 0.8));
        }

        layer.push(grid.text(head.at(1.1, -1.1), head.len(0.4), "ψ", rgba(accent, 0.8)));
        layer
    }
}

/// Fur colour, translucent for ghost-patterned cats
fn fur_fill(traits: &CatTraits) -> Rgba {
    if traits.pattern == Pattern::Ghost {
        rgba(traits.fur_color.rgb(), 0.6)
    } else {
        rgb(traits.fur_color.rgb())
    }
}

fn markings(layer: &mut DrawLayer, grid: &Grid, region: Region, traits: &CatTraits) {
    let mark = rgb(traits.fur_color.marking());
    let accent = rgb(traits.kind.accent());

    match traits.pattern {
        Pattern::Solid | Pattern::Ghost => {}
        Pattern::Tabby => {
            for dx in [-0.5, 0.0, 0.5] {
                layer.push(grid.line(region.at(dx, -0.7), region.at(dx * 0.7, 0.5), mark, 1.0));
            }
        }
        Pattern::Striped => {
            for dy in [-0.6, -0.1, 0.4] {
                layer.push(grid.polyline(
                    &[region.at(-0.9, dy), region.at(-0.3, dy + 0.2), region.at(0.3, dy + 0.2), region.at(0.9, dy)],
                    mark,
                    1.0,
                ));
            }
        }
        Pattern::Tuxedo => layer.push(grid.ellipse(
            region.at(0.0, 0.4),
            region.rx * 0.5,
            region.ry * 0.6,
            Paint::fill(rgb([0xF5, 0xF5, 0xF5])),
        )),
        Pattern::Calico | Pattern::Tortoiseshell => {
            let (first, second) = if traits.pattern == Pattern::Calico {
                ([0xE6, 0x7E, 0x22], [0x2C, 0x2C, 0x2C])
            } else {
                ([0x8B, 0x45, 0x13], [0x1C, 0x1C, 0x1C])
            };
            layer.push(grid.ellipse(region.at(-0.45, -0.2), region.rx * 0.35, region.ry * 0.45, Paint::fill(rgb(first))));
            layer.push(grid.ellipse(region.at(0.5, 0.25), region.rx * 0.3, region.ry * 0.4, Paint::fill(rgb(second))));
        }
        Pattern::Spotted => {
            for (dx, dy) in [(-0.5, -0.3), (0.1, 0.2), (0.55, -0.4), (-0.2, 0.6)] {
                layer.push(grid.circle(region.at(dx, dy), region.rx.min(region.ry) * 0.18, Paint::fill(mark)));
            }
        }
        Pattern::Circuit => {
            layer.push(grid.polyline(
                &[region.at(-0.8, 0.3), region.at(-0.3, 0.3), region.at(-0.3, -0.4), region.at(0.4, -0.4)],
                accent,
                0.6,
            ));
            layer.push(grid.polyline(&[region.at(0.1, 0.6), region.at(0.7, 0.6), region.at(0.7, 0.0)], accent, 0.6));
            for (dx, dy) in [(0.4, -0.4), (0.7, 0.0), (-0.8, 0.3)] {
                layer.push(grid.circle(region.at(dx, dy), 0.8, Paint::fill(accent)));
            }
        }
        Pattern::Waveform => {
            let wave: Vec<(f64, f64)> = (0..=12)
                .map(|i| {
                    let t = i as f64 / 12.0;
                    region.at(-0.9 + 1.8 * t, 0.4 * (t * TAU * 1.5).sin())
                })
                .collect();
            layer.push(grid.polyline(&wave, accent, 0.8));
        }
        Pattern::Blockchain => {
            for i in 0..3 {
                let dx = -0.7 + 0.55 * i as f64;
                layer.push(grid.rect(
                    region.at(dx, -0.25),
                    region.rx * 0.3,
                    region.ry * 0.5,
                    Paint::stroke(accent, 0.6),
                ));
                if i > 0 {
                    layer.push(grid.line(region.at(dx - 0.25, 0.0), region.at(dx, 0.0), accent, 0.5));
                }
            }
        }
    }
}

/// Points on an arc around the head, angles in radians
fn arc(head: Head, scale: f64, from: f64, to: f64, segments: u32) -> Vec<(f64, f64)> {
    (0..=segments)
        .map(|i| {
            let a = from + (to - from) * i as f64 / segments as f64;
            head.at(scale * a.cos(), scale * a.sin())
        })
        .collect()
}

/// Four-pointed star
fn sparkle(x: f64, y: f64, r: f64) -> Vec<(f64, f64)> {
    let inner = r * 0.3;
    vec![
        (x, y - r),
        (x + inner, y - inner),
        (x + r, y),
        (x + inner, y + inner),
        (x, y + r),
        (x - inner, y + inner),
        (x - r, y),
        (x - inner, y - inner),
    ]
}

/// Recolour every command through a palette, keeping alpha
pub fn apply_palette(drawing: &mut Drawing, palette: Palette) {
    if palette == Palette::Natural {
        return;
    }
    let adjust_paint = |paint: &mut Paint| {
        if let Some(fill) = paint.fill.as_mut() {
            *fill = palette.adjust_rgba(*fill);
        }
        if let Some(stroke) = paint.stroke.as_mut() {
            stroke.color = palette.adjust_rgba(stroke.color);
        }
    };

    for layer in &mut drawing.layers {
        for command in &mut layer.commands {
            match command {
                DrawCommand::Clear { color } | DrawCommand::Text { color, .. } => {
                    *color = palette.adjust_rgba(*color)
                }
                DrawCommand::Rect { paint, .. }
                | DrawCommand::Circle { paint, .. }
                | DrawCommand::Ellipse { paint, .. }
                | DrawCommand::Polygon { paint, .. } => adjust_paint(paint),
                DrawCommand::Line { stroke, .. } | DrawCommand::Polyline { stroke, .. } => {
                    stroke.color = palette.adjust_rgba(stroke.color)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catdao_core::{Rarity, TraitGenerator};

    fn paint(request: PortraitRequest) -> Drawing {
        let traits = TraitGenerator::new().generate_for(&request);
        PortraitPainter::new().paint(&traits, &request, Palette::Natural)
    }

    fn max_y(layer: &DrawLayer) -> f64 {
        layer
            .commands
            .iter()
            .filter_map(|c| c.bounds())
            .map(|b| b[3])
            .fold(f64::MIN, f64::max)
    }

    fn colors(drawing: &Drawing) -> Vec<Rgba> {
        drawing
            .commands()
            .flat_map(|c| match c {
                DrawCommand::Clear { color } | DrawCommand::Text { color, .. } => vec![*color],
                DrawCommand::Rect { paint, .. }
                | DrawCommand::Circle { paint, .. }
                | DrawCommand::Ellipse { paint, .. }
                | DrawCommand::Polygon { paint, .. } => paint
                    .fill
                    .into_iter()
                    .chain(paint.stroke.map(|s| s.color))
                    .collect(),
                DrawCommand::Line { stroke, .. } | DrawCommand::Polyline { stroke, .. } => {
                    vec![stroke.color]
                }
            })
            .collect()
    }

    #[test]
    fn test_size_clamped() {
        assert_eq!(PortraitPainter::clamp_size(1), MIN_SIZE);
        assert_eq!(PortraitPainter::clamp_size(256), 256);
        assert_eq!(PortraitPainter::clamp_size(1 << 20), MAX_SIZE);

        let drawing = paint(PortraitRequest::new(3, CatKind::Generic, Rarity::Common).with_width(8));
        assert_eq!(drawing.width, MIN_SIZE as f64);
        assert_eq!(drawing.height, MIN_SIZE as f64);
    }

    #[test]
    fn test_deterministic() {
        for kind in CatKind::ALL {
            for seed in [1, 42, 777] {
                let request = PortraitRequest::new(seed, kind, Rarity::Legendary).with_width(200);
                assert_eq!(paint(request), paint(request));
            }
        }
    }

    #[test]
    fn test_layer_order() {
        let drawing = paint(PortraitRequest::new(42, CatKind::Generic, Rarity::Common).with_width(100));
        assert_eq!(drawing.layers[0].name, "background");
        assert_eq!(drawing.layers[1].name, "portrait");
        assert!(drawing.layer("aura").is_none());
        assert!(matches!(
            drawing.layers[0].commands[0],
            DrawCommand::Clear { .. }
        ));
    }

    #[test]
    fn test_profile_has_circle_and_no_body() {
        let request = PortraitRequest::new(42, CatKind::Generic, Rarity::Common).with_width(100);
        let full = paint(request);
        let profile = paint(request.with_profile(true));

        assert!(matches!(
            profile.layers[0].commands[0],
            DrawCommand::Circle { .. }
        ));
        // Paws reach the bottom of the full image
        assert!(max_y(full.layer("portrait").unwrap()) > 88.0);
        assert!(max_y(profile.layer("portrait").unwrap()) < 86.0);
    }

    #[test]
    fn test_unobserved_quantum_is_translucent_with_aura() {
        let request = PortraitRequest::new(314, CatKind::Quantum, Rarity::Rare);
        let unobserved = paint(request);
        let observed = paint(request.with_observed(true));

        let portrait = unobserved.layer("portrait").unwrap();
        assert_eq!(portrait.opacity, GHOST_OPACITY);
        let aura = unobserved.layer("aura").unwrap();
        assert_eq!(aura.blend, BlendMode::Screen);

        assert_eq!(observed.layer("portrait").unwrap().opacity, 1.0);
        assert!(observed.layer("aura").is_none());
    }

    #[test]
    fn test_unobserved_schrodinger_is_closed_box() {
        let request = PortraitRequest::new(77, CatKind::Schrodinger, Rarity::Epic);
        let is_question = |c: &DrawCommand| {
            matches!(c, DrawCommand::Text { content, .. } if content == "?")
        };

        let sealed = paint(request);
        assert!(sealed.commands().any(is_question));
        assert!(sealed.layer("accessories").is_none());

        let observed = paint(request.with_observed(true));
        assert!(!observed.commands().any(is_question));
    }

    #[test]
    fn test_full_image_has_title() {
        let drawing = paint(PortraitRequest::new(42, CatKind::Bitcoin, Rarity::Common));
        assert!(drawing.commands().any(|c| matches!(
            c,
            DrawCommand::Text { content, .. } if content == "Bitcoin Cat #42"
        )));
    }

    #[test]
    fn test_scaling_preserves_layout() {
        let small = paint(PortraitRequest::new(9, CatKind::Cypherpunk, Rarity::Rare).with_width(100));
        let large = paint(PortraitRequest::new(9, CatKind::Cypherpunk, Rarity::Rare).with_width(200));

        assert_eq!(small.command_count(), large.command_count());
        let (a, b) = (small.layer("portrait").unwrap(), large.layer("portrait").unwrap());
        assert!((max_y(b) - 2.0 * max_y(a)).abs() < 1e-6);
    }

    #[test]
    fn test_palette_applied() {
        let request = PortraitRequest::new(42, CatKind::Bitcoin, Rarity::Legendary);
        let traits = TraitGenerator::new().generate_for(&request);
        let drawing = PortraitPainter::new().paint(&traits, &request, Palette::Monochrome);

        for [r, g, b, _] in colors(&drawing) {
            assert!(r == g && g == b);
        }
    }
}
