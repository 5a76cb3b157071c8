//! ASCII portrait parts
//!
//! Heads and bodies are built from fixed 13-column row templates so parts
//! stack without realignment. Every character carries an [`Ink`] role that
//! the renderer resolves to a colour once traits and palette are known.

use catdao_core::{
    Accessory, CatKind, CatTraits, EarShape, Expression, EyeStyle, FurLength, Pattern, TailType,
};

/// Width of head and body templates
pub const HEAD_WIDTH: usize = 13;
/// Columns reserved right of the body for the tail
pub const TAIL_WIDTH: usize = 4;
/// Columns reserved left of the body for held items
pub const SIDE_WIDTH: usize = 4;
/// Width of a composed portrait sprite
pub const SPRITE_WIDTH: usize = SIDE_WIDTH + HEAD_WIDTH + TAIL_WIDTH;

/// Colour role of a sprite character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ink {
    /// Outline and coat
    Fur,
    /// Pattern marks and whiskers
    Marking,
    Eye,
    /// Nose and mouth
    Feature,
    Accessory(Accessory),
    /// Kind accent (boxes, auras)
    Accent,
    /// Special-trait sparkle
    Sparkle,
}

/// One coloured character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub ink: Ink,
}

/// A grid of optional glyphs; `None` is transparent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    width: usize,
    rows: Vec<Vec<Option<Glyph>>>,
}

impl Sprite {
    /// Create an empty sprite of the given width
    pub fn new(width: usize) -> Self {
        Self {
            width,
            rows: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Append a row; spaces stay transparent
    pub fn push_row(&mut self, text: &str, ink: Ink) -> usize {
        self.rows.push(vec![None; self.width]);
        let y = self.rows.len() - 1;
        self.put_str(0, y, text, ink);
        y
    }

    /// Append a transparent row
    pub fn push_blank(&mut self) -> usize {
        self.rows.push(vec![None; self.width]);
        self.rows.len() - 1
    }

    /// Set a glyph; out-of-bounds writes are ignored
    pub fn put(&mut self, x: usize, y: usize, ch: char, ink: Ink) {
        if let Some(cell) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *cell = if ch == ' ' { None } else { Some(Glyph { ch, ink }) };
        }
    }

    /// Write a string starting at `x`; spaces leave existing glyphs alone
    pub fn put_str(&mut self, x: usize, y: usize, text: &str, ink: Ink) {
        for (i, ch) in text.chars().enumerate() {
            if ch != ' ' {
                self.put(x + i, y, ch, ink);
            }
        }
    }

    /// Recolour the glyphs in `x0..=x1` on row `y`
    pub fn paint(&mut self, x0: usize, x1: usize, y: usize, ink: Ink) {
        if let Some(row) = self.rows.get_mut(y) {
            for glyph in row.iter_mut().take(x1 + 1).skip(x0).flatten() {
                glyph.ink = ink;
            }
        }
    }

    /// Copy another sprite in at an offset
    pub fn blit(&mut self, other: &Sprite, x: usize, y: usize) {
        for (dy, row) in other.rows.iter().enumerate() {
            for (dx, glyph) in row.iter().enumerate() {
                if let Some(g) = glyph {
                    self.put(x + dx, y + dy, g.ch, g.ink);
                }
            }
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Glyph> {
        self.rows.get(y).and_then(|row| row.get(x)).copied().flatten()
    }

    /// Row `y` as text, transparent cells as spaces
    pub fn row_text(&self, y: usize) -> String {
        self.rows
            .get(y)
            .map(|row| row.iter().map(|g| g.map(|g| g.ch).unwrap_or(' ')).collect())
            .unwrap_or_default()
    }

    /// Iterate glyphs with positions
    pub fn glyphs(&self) -> impl Iterator<Item = (usize, usize, Glyph)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(x, g)| g.map(|g| (x, y, g)))
        })
    }
}

/// Where an accessory is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Own row above the ears
    Crown,
    /// Replaces the ears row
    Ears,
    /// Replaces the eyes row
    Eyes,
    /// Hung beside the face
    Cheek,
    /// Own row below the chin
    Neck,
    /// Held left of the body
    Side,
}

/// Placement of an accessory
pub fn placement(accessory: Accessory) -> Placement {
    match accessory {
        Accessory::TopHat | Accessory::Crown | Accessory::Halo => Placement::Crown,
        Accessory::Hoodie | Accessory::Headphones => Placement::Ears,
        Accessory::Shades => Placement::Eyes,
        Accessory::QubitEarring => Placement::Cheek,
        Accessory::Collar
        | Accessory::Bell
        | Accessory::Bowtie
        | Accessory::CoinPendant
        | Accessory::GoldChain => Placement::Neck,
        Accessory::Vial | Accessory::GeigerCounter => Placement::Side,
    }
}

/// Display colour of an accessory
pub fn accessory_color(accessory: Accessory) -> [u8; 3] {
    match accessory {
        Accessory::Collar => [0xD0, 0x30, 0x30],
        Accessory::Bell | Accessory::Crown | Accessory::GoldChain => [0xFF, 0xC8, 0x30],
        Accessory::Bowtie => [0x30, 0x60, 0xD0],
        Accessory::TopHat | Accessory::Shades => [0x50, 0x50, 0x58],
        Accessory::CoinPendant => [0xF7, 0x93, 0x1A],
        Accessory::Hoodie => [0x30, 0x30, 0x40],
        Accessory::Headphones => [0x00, 0xFF, 0x9C],
        Accessory::Halo => [0xFF, 0xF4, 0xA0],
        Accessory::QubitEarring => [0x7B, 0x61, 0xFF],
        Accessory::Vial => [0x60, 0xFF, 0x60],
        Accessory::GeigerCounter => [0xE0, 0xD0, 0x20],
    }
}

/// Builds portrait sprites from traits
#[derive(Debug, Clone, Copy, Default)]
pub struct SpriteGenerator;

impl SpriteGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Compose the portrait for a trait set
    ///
    /// Profile portraits stop at the chin and carry headwear only.
    pub fn portrait(&self, traits: &CatTraits, profile: bool) -> Sprite {
        let mut sprite = Sprite::new(SPRITE_WIDTH);

        let head = self.head(traits, profile);
        sprite.rows.resize(head.height(), vec![None; SPRITE_WIDTH]);
        sprite.blit(&head, SIDE_WIDTH, 0);

        if traits.special {
            let ears: usize = CROWN_ITEMS
                .iter()
                .filter(|item| traits.has(**item))
                .map(|item| crown_rows(*item).len())
                .sum();
            sprite.put(SIDE_WIDTH - 2, ears, '*', Ink::Sparkle);
            sprite.put(SIDE_WIDTH + HEAD_WIDTH + 1, ears, '*', Ink::Sparkle);
            sprite.put(SIDE_WIDTH - 1, ears + 3, '+', Ink::Sparkle);
            sprite.put(SIDE_WIDTH + HEAD_WIDTH, ears + 3, '+', Ink::Sparkle);
        }

        if profile {
            return sprite;
        }

        let top = sprite.height();
        let body = self.body(traits);
        for _ in 0..body.height() {
            sprite.push_blank();
        }
        sprite.blit(&body, SIDE_WIDTH, top);

        for (i, line) in tail_rows(traits.tail_type).iter().enumerate() {
            sprite.put_str(SIDE_WIDTH + HEAD_WIDTH, top + 1 + i, line, Ink::Fur);
        }

        if let Some(&item) = traits
            .accessories
            .iter()
            .find(|a| placement(**a) == Placement::Side)
        {
            sprite.put_str(0, top + 2, side_row(item), Ink::Accessory(item));
        }

        sprite
    }

    /// Head rows: crown items, ears, eyes, nose, mouth, chin and neck items
    pub fn head(&self, traits: &CatTraits, profile: bool) -> Sprite {
        let mut head = Sprite::new(HEAD_WIDTH);
        let worn: Vec<Accessory> = traits
            .accessories
            .iter()
            .copied()
            .filter(|a| !profile || a.is_headwear())
            .collect();

        // Halo floats above everything else
        for item in CROWN_ITEMS {
            if worn.contains(&item) {
                for line in crown_rows(item) {
                    head.push_row(line, Ink::Accessory(item));
                }
            }
        }

        let ears = if worn.contains(&Accessory::Hoodie) {
            head.push_row(" _/‾‾‾‾‾‾‾\\_ ", Ink::Accessory(Accessory::Hoodie))
        } else {
            head.push_row(ears_row(traits.ear_shape), Ink::Fur)
        };

        let eyes = head.push_row(" /         \\ ", Ink::Fur);
        if worn.contains(&Accessory::Shades) {
            head.put_str(3, eyes, "(▀)-(▀)", Ink::Accessory(Accessory::Shades));
        } else if traits.eye_style == EyeStyle::Visor {
            head.put_str(3, eyes, "[=====]", Ink::Eye);
        } else {
            let eye = eye_char(traits.eye_style);
            head.put(4, eyes, eye, Ink::Eye);
            head.put(8, eyes, eye, Ink::Eye);
        }
        if worn.contains(&Accessory::QubitEarring) {
            head.put(12, eyes, 'φ', Ink::Accessory(Accessory::QubitEarring));
        }
        if worn.contains(&Accessory::Headphones) {
            let ink = Ink::Accessory(Accessory::Headphones);
            head.put(0, eyes, '@', ink);
            head.put(12, eyes, '@', ink);
            head.put_str(2, ears, "(", ink);
            head.put_str(10, ears, ")", ink);
        }

        let nose = head.push_row(nose_row(traits.fur_length), Ink::Fur);
        head.paint(3, 9, nose, Ink::Marking);
        head.put(6, nose, '^', Ink::Feature);

        let mouth = head.push_row(" \\         / ", Ink::Fur);
        head.put_str(4, mouth, mouth_part(traits.expression), Ink::Feature);

        head.push_row("  '-------'  ", Ink::Fur);

        for item in worn.iter().filter(|a| placement(**a) == Placement::Neck) {
            head.push_row(neck_row(*item), Ink::Accessory(*item));
        }

        head
    }

    /// Body rows with the coat pattern filled in
    pub fn body(&self, traits: &CatTraits) -> Sprite {
        let mut body = Sprite::new(HEAD_WIDTH);
        let (left, right) = match traits.fur_length {
            FurLength::Short | FurLength::Medium => ('|', '|'),
            FurLength::Long | FurLength::Fluffy => ('{', '}'),
        };

        body.push_row(" /         \\ ", Ink::Fur);
        for _ in 0..2 {
            let y = body.push_blank();
            body.put(0, y, left, Ink::Fur);
            body.put(12, y, right, Ink::Fur);
        }
        body.push_row(" \\_(_)_(_)_/ ", Ink::Fur);

        for y in 0..3 {
            for x in 0..9 {
                if let Some(ch) = pattern_char(traits.pattern, x, y) {
                    body.put(2 + x, y, ch, Ink::Marking);
                }
            }
        }

        body
    }

    /// The closed box shown in place of an unobserved Schrödinger cat
    pub fn sealed_box(&self) -> Sprite {
        let mut sprite = Sprite::new(SPRITE_WIDTH);
        let x = SIDE_WIDTH;
        for line in [
            "┌───────────┐",
            "│           │",
            "│     ?     │",
            "│           │",
            "└───────────┘",
        ] {
            let y = sprite.push_blank();
            sprite.put_str(x, y, line, Ink::Accent);
        }
        sprite.put(x + 6, 2, '?', Ink::Sparkle);
        sprite
    }

    /// Portrait or sealed box, whichever the traits call for
    pub fn for_traits(&self, traits: &CatTraits, profile: bool) -> Sprite {
        if traits.kind == CatKind::Schrodinger && traits.is_unobserved() {
            self.sealed_box()
        } else {
            self.portrait(traits, profile)
        }
    }
}

/// Items stacked above the ears, top first
const CROWN_ITEMS: [Accessory; 3] = [Accessory::Halo, Accessory::TopHat, Accessory::Crown];

fn crown_rows(item: Accessory) -> &'static [&'static str] {
    match item {
        Accessory::Halo => &["    .-=-.    "],
        Accessory::TopHat => &["     ___     ", "    |___|    "],
        Accessory::Crown => &["   .^.^.^.   "],
        _ => &[],
    }
}

fn ears_row(shape: EarShape) -> &'static str {
    match shape {
        EarShape::Pointed => "  /\\_____/\\  ",
        EarShape::Rounded => "  (\\_____/)  ",
        EarShape::Folded => "  -\\_____/-  ",
        EarShape::Tufted => " ,/\\_____/\\, ",
    }
}

fn eye_char(style: EyeStyle) -> char {
    match style {
        EyeStyle::Round => 'o',
        EyeStyle::Almond => '0',
        EyeStyle::Sleepy => '-',
        EyeStyle::Wide => 'O',
        EyeStyle::Slit => '|',
        EyeStyle::Laser => '#',
        EyeStyle::Visor => '=',
        EyeStyle::Glowing => '*',
        EyeStyle::Hollow => '.',
    }
}

fn nose_row(length: FurLength) -> &'static str {
    match length {
        FurLength::Short => "(  =  ^  =  )",
        FurLength::Medium => "{  =  ^  =  }",
        FurLength::Long => "{{ =  ^  = }}",
        FurLength::Fluffy => "{{{=  ^  =}}}",
    }
}

fn mouth_part(expression: Expression) -> &'static str {
    match expression {
        Expression::Happy => "\\_w_/",
        Expression::Curious => " .o. ",
        Expression::Grumpy => " --- ",
        Expression::Smug => " ~w' ",
        Expression::Sleepy => " zzZ ",
        Expression::Surprised => " (O) ",
        Expression::Mischievous => " >w< ",
    }
}

fn neck_row(item: Accessory) -> &'static str {
    match item {
        Accessory::Collar => "    ==o==    ",
        Accessory::Bell => "    --@--    ",
        Accessory::Bowtie => "     >o<     ",
        Accessory::CoinPendant => "   --(B)--   ",
        Accessory::GoldChain => "   ~~~$~~~   ",
        _ => "",
    }
}

fn side_row(item: Accessory) -> &'static str {
    match item {
        Accessory::Vial => " [~]",
        Accessory::GeigerCounter => "[:.]",
        _ => "",
    }
}

fn tail_rows(tail: TailType) -> [&'static str; 3] {
    match tail {
        TailType::Straight => ["   |", "   |", "___/"],
        TailType::Curled => [" __ ", "(  )", "_/  "],
        TailType::Fluffy => [" {{}", "{{} ", "{}  "],
        TailType::Bobbed => ["    ", "    ", "o   "],
        TailType::Zigzag => ["   /", "  \\ ", "_/  "],
        TailType::Forked => ["\\ / ", " Y  ", "/   "],
    }
}

/// Pattern mark at body fill position `(x, y)`, `x < 9`, `y < 3`
pub fn pattern_char(pattern: Pattern, x: usize, y: usize) -> Option<char> {
    match pattern {
        Pattern::Solid => None,
        Pattern::Tabby => (y % 2 == 1).then_some('~'),
        Pattern::Tuxedo => (3..=5).contains(&x).then_some('▒'),
        Pattern::Calico => match (x + 2 * y) % 3 {
            0 => Some('o'),
            1 => Some('.'),
            _ => None,
        },
        Pattern::Spotted => ((x * 3 + y * 5) % 4 == 0).then_some('•'),
        Pattern::Striped => (x % 2 == 0).then_some('|'),
        Pattern::Tortoiseshell => Some(if (x + y) % 2 == 0 { '%' } else { ':' }),
        Pattern::Circuit => match (y % 2, x % 3) {
            (0, 0) => Some('+'),
            (0, _) => Some('-'),
            (_, 0) => Some('|'),
            _ => None,
        },
        Pattern::Waveform => ((x + y * 2) % 4 < 2).then_some('∿'),
        Pattern::Blockchain => (y % 2 == 0).then(|| ['[', '#', ']'][x % 3]),
        Pattern::Ghost => Some('░'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catdao_core::{Rarity, Seed, TraitGenerator};

    fn traits(kind: CatKind, seed: i64) -> CatTraits {
        TraitGenerator::new().generate(Seed::new(seed), kind, Rarity::Legendary)
    }

    #[test]
    fn test_templates_are_head_width() {
        let shapes = [
            EarShape::Pointed,
            EarShape::Rounded,
            EarShape::Folded,
            EarShape::Tufted,
        ];
        for shape in shapes {
            assert_eq!(ears_row(shape).chars().count(), HEAD_WIDTH);
        }
        for length in FurLength::ALL {
            assert_eq!(nose_row(length).chars().count(), HEAD_WIDTH);
        }
        for expression in Expression::ALL {
            assert_eq!(mouth_part(expression).chars().count(), 5);
        }
        for item in [
            Accessory::Collar,
            Accessory::Bell,
            Accessory::Bowtie,
            Accessory::CoinPendant,
            Accessory::GoldChain,
        ] {
            assert_eq!(neck_row(item).chars().count(), HEAD_WIDTH);
        }
        for item in [Accessory::Halo, Accessory::TopHat, Accessory::Crown] {
            assert!(crown_rows(item).iter().all(|r| r.chars().count() == HEAD_WIDTH));
        }
    }

    #[test]
    fn test_tail_rows_fit() {
        let tails = [
            TailType::Straight,
            TailType::Curled,
            TailType::Fluffy,
            TailType::Bobbed,
            TailType::Zigzag,
            TailType::Forked,
        ];
        for tail in tails {
            assert!(tail_rows(tail).iter().all(|r| r.chars().count() == TAIL_WIDTH));
        }
    }

    #[test]
    fn test_sprite_put_and_blit() {
        let mut inner = Sprite::new(3);
        inner.push_row("a c", Ink::Fur);

        let mut outer = Sprite::new(5);
        outer.push_row("xxxxx", Ink::Marking);
        outer.blit(&inner, 1, 0);

        assert_eq!(outer.row_text(0), "xaxcx");
        assert_eq!(outer.get(1, 0).unwrap().ink, Ink::Fur);
        assert_eq!(outer.get(2, 0).unwrap().ink, Ink::Marking);

        // Ignored, not a panic
        outer.put(10, 10, 'z', Ink::Fur);
    }

    #[test]
    fn test_profile_has_no_body() {
        let generator = SpriteGenerator::new();
        let t = traits(CatKind::Generic, 42);
        let profile = generator.portrait(&t, true);
        let full = generator.portrait(&t, false);

        assert!(full.height() > profile.height());
        assert!(!(0..profile.height()).any(|y| profile.row_text(y).contains("(_)")));
        assert!((0..full.height()).any(|y| full.row_text(y).contains("(_)")));
    }

    #[test]
    fn test_profile_drops_non_headwear() {
        let generator = SpriteGenerator::new();
        let mut t = traits(CatKind::Generic, 7);
        t.accessories = vec![Accessory::Collar, Accessory::Crown];

        let profile = generator.head(&t, true);
        let text: Vec<String> = (0..profile.height()).map(|y| profile.row_text(y)).collect();
        assert!(text.iter().any(|r| r.contains(".^.^.^.")));
        assert!(!text.iter().any(|r| r.contains("==o==")));

        let full = generator.head(&t, false);
        assert_eq!(full.height(), profile.height() + 1);
    }

    #[test]
    fn test_eye_styles() {
        let generator = SpriteGenerator::new();
        let mut t = traits(CatKind::Cypherpunk, 3);
        t.accessories.clear();

        t.eye_style = EyeStyle::Visor;
        let head = generator.head(&t, false);
        assert!(head.row_text(1).contains("[=====]"));

        t.eye_style = EyeStyle::Slit;
        let head = generator.head(&t, false);
        assert_eq!(head.get(4, 1).map(|g| g.ch), Some('|'));
        assert_eq!(head.get(4, 1).map(|g| g.ink), Some(Ink::Eye));
    }

    #[test]
    fn test_sealed_box_for_unobserved_schrodinger() {
        let generator = SpriteGenerator::new();
        let t = traits(CatKind::Schrodinger, 11);
        assert!(t.is_unobserved());

        let sprite = generator.for_traits(&t, false);
        assert_eq!(sprite, generator.sealed_box());
        assert!(sprite.row_text(2).contains('?'));
    }

    #[test]
    fn test_special_sparkles() {
        let generator = SpriteGenerator::new();
        let t = traits(CatKind::Generic, 5);
        assert!(t.special);
        let sprite = generator.portrait(&t, false);
        assert!(sprite.glyphs().any(|(_, _, g)| g.ink == Ink::Sparkle));
    }

    #[test]
    fn test_pattern_chars() {
        assert_eq!(pattern_char(Pattern::Solid, 0, 0), None);
        assert_eq!(pattern_char(Pattern::Ghost, 4, 2), Some('░'));
        assert_eq!(pattern_char(Pattern::Blockchain, 1, 0), Some('#'));
        assert_eq!(pattern_char(Pattern::Blockchain, 1, 1), None);
    }
}
