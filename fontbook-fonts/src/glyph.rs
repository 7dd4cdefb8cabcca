//! Glyph identifiers, outlines, metrics and glyph runs.

use crate::font_book::FontId;

/// Index of a glyph inside a single font.
///
/// Index 0 is reserved in every font as the missing glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GlyphIndex(pub u16);

impl GlyphIndex {
    /// The missing-glyph marker present in every font.
    pub const MISSING: GlyphIndex = GlyphIndex(0);

    /// Whether this is the missing glyph.
    pub fn is_missing(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for GlyphIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "glyph {}", self.0)
    }
}

/// A resolved glyph: which font, and which glyph inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Glyph {
    pub font: FontId,
    pub index: GlyphIndex,
}

impl Glyph {
    pub fn new(font: FontId, index: GlyphIndex) -> Self {
        Self { font, index }
    }

    /// The missing glyph of `font`.
    pub fn missing(font: FontId) -> Self {
        Self::new(font, GlyphIndex::MISSING)
    }
}

/// A glyph placed in a run, with the grapheme it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunGlyph {
    /// The resolved glyph.
    pub glyph: Glyph,
    /// Index of the source grapheme in the shaped input.
    pub grapheme: usize,
    /// Kerning adjustment (font units) between the previous glyph and this one.
    pub kerning: f32,
}

/// Ordered glyphs for a grapheme sequence.
///
/// Input order is preserved. A grapheme may contribute more than one glyph
/// (decomposed forms), so `len()` can exceed the number of graphemes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphRun {
    glyphs: Vec<RunGlyph>,
}

impl GlyphRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            glyphs: Vec::with_capacity(capacity),
        }
    }

    /// Append a glyph produced for grapheme number `grapheme`.
    pub fn push(&mut self, glyph: Glyph, grapheme: usize) {
        self.glyphs.push(RunGlyph {
            glyph,
            grapheme,
            kerning: 0.0,
        });
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RunGlyph> {
        self.glyphs.iter()
    }

    pub fn as_slice(&self) -> &[RunGlyph] {
        &self.glyphs
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [RunGlyph] {
        &mut self.glyphs
    }

    /// The glyphs without placement data.
    pub fn glyphs(&self) -> impl Iterator<Item = Glyph> + '_ {
        self.glyphs.iter().map(|g| g.glyph)
    }

    /// Glyphs that were produced for grapheme number `grapheme`.
    pub fn glyphs_for_grapheme(&self, grapheme: usize) -> impl Iterator<Item = Glyph> + '_ {
        self.glyphs
            .iter()
            .filter(move |g| g.grapheme == grapheme)
            .map(|g| g.glyph)
    }
}

impl<'a> IntoIterator for &'a GlyphRun {
    type Item = &'a RunGlyph;
    type IntoIter = std::slice::Iter<'a, RunGlyph>;

    fn into_iter(self) -> Self::IntoIter {
        self.glyphs.iter()
    }
}

/// One drawing command of a glyph outline, in font units (y up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutlineCommand {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    /// Control point, then end point.
    QuadTo(f32, f32, f32, f32),
    /// Two control points, then end point.
    CurveTo(f32, f32, f32, f32, f32, f32),
    Close,
}

/// Vector outline of a glyph.
///
/// An empty outline is valid: whitespace glyphs have no contours.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphOutline {
    pub commands: Vec<OutlineCommand>,
}

impl GlyphOutline {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Glyph bounding box in font units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphBounds {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl GlyphBounds {
    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }
}

/// Horizontal metrics of a glyph in font units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMetrics {
    pub advance_width: f32,
    pub left_side_bearing: f32,
    /// `None` for glyphs without contours.
    pub bounds: Option<GlyphBounds>,
    pub units_per_em: u16,
}

impl GlyphMetrics {
    /// Factor converting font units to pixels at `font_size` pixels per em.
    pub fn scale(&self, font_size: f32) -> f32 {
        if self.units_per_em == 0 {
            return 0.0;
        }
        font_size / f32::from(self.units_per_em)
    }
}
