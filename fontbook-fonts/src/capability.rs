//! The per-format font interface.
//!
//! A font format plugs into fontbook by implementing `FontCapability`
//! (three primitive lookups plus optional kerning/morph hooks) and a
//! `FontLoader` that turns a `FontSource` into a capability object. All
//! shaping logic is written once against this trait.

use std::sync::Arc;

use crate::error::FontError;
use crate::font_book::{FontDescription, FontSource};
use crate::glyph::{GlyphIndex, GlyphMetrics, GlyphOutline};

/// Result of a character-map query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharMapLookup {
    /// The code point maps to this (non-zero) glyph.
    Found(GlyphIndex),
    /// The font has no glyph for the code point.
    NotFound,
    /// The character map itself could not be parsed.
    ParseError,
}

impl CharMapLookup {
    /// Interpret the raw convention used by table parsers:
    /// positive = glyph index, 0 = not present, negative = parse error.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            r if r < 0 => CharMapLookup::ParseError,
            0 => CharMapLookup::NotFound,
            r => match u16::try_from(r) {
                Ok(index) => CharMapLookup::Found(GlyphIndex(index)),
                Err(_) => CharMapLookup::ParseError,
            },
        }
    }

    /// The glyph index, if one was found.
    pub fn glyph(self) -> Option<GlyphIndex> {
        match self {
            CharMapLookup::Found(index) => Some(index),
            CharMapLookup::NotFound | CharMapLookup::ParseError => None,
        }
    }
}

/// Which operations a font actually backs with data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapabilitySet {
    pub character_map: bool,
    pub outlines: bool,
    pub metrics: bool,
    pub kerning: bool,
    pub morphing: bool,
}

impl CapabilitySet {
    /// Character map, outlines and metrics are all present.
    pub fn is_complete(&self) -> bool {
        self.character_map && self.outlines && self.metrics
    }
}

/// Glyph access for one opened font, implemented once per font format.
pub trait FontCapability: Send + Sync {
    /// Metadata captured when the font is registered.
    fn describe(&self) -> FontDescription;

    /// Look up the glyph for a code point. Pure; never fails for "not found".
    fn search_character_map(&self, code_point: char) -> CharMapLookup;

    /// Load the outline of a glyph. Returns `None` on failure, never a partial outline.
    fn load_glyph(&self, glyph: GlyphIndex) -> Option<GlyphOutline>;

    /// Load the metrics of a glyph, independently of its outline.
    fn load_glyph_metrics(&self, glyph: GlyphIndex) -> Option<GlyphMetrics>;

    /// Pair kerning in font units, when the format has kerning tables.
    fn kerning(&self, _left: GlyphIndex, _right: GlyphIndex) -> Option<f32> {
        None
    }

    /// One-to-one contextual substitution from the font's morph tables.
    fn substitute_glyphs(&self, _glyphs: &mut [GlyphIndex]) {}
}

/// Factory turning byte sources into capability objects for a detected format.
pub trait FontLoader: Send + Sync {
    /// Open `source`. Called once at registration and again, lazily, when
    /// glyphs are first requested.
    fn open(&self, source: &FontSource) -> Result<Arc<dyn FontCapability>, FontError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_distinguishes_parse_error() {
        assert_eq!(CharMapLookup::from_raw(-1), CharMapLookup::ParseError);
        assert_eq!(CharMapLookup::from_raw(0), CharMapLookup::NotFound);
        assert_eq!(
            CharMapLookup::from_raw(42),
            CharMapLookup::Found(GlyphIndex(42))
        );
        assert_eq!(CharMapLookup::from_raw(70_000), CharMapLookup::ParseError);
    }

    #[test]
    fn test_glyph_only_for_found() {
        assert_eq!(
            CharMapLookup::Found(GlyphIndex(5)).glyph(),
            Some(GlyphIndex(5))
        );
        assert_eq!(CharMapLookup::NotFound.glyph(), None);
        assert_eq!(CharMapLookup::ParseError.glyph(), None);
    }
}
