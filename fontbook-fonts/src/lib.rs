//! Font registry and glyph resolution for fontbook.
//!
//! This crate provides:
//! - A narrow `FontCapability` trait that each font format implements
//! - An OpenType/TrueType backend built on `ttf-parser` (via rustybuzz)
//! - The `FontBook` registry with family/variant tables and guaranteed-resolution lookups
//! - A bounded, cycle-safe fallback chain for unknown or generic family names
//! - The default grapheme shaper (NFC attempt, NFD attempt, missing-glyph substitute)
//!
//! # Architecture
//!
//! Fonts are registered from a `FontSource` through a `FontLoader`. The
//! source is opened once to capture a `FontDescription`, then re-opened
//! lazily the first time glyphs are requested. Lookups go:
//! 1. `find_family` (direct match, fallback chain, last-resort family)
//! 2. `find_font` (exact variant slot, nearest populated slot, last-resort fonts)
//! 3. `find_glyphs` (grapheme shaper, morph substitution, kerning)

pub mod capability;
pub mod error;
pub mod font_book;
pub mod glyph;
pub mod grapheme;
pub mod opentype;
pub mod shaper;
pub mod variant;

// Re-export main types for convenience
pub use capability::{CapabilitySet, CharMapLookup, FontCapability, FontLoader};
pub use error::FontError;
pub use font_book::{
    ChainEnd, DEFAULT_MAX_HOPS, FALLBACK_CHAIN, FallbackChain, FallbackResolution, FamilyId,
    FamilyInfo, FontBook, FontDescription, FontDiscovery, FontId, FontSource, SourceIdentity,
};
pub use glyph::{
    Glyph, GlyphBounds, GlyphIndex, GlyphMetrics, GlyphOutline, GlyphRun, OutlineCommand, RunGlyph,
};
pub use grapheme::{Grapheme, graphemes};
pub use opentype::{OpenTypeFont, OpenTypeLoader};
pub use shaper::{FallbackHook, LigatureHook, NoFontFallback, NoLigatures, ShapingHooks};
pub use variant::{FontVariant, FontWeight};
