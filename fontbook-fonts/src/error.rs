//! Typed error types for fontbook-fonts.
//!
//! Ordinary lookup misses never surface here: an absent code point or a
//! glyph that fails to load is substituted inside the shaper. What remains
//! are registration failures (unreadable or unparsable sources) and the
//! fatal conditions where a registered font can no longer produce even its
//! missing glyph.

use thiserror::Error;

use crate::font_book::FontId;

/// Error type for font registration and glyph resolution.
#[derive(Debug, Error)]
pub enum FontError {
    /// The font file could not be read from disk.
    #[error("Font file read failed for '{path}': {source}")]
    Io {
        /// Path to the font file that could not be read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The bytes could not be parsed as a supported font format.
    #[error("Invalid font data in '{source_name}': {reason}")]
    InvalidFont {
        /// Display name of the byte source.
        source_name: String,
        /// Human-readable parser message.
        reason: String,
    },

    /// Glyph 0 (the missing glyph) failed to load.
    ///
    /// Every font must provide a loadable glyph 0; when it does not the
    /// font asset is corrupt and no further substitution is possible.
    #[error("Missing glyph 0 could not be loaded from font {font}: font asset is corrupt")]
    MissingGlyph {
        /// Font whose glyph 0 failed to load.
        font: FontId,
    },

    /// A font that was described successfully at registration could not be
    /// opened again when its glyphs were first requested.
    #[error("Registered font {font} could not be re-opened: {reason}")]
    FontLoad {
        /// Font that failed to open.
        font: FontId,
        /// Human-readable loader message.
        reason: String,
    },

    /// A font handle that was not issued by this registry.
    #[error("Unknown font handle {0}")]
    UnknownFont(FontId),
}

impl FontError {
    /// Whether the error leaves the font unusable.
    ///
    /// Hosts are expected to stop rendering with the affected font set
    /// (terminate, or swap in an entirely different set of fonts).
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FontError::MissingGlyph { .. } | FontError::FontLoad { .. }
        )
    }
}
