//! Typed error types for fontbook-render.

use fontbook_fonts::{FontError, Glyph};
use thiserror::Error;

/// Error type for glyph rendering and atlas placement.
#[derive(Debug, Error)]
pub enum RenderError {
    // -----------------------------------------------------------------------
    // Glyph data
    // -----------------------------------------------------------------------
    /// The font could not produce the outline or metrics of a glyph.
    #[error("Glyph {} of {} has no renderable outline or metrics", glyph.index.0, glyph.font)]
    GlyphUnavailable {
        /// Glyph that could not be loaded.
        glyph: Glyph,
    },

    /// A fatal font error surfaced while loading glyph data.
    #[error(transparent)]
    Font(#[from] FontError),

    // -----------------------------------------------------------------------
    // Atlas space
    // -----------------------------------------------------------------------
    /// The atlas page has no room left for a glyph of this size.
    #[error("Atlas page {page_width}x{page_height} is full: cannot place {width}x{height} glyph")]
    AtlasFull {
        /// Glyph bitmap width in pixels.
        width: u32,
        /// Glyph bitmap height in pixels.
        height: u32,
        /// Atlas page width in pixels.
        page_width: u32,
        /// Atlas page height in pixels.
        page_height: u32,
    },
}

impl RenderError {
    /// Whether the underlying font is unusable (see `FontError::is_fatal`).
    pub fn is_fatal(&self) -> bool {
        matches!(self, RenderError::Font(err) if err.is_fatal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fontbook_fonts::{FontId, GlyphIndex};

    #[test]
    fn test_atlas_full_message() {
        let err = RenderError::AtlasFull {
            width: 40,
            height: 52,
            page_width: 256,
            page_height: 256,
        };
        let message = err.to_string();
        assert!(message.contains("256x256"));
        assert!(message.contains("40x52"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_font_errors_keep_fatality() {
        let err: RenderError = FontError::MissingGlyph { font: FontId(1) }.into();
        assert!(err.is_fatal());

        let unavailable = RenderError::GlyphUnavailable {
            glyph: fontbook_fonts::Glyph::new(FontId(1), GlyphIndex(9)),
        };
        assert!(unavailable.to_string().contains("font #1"));
    }
}
