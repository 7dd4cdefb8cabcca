//! Glyph atlas coordination for fontbook.
//!
//! `GlyphAtlas` caches rendered glyph images per (font, glyph index) and
//! calls a `GlyphRenderer` on misses, rendering each key once even under
//! concurrent first requests. `ShelfRasterizer` is a CPU renderer that
//! packs coverage masks into a single RGBA page.

pub mod atlas;
pub mod error;
pub mod rasterizer;

pub use atlas::{AtlasStats, GlyphAtlas, GlyphKey, GlyphRenderer};
pub use error::RenderError;
pub use rasterizer::{AtlasSlot, DEFAULT_PADDING, DEFAULT_PAGE_SIZE, ShelfRasterizer};
