//! Default value functions for configuration.
//!
//! Each sub-module groups related `default_*` free functions used as
//! `#[serde(default = "crate::defaults::...")]` attributes on `Config` fields.

mod atlas;
mod font;

// ── Font discovery & matching ──────────────────────────────────────────────
pub use font::{last_resort_families, load_system_fonts, max_fallback_hops};

// ── Glyph atlas ────────────────────────────────────────────────────────────
pub use atlas::{atlas_padding, atlas_size, font_size};
