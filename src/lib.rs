// Library exports for the fontbook binary and its integration tests.
//
// The registry, shaping and rendering live in the member crates:
//   - `fontbook-fonts`: `FontBook`, fallback chain, grapheme shaper, OpenType backend
//   - `fontbook-render`: glyph atlas coordinator and CPU shelf rasterizer
//   - `fontbook-config`: YAML configuration
//
// This crate only wires them together for the command line.

/// Application version (root crate version).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod commands;
pub mod debug;
pub mod setup;
