//! Configuration system for fontbook.
//!
//! Loads and saves `~/.config/fontbook/config.yaml`:
//! - font directories and system font discovery
//! - last-resort fonts and families
//! - fallback-chain overrides and the hop limit
//! - glyph atlas geometry
//! - debug log level

pub mod config;
pub mod defaults;
pub mod error;
mod types;

// Re-export main types for convenience
pub use config::Config;
pub use error::ConfigError;
pub use types::{AtlasConfig, LogLevel};
