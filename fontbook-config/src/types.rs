//! Value types used by `Config`.

use serde::{Deserialize, Serialize};

/// Log level for the debug log file.
///
/// The `--log-level` CLI flag and the `RUST_LOG` environment variable take
/// precedence over this setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No logging (log file not created)
    #[default]
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn display_name(&self) -> &'static str {
        match self {
            LogLevel::Off => "Off",
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Geometry of the CPU glyph atlas page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AtlasConfig {
    /// Page width in pixels
    #[serde(default = "crate::defaults::atlas_size")]
    pub width: u32,

    /// Page height in pixels
    #[serde(default = "crate::defaults::atlas_size")]
    pub height: u32,

    /// Gap between packed glyphs in pixels
    #[serde(default = "crate::defaults::atlas_padding")]
    pub padding: u32,

    /// Rasterization size in pixels per em
    #[serde(default = "crate::defaults::font_size")]
    pub font_size: f32,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            width: crate::defaults::atlas_size(),
            height: crate::defaults::atlas_size(),
            padding: crate::defaults::atlas_padding(),
            font_size: crate::defaults::font_size(),
        }
    }
}
