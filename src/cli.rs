//! Command-line interface for fontbook.
//!
//! Global flags configure font discovery and logging; each subcommand is a
//! query against the assembled `FontBook`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// fontbook - inspect font families, fallback resolution and glyph shaping
#[derive(Parser, Debug)]
#[command(name = "fontbook")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use instead of ~/.config/fontbook/config.yaml
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Extra directory to scan for fonts (repeatable)
    #[arg(long = "font-dir", value_name = "DIR", global = true)]
    pub font_dirs: Vec<PathBuf>,

    /// Skip the platform's installed fonts
    #[arg(long, global = true)]
    pub no_system_fonts: bool,

    /// Debug log level (off, error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", global = true, value_parser = parse_log_level)]
    pub log_level: Option<log::LevelFilter>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// List registered families and their populated variant slots
    Families,

    /// Show which family and font a request resolves to
    Resolve {
        /// Requested family name
        family: String,

        /// Numeric weight (100-900)
        #[arg(long, default_value_t = 400)]
        weight: u16,

        /// Request an italic face
        #[arg(long)]
        italic: bool,
    },

    /// Print the glyph run produced for a piece of text
    Glyphs {
        /// Requested family name
        family: String,

        /// Text to shape
        text: String,

        /// Numeric weight (100-900)
        #[arg(long, default_value_t = 400)]
        weight: u16,

        /// Request an italic face
        #[arg(long)]
        italic: bool,

        /// Rasterize each glyph into the atlas and print its slot
        #[arg(long)]
        render: bool,
    },
}

fn parse_log_level(value: &str) -> Result<log::LevelFilter, String> {
    value.parse::<log::LevelFilter>().map_err(|_| {
        format!("invalid log level '{value}', expected off, error, warn, info, debug or trace")
    })
}
