//! The `Config` struct, YAML persistence and validation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{AtlasConfig, LogLevel};

/// fontbook configuration, stored as YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    // ========================================================================
    // Font discovery
    // ========================================================================
    /// Extra directories scanned (recursively) for fonts. `~/` is expanded.
    #[serde(default)]
    pub font_directories: Vec<PathBuf>,

    /// Scan the platform's installed fonts
    #[serde(default = "crate::defaults::load_system_fonts")]
    pub load_system_fonts: bool,

    // ========================================================================
    // Family matching
    // ========================================================================
    /// Font files registered as last-resort fonts, in priority order.
    /// The family of the first one that loads becomes the last-resort family.
    #[serde(default)]
    pub last_resort_fonts: Vec<PathBuf>,

    /// Families searched among discovered fonts for a last-resort font when
    /// `last_resort_fonts` yields none.
    #[serde(default = "crate::defaults::last_resort_families")]
    pub last_resort_families: Vec<String>,

    /// Extra fallback-chain entries (family -> next family). Entries here
    /// override the built-in chain.
    #[serde(default)]
    pub fallback_chain: BTreeMap<String, String>,

    /// Maximum number of fallback-chain hops per resolution
    #[serde(default = "crate::defaults::max_fallback_hops")]
    pub max_fallback_hops: usize,

    // ========================================================================
    // Rendering
    // ========================================================================
    #[serde(default)]
    pub atlas: AtlasConfig,

    // ========================================================================
    // Debug Logging
    // ========================================================================
    /// Log level for debug log file output.
    /// Environment variable RUST_LOG and --log-level CLI flag take precedence.
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            font_directories: Vec::new(),
            load_system_fonts: crate::defaults::load_system_fonts(),
            last_resort_fonts: Vec::new(),
            last_resort_families: crate::defaults::last_resort_families(),
            fallback_chain: BTreeMap::new(),
            max_fallback_hops: crate::defaults::max_fallback_hops(),
            atlas: AtlasConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default path, creating a default file
    /// when none exists.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        log::info!("Config path: {:?}", config_path);

        if config_path.exists() {
            return Self::load_from(&config_path);
        }

        log::info!(
            "Config file not found, creating default at {:?}",
            config_path
        );
        let config = Self::default();
        if let Err(e) = config.save() {
            log::error!("Failed to save default config: {}", e);
            return Err(e);
        }
        Ok(config)
    }

    /// Load and validate configuration from `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        log::info!("Loading config from {:?}", path);
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_yaml(&contents)?)
    }

    /// Parse and validate a YAML document. Missing fields take defaults.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml_ng::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let io_error = |source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let yaml = serde_yaml_ng::to_string(self).map_err(ConfigError::Parse)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml).map_err(io_error)?;
        fs::rename(&temp_path, path).map_err(io_error)?;

        Ok(())
    }

    /// Reject values that would make discovery or rendering impossible.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_fallback_hops == 0 {
            return Err(ConfigError::Validation(
                "max_fallback_hops must be greater than 0".to_string(),
            ));
        }
        if self.atlas.width == 0 || self.atlas.height == 0 {
            return Err(ConfigError::Validation(format!(
                "atlas size must be non-zero, got {}x{}",
                self.atlas.width, self.atlas.height
            )));
        }
        if !(self.atlas.font_size.is_finite() && self.atlas.font_size > 0.0) {
            return Err(ConfigError::Validation(format!(
                "atlas.font_size must be a positive number, got {}",
                self.atlas.font_size
            )));
        }
        if let Some((from, _)) = self.fallback_chain.iter().find(|(from, to)| from == to) {
            return Err(ConfigError::Validation(format!(
                "fallback_chain entry {from:?} points at itself"
            )));
        }
        Ok(())
    }

    /// `font_directories` with `~/` expanded.
    pub fn expanded_font_directories(&self) -> Vec<PathBuf> {
        self.font_directories.iter().map(|p| expand_home(p)).collect()
    }

    /// `last_resort_fonts` with `~/` expanded.
    pub fn expanded_last_resort_fonts(&self) -> Vec<PathBuf> {
        self.last_resort_fonts.iter().map(|p| expand_home(p)).collect()
    }

    /// Get the configuration file path (using XDG convention)
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Get the configuration directory path (using XDG convention)
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("fontbook")
            } else {
                PathBuf::from(".")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            // ~/.config/fontbook on every Unix, macOS included
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join("fontbook")
            } else {
                PathBuf::from(".")
            }
        }
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
