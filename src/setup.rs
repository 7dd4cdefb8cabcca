//! Assembling a `FontBook` from configuration and CLI flags.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use fontbook_config::Config;
use fontbook_fonts::{FallbackChain, FontBook, FontDiscovery, FontLoader, FontSource};

/// Where fonts come from and how unknown families fall back.
#[derive(Debug, Clone)]
pub struct FontSetup {
    /// Directories scanned for fonts, in order.
    pub directories: Vec<PathBuf>,
    /// Also scan the platform's installed fonts.
    pub system_fonts: bool,
    /// Explicit last-resort font files, in priority order.
    pub last_resort_fonts: Vec<PathBuf>,
    /// Families searched among discovered fonts for a last-resort font.
    pub last_resort_families: Vec<String>,
    pub fallback_chain: FallbackChain,
}

impl FontSetup {
    /// Combine the config file with command-line overrides.
    ///
    /// `--font-dir` entries are scanned after the configured directories;
    /// `--no-system-fonts` wins over `load_system_fonts`.
    pub fn from_config(config: &Config, extra_dirs: &[PathBuf], no_system_fonts: bool) -> Self {
        let mut directories = config.expanded_font_directories();
        directories.extend(extra_dirs.iter().cloned());

        let fallback_chain = FallbackChain::default()
            .with_entries(config.fallback_chain.clone())
            .with_max_hops(config.max_fallback_hops);

        Self {
            directories,
            system_fonts: config.load_system_fonts && !no_system_fonts,
            last_resort_fonts: config.expanded_last_resort_fonts(),
            last_resort_families: config.last_resort_families.clone(),
            fallback_chain,
        }
    }

    /// Scan the configured locations.
    pub fn discover(&self) -> FontDiscovery {
        let mut discovery = FontDiscovery::new();
        for dir in &self.directories {
            discovery.add_directory(dir);
        }
        if self.system_fonts {
            discovery.add_system_fonts();
        }
        log::info!(
            "Discovered {} font faces in {} directories (system fonts: {})",
            discovery.len(),
            self.directories.len(),
            self.system_fonts
        );
        discovery
    }

    /// Last-resort candidates in priority order: explicit files, then the
    /// preferred families among discovered fonts, then any discovered font.
    pub fn last_resort_candidates(&self, discovery: &FontDiscovery) -> Vec<FontSource> {
        let mut candidates: Vec<FontSource> = self
            .last_resort_fonts
            .iter()
            .map(FontSource::file)
            .collect();
        candidates.extend(
            self.last_resort_families
                .iter()
                .filter_map(|family| discovery.query(family, 400, false)),
        );
        candidates.extend(discovery.sources());
        candidates
    }

    /// Build the registry: pick a last-resort font, then register everything
    /// discovered.
    pub fn build(&self, loader: Arc<dyn FontLoader>) -> Result<FontBook> {
        let discovery = self.discover();

        let mut book = None;
        for candidate in self.last_resort_candidates(&discovery) {
            match FontBook::new(Arc::clone(&loader), candidate.clone()) {
                Ok(created) => {
                    log::info!("Using {} as last-resort font", candidate.display_name());
                    book = Some(created);
                    break;
                }
                Err(e) => log::warn!(
                    "Skipping last-resort candidate {}: {}",
                    candidate.display_name(),
                    e
                ),
            }
        }
        let Some(book) = book else {
            bail!(
                "no usable font found; set last_resort_fonts in the config or pass --font-dir"
            );
        };
        let book = book.with_fallback_chain(self.fallback_chain.clone());

        // Remaining explicit last-resort files join the last-resort set.
        for path in &self.last_resort_fonts {
            if let Err(e) = book.add_last_resort_font(FontSource::file(path)) {
                log::warn!("Skipping last-resort font {:?}: {}", path, e);
            }
        }

        let added = book.register_discovered(&discovery);
        log::info!(
            "Registered {} fonts in {} families",
            added,
            book.family_count()
        );

        // Every font of a preferred family answers empty variant rows too.
        for name in &self.last_resort_families {
            if let Some(family) = book.families().into_iter().find(|f| &f.name == name) {
                book.add_last_resort_family(family.id);
            }
        }

        Ok(book)
    }
}
