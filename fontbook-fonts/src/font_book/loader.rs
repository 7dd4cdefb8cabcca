//! Font discovery through the system font database.

use std::path::Path;

use fontdb::{Database, Family, Query, Source};

use super::types::FontSource;

/// A scanned set of font faces (directories and/or system fonts).
///
/// Discovery only reads face headers; nothing is registered until the set
/// is handed to `FontBook::register_discovered`.
pub struct FontDiscovery {
    db: Database,
}

impl Default for FontDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

impl FontDiscovery {
    pub fn new() -> Self {
        Self { db: Database::new() }
    }

    /// Scan `dir` recursively.
    pub fn add_directory(&mut self, dir: &Path) {
        let before = self.db.len();
        self.db.load_fonts_dir(dir);
        log::info!(
            "Found {} font faces in {}",
            self.db.len() - before,
            dir.display()
        );
    }

    /// Scan the platform's font directories.
    pub fn add_system_fonts(&mut self) {
        let before = self.db.len();
        self.db.load_system_fonts();
        log::info!("Found {} system font faces", self.db.len() - before);
    }

    /// Number of faces found so far.
    pub fn len(&self) -> usize {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// Every file-backed face, sorted by path then collection index.
    ///
    /// fontdb yields faces in filesystem order; sorting keeps registration
    /// order (and therefore which font wins an occupied slot) reproducible.
    pub fn sources(&self) -> Vec<FontSource> {
        let mut sources: Vec<FontSource> = self
            .db
            .faces()
            .filter_map(|face| file_source(&face.source, face.index))
            .collect();
        sources.sort_by(|a, b| {
            a.display_name()
                .cmp(&b.display_name())
                .then(a.index().cmp(&b.index()))
        });
        sources
    }

    /// Best face for a family name and style, as fontdb matches it.
    pub fn query(&self, family_name: &str, weight: u16, italic: bool) -> Option<FontSource> {
        let query = Query {
            families: &[Family::Name(family_name)],
            weight: fontdb::Weight(weight),
            style: if italic {
                fontdb::Style::Italic
            } else {
                fontdb::Style::Normal
            },
            ..Query::default()
        };
        let id = self.db.query(&query)?;
        let face = self.db.face(id)?;
        file_source(&face.source, face.index)
    }
}

fn file_source(source: &Source, index: u32) -> Option<FontSource> {
    match source {
        Source::File(path) | Source::SharedFile(path, _) => {
            Some(FontSource::file(path.clone()).with_index(index))
        }
        Source::Binary(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_directory_has_no_fonts() {
        let dir = tempfile::tempdir().unwrap();
        let mut discovery = FontDiscovery::new();
        discovery.add_directory(dir.path());
        assert!(discovery.is_empty());
        assert!(discovery.sources().is_empty());
        assert!(discovery.query("Anything", 400, false).is_none());
    }

    #[test]
    fn test_non_font_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a font").unwrap();
        std::fs::write(dir.path().join("broken.ttf"), [0u8; 16]).unwrap();
        let mut discovery = FontDiscovery::new();
        discovery.add_directory(dir.path());
        assert!(discovery.sources().is_empty());
    }
}
