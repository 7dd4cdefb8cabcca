//! Handles, byte sources and font descriptions stored by the registry.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::capability::CapabilitySet;
use crate::error::FontError;
use crate::variant::FontVariant;

/// Stable handle for a registered font. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontId(pub u32);

impl FontId {
    /// Position in the registry's description table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for FontId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "font #{}", self.0)
    }
}

/// Stable handle for a family name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FamilyId(pub u32);

impl FamilyId {
    /// Position in the registry's family table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for FamilyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "family #{}", self.0)
    }
}

/// Where the bytes of a font come from.
#[derive(Clone)]
pub enum FontSource {
    /// A font file on disk; `index` selects the face inside a collection.
    File { path: PathBuf, index: u32 },
    /// An in-memory font (embedded asset, downloaded blob).
    Memory {
        name: String,
        data: Arc<Vec<u8>>,
        index: u32,
    },
}

impl std::fmt::Debug for FontSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontSource::File { path, index } => f
                .debug_struct("File")
                .field("path", path)
                .field("index", index)
                .finish(),
            FontSource::Memory { name, data, index } => f
                .debug_struct("Memory")
                .field("name", name)
                .field("data_len", &data.len())
                .field("index", index)
                .finish(),
        }
    }
}

impl FontSource {
    /// First face of a font file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        FontSource::File {
            path: path.into(),
            index: 0,
        }
    }

    /// First face of an in-memory font.
    pub fn memory(name: impl Into<String>, data: Vec<u8>) -> Self {
        FontSource::Memory {
            name: name.into(),
            data: Arc::new(data),
            index: 0,
        }
    }

    /// Select a face inside a font collection (.ttc/.otc).
    #[must_use]
    pub fn with_index(self, index: u32) -> Self {
        match self {
            FontSource::File { path, .. } => FontSource::File { path, index },
            FontSource::Memory { name, data, .. } => FontSource::Memory { name, data, index },
        }
    }

    pub fn index(&self) -> u32 {
        match self {
            FontSource::File { index, .. } | FontSource::Memory { index, .. } => *index,
        }
    }

    /// Name used in logs and error messages.
    pub fn display_name(&self) -> String {
        match self {
            FontSource::File { path, .. } => path.display().to_string(),
            FontSource::Memory { name, .. } => name.clone(),
        }
    }

    /// Fallback family name when the font declares none: the file stem.
    pub fn stem(&self) -> String {
        match self {
            FontSource::File { path, .. } => path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            FontSource::Memory { name, .. } => name.clone(),
        }
    }

    /// Identity used to detect duplicate registrations.
    ///
    /// File paths are canonicalized when possible so that two spellings of
    /// the same file register once.
    pub fn identity(&self) -> SourceIdentity {
        match self {
            FontSource::File { path, index } => {
                let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.clone());
                SourceIdentity::File(canonical, *index)
            }
            FontSource::Memory { name, index, .. } => SourceIdentity::Memory(name.clone(), *index),
        }
    }

    /// Read the source's bytes. Blocking for files.
    pub fn read(&self) -> Result<Arc<Vec<u8>>, FontError> {
        match self {
            FontSource::File { path, .. } => read_file(path).map(Arc::new),
            FontSource::Memory { data, .. } => Ok(Arc::clone(data)),
        }
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, FontError> {
    std::fs::read(path).map_err(|source| FontError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Identity of a byte source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceIdentity {
    File(PathBuf, u32),
    Memory(String, u32),
}

/// Metadata captured once when a font is registered. Never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescription {
    /// Declared family name.
    pub family_name: String,
    /// Numeric weight (100..=900 for well-formed fonts).
    pub weight: u16,
    /// Width class (1 = ultra-condensed .. 5 = normal .. 9 = ultra-expanded).
    pub width: u16,
    /// Italic or oblique.
    pub italic: bool,
    /// Optical design size in points, when the font declares one.
    pub design_size: Option<f32>,
    /// Which capability operations the font backs with data.
    pub capabilities: CapabilitySet,
}

impl FontDescription {
    /// The variant slot this font occupies in its family.
    pub fn variant(&self) -> FontVariant {
        FontVariant::from_weight(self.weight, self.italic)
    }
}
