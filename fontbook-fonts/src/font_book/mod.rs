//! The font registry: families, variant tables and guaranteed-resolution lookups.
//!
//! Registration opens a font once to capture its description, then stores it
//! in three dense tables:
//! - fonts, indexed by `FontId`
//! - families, indexed by `FamilyId`, each with an 18-slot variant table
//! - a name index for exact family-name matches
//!
//! Lookups never fail outwardly: an unknown family walks the fallback chain
//! and ends at the last-resort family, and an empty variant row is answered
//! from the last-resort font set. Glyph data is reopened lazily, once per
//! font, on the first glyph request.

mod fallbacks;
mod loader;
mod types;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::capability::{FontCapability, FontLoader};
use crate::error::FontError;
use crate::glyph::{Glyph, GlyphMetrics, GlyphOutline, GlyphRun};
use crate::grapheme::{Grapheme, graphemes};
use crate::shaper::{self, ShapingHooks};
use crate::variant::FontVariant;

pub use fallbacks::{ChainEnd, DEFAULT_MAX_HOPS, FALLBACK_CHAIN, FallbackChain, FallbackResolution};
pub use loader::FontDiscovery;
pub use types::{FamilyId, FontDescription, FontId, FontSource, SourceIdentity};

/// One registered font.
struct FontEntry {
    description: FontDescription,
    source: FontSource,
    family: FamilyId,
    /// Opened on the first glyph request, then kept.
    capability: RwLock<Option<Arc<dyn FontCapability>>>,
}

struct FamilyEntry {
    name: String,
    variants: [Option<FontId>; FontVariant::COUNT],
}

impl FamilyEntry {
    fn new(name: String) -> Self {
        Self {
            name,
            variants: [None; FontVariant::COUNT],
        }
    }

    fn is_populated(&self) -> bool {
        self.variants.iter().any(Option::is_some)
    }

    /// Populated slots in table order.
    fn populated(&self) -> impl Iterator<Item = (FontVariant, FontId)> + '_ {
        FontVariant::all()
            .filter_map(move |variant| Some((variant, self.variants[variant.index()]?)))
    }
}

#[derive(Default)]
struct Tables {
    fonts: Vec<Arc<FontEntry>>,
    families: Vec<FamilyEntry>,
    family_names: HashMap<String, FamilyId>,
    identities: HashMap<SourceIdentity, FontId>,
    last_resort_fonts: Vec<FontId>,
}

impl Tables {
    /// Existing family or a new empty one. The flag is true when created.
    fn family_for(&mut self, name: &str) -> (FamilyId, bool) {
        if let Some(&id) = self.family_names.get(name) {
            return (id, false);
        }
        let id = FamilyId(self.families.len() as u32);
        self.families.push(FamilyEntry::new(name.to_string()));
        self.family_names.insert(name.to_string(), id);
        (id, true)
    }

    fn populated_family(&self, name: &str) -> Option<FamilyId> {
        let id = *self.family_names.get(name)?;
        self.families[id.index()].is_populated().then_some(id)
    }

    fn last_resort_family(&self) -> FamilyId {
        self.last_resort_fonts
            .first()
            .map(|font| self.fonts[font.index()].family)
            .unwrap_or(FamilyId(0))
    }

    fn nearest_last_resort(&self, requested: FontVariant) -> FontId {
        self.last_resort_fonts
            .iter()
            .copied()
            .min_by_key(|font| requested.distance(self.fonts[font.index()].description.variant()))
            .unwrap_or(FontId(0))
    }
}

/// Summary of one family, for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyInfo {
    pub id: FamilyId,
    pub name: String,
    /// Populated slots in table order.
    pub variants: Vec<(FontVariant, FontId)>,
}

/// Registry of fonts and families.
///
/// `FontBook` is `Send + Sync`; share it by reference or `Arc`.
pub struct FontBook {
    loader: Arc<dyn FontLoader>,
    tables: RwLock<Tables>,
    /// Memoized `find_family` results. Lock order: `tables` then this.
    family_cache: RwLock<HashMap<String, FamilyId>>,
    fallback_chain: FallbackChain,
    hooks: ShapingHooks,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tables = self.tables.read();
        f.debug_struct("FontBook")
            .field("fonts", &tables.fonts.len())
            .field("families", &tables.families.len())
            .field("last_resort_fonts", &tables.last_resort_fonts)
            .field("fallback_entries", &self.fallback_chain.len())
            .finish_non_exhaustive()
    }
}

impl FontBook {
    /// Create a registry whose last-resort family is the family of `last_resort`.
    ///
    /// # Errors
    /// Fails when the last-resort font cannot be read or parsed.
    pub fn new(loader: Arc<dyn FontLoader>, last_resort: FontSource) -> Result<Self, FontError> {
        let book = Self {
            loader,
            tables: RwLock::new(Tables::default()),
            family_cache: RwLock::new(HashMap::new()),
            fallback_chain: FallbackChain::default(),
            hooks: ShapingHooks::default(),
        };
        book.add_last_resort_font(last_resort)?;
        Ok(book)
    }

    /// Replace the family-name fallback chain.
    #[must_use]
    pub fn with_fallback_chain(mut self, chain: FallbackChain) -> Self {
        self.fallback_chain = chain;
        self.family_cache.get_mut().clear();
        self
    }

    /// Install ligature and cross-font fallback hooks.
    #[must_use]
    pub fn with_shaping_hooks(mut self, hooks: ShapingHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn fallback_chain(&self) -> &FallbackChain {
        &self.fallback_chain
    }

    /// Register a font and add it to the last-resort set.
    pub fn add_last_resort_font(&self, source: FontSource) -> Result<FontId, FontError> {
        let font = self.register_font(source)?;
        let mut tables = self.tables.write();
        if !tables.last_resort_fonts.contains(&font) {
            tables.last_resort_fonts.push(font);
            log::info!(
                "Added last-resort font {} ({})",
                font,
                tables.fonts[font.index()].description.family_name
            );
        }
        Ok(font)
    }

    /// Add every registered font of `family` to the last-resort set.
    ///
    /// Returns the number of fonts added.
    pub fn add_last_resort_family(&self, family: FamilyId) -> usize {
        let mut tables = self.tables.write();
        let Some(entry) = tables.families.get(family.index()) else {
            return 0;
        };
        let fonts: Vec<FontId> = entry.populated().map(|(_, font)| font).collect();
        let mut added = 0;
        for font in fonts {
            if !tables.last_resort_fonts.contains(&font) {
                tables.last_resort_fonts.push(font);
                added += 1;
            }
        }
        added
    }

    /// Open `source` once, capture its description and insert it into its
    /// family's variant table.
    ///
    /// Registering the same source twice returns the existing handle. A font
    /// whose slot is already taken is still registered but does not replace
    /// the earlier occupant.
    ///
    /// # Errors
    /// Returns `FontError::Io` or `FontError::InvalidFont` when the source
    /// cannot be opened.
    pub fn register_font(&self, source: FontSource) -> Result<FontId, FontError> {
        let identity = source.identity();
        if let Some(&font) = self.tables.read().identities.get(&identity) {
            log::debug!("{} already registered as {}", source.display_name(), font);
            return Ok(font);
        }

        // I/O and parsing happen outside the lock.
        let mut description = self.loader.open(&source)?.describe();
        if description.family_name.trim().is_empty() {
            description.family_name = source.stem();
        }

        let mut tables = self.tables.write();
        if let Some(&font) = tables.identities.get(&identity) {
            return Ok(font);
        }

        let font = FontId(tables.fonts.len() as u32);
        let variant = description.variant();
        let (family, created) = tables.family_for(&description.family_name);
        let row = &mut tables.families[family.index()];
        let was_populated = row.is_populated();
        match row.variants[variant.index()] {
            Some(existing) => log::debug!(
                "{} slot {} already held by {}, keeping {} unslotted",
                row.name,
                variant,
                existing,
                font
            ),
            None => row.variants[variant.index()] = Some(font),
        }

        // Resolutions memoized while this family was absent or empty are stale.
        if created || !was_populated {
            self.family_cache.write().clear();
        }

        log::info!(
            "Registered {} as {} ({} {})",
            source.display_name(),
            font,
            description.family_name,
            variant
        );
        tables.identities.insert(identity, font);
        tables.fonts.push(Arc::new(FontEntry {
            description,
            source,
            family,
            capability: RwLock::new(None),
        }));
        Ok(font)
    }

    /// Existing handle for `name` on exact match, else a new empty family.
    pub fn register_family(&self, name: &str) -> FamilyId {
        let mut tables = self.tables.write();
        let (family, created) = tables.family_for(name);
        if created {
            self.family_cache.write().clear();
            log::debug!("Created empty family {name:?} as {family}");
        }
        family
    }

    /// Resolve a family name to a family with at least one font.
    ///
    /// Tries an exact match, then the fallback chain, then the last-resort
    /// family. Results are memoized until the set of families changes.
    pub fn find_family(&self, name: &str) -> FamilyId {
        let tables = self.tables.read();
        if let Some(&family) = self.family_cache.read().get(name) {
            return family;
        }

        let family = tables.populated_family(name).unwrap_or_else(|| {
            match self
                .fallback_chain
                .resolve(name, |next| tables.populated_family(next))
            {
                FallbackResolution::Found {
                    name: resolved,
                    value,
                    hops,
                } => {
                    log::debug!("Family {name:?} resolved to {resolved:?} after {hops} hop(s)");
                    value
                }
                FallbackResolution::Exhausted(end) => {
                    let last_resort = tables.last_resort_family();
                    log::debug!(
                        "Family {name:?} unresolved ({end:?}), using last-resort {:?}",
                        tables.families[last_resort.index()].name
                    );
                    last_resort
                }
            }
        });

        self.family_cache.write().insert(name.to_string(), family);
        family
    }

    /// The font in `family` closest to `variant`.
    ///
    /// An exact slot wins; otherwise the nearest populated slot by weight
    /// distance, then italic mismatch, then the lighter weight. A family
    /// with no fonts is answered from the last-resort set.
    pub fn find_font_variant(&self, family: FamilyId, variant: FontVariant) -> FontId {
        let tables = self.tables.read();
        let nearest = tables.families.get(family.index()).and_then(|row| {
            row.populated()
                .min_by_key(|&(candidate, _)| variant.distance(candidate))
                .map(|(_, font)| font)
        });
        nearest.unwrap_or_else(|| tables.nearest_last_resort(variant))
    }

    /// `find_font_variant` for a numeric weight (snapped to the nearest class).
    pub fn find_font(&self, family: FamilyId, weight: u16, italic: bool) -> FontId {
        self.find_font_variant(family, FontVariant::from_weight(weight, italic))
    }

    /// `find_family` followed by `find_font`.
    pub fn find_font_by_name(&self, family_name: &str, weight: u16, italic: bool) -> FontId {
        self.find_font(self.find_family(family_name), weight, italic)
    }

    /// Glyph for a single code point, or glyph 0 when the font has none.
    ///
    /// Skips normalization and hooks.
    pub fn find_glyph(&self, font: FontId, code_point: char) -> Result<Glyph, FontError> {
        let capability = self.capability(font)?;
        match capability.search_character_map(code_point).glyph() {
            Some(index) => Ok(Glyph::new(font, index)),
            None => shaper::missing_glyph(capability.as_ref(), font),
        }
    }

    /// Glyphs for one grapheme, including morph substitution and kerning
    /// when the font supports them.
    ///
    /// # Errors
    /// `FontError::MissingGlyph` or `FontError::FontLoad`; both are fatal.
    pub fn find_glyphs(&self, font: FontId, grapheme: &Grapheme) -> Result<GlyphRun, FontError> {
        self.shape(font, std::slice::from_ref(grapheme))
    }

    /// Segment `text` into graphemes and shape them as one run.
    pub fn find_glyphs_in_text(&self, font: FontId, text: &str) -> Result<GlyphRun, FontError> {
        self.shape(font, &graphemes(text))
    }

    fn shape(&self, font: FontId, graphemes: &[Grapheme]) -> Result<GlyphRun, FontError> {
        let entry = self.entry(font)?;
        let capability = self.open_entry(font, &entry)?;
        let mut run = shaper::shape_graphemes(capability.as_ref(), font, graphemes, &self.hooks)?;

        let supported = entry.description.capabilities;
        if supported.morphing {
            shaper::morph_glyphs(capability.as_ref(), font, &mut run);
        }
        if supported.kerning {
            shaper::kern_glyphs(capability.as_ref(), font, &mut run);
        }
        Ok(run)
    }

    /// Outline of a glyph, `Ok(None)` when the font cannot load it.
    pub fn load_glyph_outline(&self, glyph: Glyph) -> Result<Option<GlyphOutline>, FontError> {
        Ok(self.capability(glyph.font)?.load_glyph(glyph.index))
    }

    /// Metrics of a glyph, `Ok(None)` when the font cannot load them.
    pub fn load_glyph_metrics(&self, glyph: Glyph) -> Result<Option<GlyphMetrics>, FontError> {
        Ok(self.capability(glyph.font)?.load_glyph_metrics(glyph.index))
    }

    /// The opened capability object for `font`, opening it on first use.
    ///
    /// # Errors
    /// `FontError::UnknownFont` for a foreign handle, `FontError::FontLoad`
    /// when a registered font can no longer be opened.
    pub fn capability(&self, font: FontId) -> Result<Arc<dyn FontCapability>, FontError> {
        let entry = self.entry(font)?;
        self.open_entry(font, &entry)
    }

    fn entry(&self, font: FontId) -> Result<Arc<FontEntry>, FontError> {
        self.tables
            .read()
            .fonts
            .get(font.index())
            .cloned()
            .ok_or(FontError::UnknownFont(font))
    }

    fn open_entry(
        &self,
        font: FontId,
        entry: &FontEntry,
    ) -> Result<Arc<dyn FontCapability>, FontError> {
        if let Some(capability) = entry.capability.read().as_ref() {
            return Ok(Arc::clone(capability));
        }

        let mut slot = entry.capability.write();
        if let Some(capability) = slot.as_ref() {
            return Ok(Arc::clone(capability));
        }

        let capability = self.loader.open(&entry.source).map_err(|err| {
            log::error!("Failed to reopen {} ({}): {err}", font, entry.source.display_name());
            FontError::FontLoad {
                font,
                reason: err.to_string(),
            }
        })?;
        log::debug!("Opened glyph data for {} ({})", font, entry.description.family_name);
        *slot = Some(Arc::clone(&capability));
        Ok(capability)
    }

    pub fn description(&self, font: FontId) -> Option<FontDescription> {
        self.tables
            .read()
            .fonts
            .get(font.index())
            .map(|entry| entry.description.clone())
    }

    pub fn source(&self, font: FontId) -> Option<FontSource> {
        self.tables
            .read()
            .fonts
            .get(font.index())
            .map(|entry| entry.source.clone())
    }

    /// Family a font was registered under.
    pub fn font_family(&self, font: FontId) -> Option<FamilyId> {
        self.tables
            .read()
            .fonts
            .get(font.index())
            .map(|entry| entry.family)
    }

    pub fn family_name(&self, family: FamilyId) -> Option<String> {
        self.tables
            .read()
            .families
            .get(family.index())
            .map(|entry| entry.name.clone())
    }

    pub fn family_count(&self) -> usize {
        self.tables.read().families.len()
    }

    pub fn font_count(&self) -> usize {
        self.tables.read().fonts.len()
    }

    /// All families in registration order, including empty ones.
    pub fn families(&self) -> Vec<FamilyInfo> {
        let tables = self.tables.read();
        tables
            .families
            .iter()
            .enumerate()
            .map(|(index, entry)| FamilyInfo {
                id: FamilyId(index as u32),
                name: entry.name.clone(),
                variants: entry.populated().collect(),
            })
            .collect()
    }

    pub fn last_resort_family(&self) -> FamilyId {
        self.tables.read().last_resort_family()
    }

    pub fn last_resort_fonts(&self) -> Vec<FontId> {
        self.tables.read().last_resort_fonts.clone()
    }

    /// Register every face of a discovery scan. Failures are logged and
    /// skipped. Returns the number of newly registered fonts.
    pub fn register_discovered(&self, discovery: &FontDiscovery) -> usize {
        let before = self.font_count();
        for source in discovery.sources() {
            let name = source.display_name();
            if let Err(err) = self.register_font(source) {
                log::warn!("Skipping font {name}: {err}");
            }
        }
        let registered = self.font_count() - before;
        log::info!(
            "Registered {registered} fonts, {} families total",
            self.family_count()
        );
        registered
    }

    /// Scan `dir` recursively and register what it contains.
    pub fn register_directory(&self, dir: &Path) -> usize {
        let mut discovery = FontDiscovery::new();
        discovery.add_directory(dir);
        self.register_discovered(&discovery)
    }

    /// Scan and register the platform's installed fonts.
    pub fn register_system_fonts(&self) -> usize {
        let mut discovery = FontDiscovery::new();
        discovery.add_system_fonts();
        self.register_discovered(&discovery)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{CapabilitySet, CharMapLookup};
    use crate::glyph::GlyphIndex;

    struct NamedFont(String, u16);

    impl FontCapability for NamedFont {
        fn describe(&self) -> FontDescription {
            FontDescription {
                family_name: self.0.clone(),
                weight: self.1,
                width: 5,
                italic: false,
                design_size: None,
                capabilities: CapabilitySet::default(),
            }
        }

        fn search_character_map(&self, _code_point: char) -> CharMapLookup {
            CharMapLookup::NotFound
        }

        fn load_glyph(&self, _glyph: GlyphIndex) -> Option<GlyphOutline> {
            Some(GlyphOutline::default())
        }

        fn load_glyph_metrics(&self, _glyph: GlyphIndex) -> Option<GlyphMetrics> {
            None
        }
    }

    /// Memory sources named "Family:weight".
    struct NameLoader;

    impl FontLoader for NameLoader {
        fn open(&self, source: &FontSource) -> Result<Arc<dyn FontCapability>, FontError> {
            let name = source.display_name();
            let (family, weight) = name.split_once(':').unwrap_or((name.as_str(), "400"));
            Ok(Arc::new(NamedFont(
                family.to_string(),
                weight.parse().unwrap_or(400),
            )))
        }
    }

    fn source(name: &str) -> FontSource {
        FontSource::memory(name, Vec::new())
    }

    #[test]
    fn test_memoized_fallback_invalidated_when_family_gains_a_font() {
        let book = FontBook::new(Arc::new(NameLoader), source("Last:400")).unwrap();
        let empty = book.register_family("Helvetica");

        // Empty family falls through the chain to the last resort.
        assert_eq!(book.find_family("Helvetica"), book.last_resort_family());

        book.register_font(source("Helvetica:400")).unwrap();
        assert_eq!(book.find_family("Helvetica"), empty);
    }

    #[test]
    fn test_empty_family_name_uses_source_stem() {
        let book = FontBook::new(Arc::new(NameLoader), source("Last:400")).unwrap();
        let font = book.register_font(source(":700")).unwrap();
        assert_eq!(book.description(font).unwrap().family_name, ":700");
    }

    #[test]
    fn test_add_last_resort_family() {
        let book = FontBook::new(Arc::new(NameLoader), source("Last:400")).unwrap();
        book.register_font(source("Mono:400")).unwrap();
        book.register_font(source("Mono:700")).unwrap();
        let mono = book.find_family("Mono");

        assert_eq!(book.add_last_resort_family(mono), 2);
        assert_eq!(book.add_last_resort_family(mono), 0);
        assert_eq!(book.last_resort_fonts().len(), 3);
        // The last-resort family stays the first one added.
        assert_eq!(book.family_name(book.last_resort_family()).unwrap(), "Last");
    }
}
