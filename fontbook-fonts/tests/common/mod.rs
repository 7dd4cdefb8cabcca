//! In-memory fonts for registry and shaper tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use fontbook_fonts::{
    CapabilitySet, CharMapLookup, FontBook, FontCapability, FontDescription, FontError,
    FontLoader, FontSource, GlyphIndex, GlyphMetrics, GlyphOutline, OutlineCommand,
};

/// Description and glyph data of one fake font.
#[derive(Debug, Clone)]
pub struct FakeFont {
    pub family: String,
    pub weight: u16,
    pub italic: bool,
    pub cmap: HashMap<char, u16>,
    /// Glyphs whose outline load fails.
    pub broken: Vec<u16>,
    pub kerning: HashMap<(u16, u16), f32>,
}

impl FakeFont {
    pub fn new(family: &str, weight: u16, italic: bool) -> Self {
        Self {
            family: family.to_string(),
            weight,
            italic,
            cmap: HashMap::new(),
            broken: Vec::new(),
            kerning: HashMap::new(),
        }
    }

    /// Map ASCII letters to glyphs 1.. in alphabet order.
    pub fn with_ascii(mut self) -> Self {
        for (i, c) in ('a'..='z').enumerate() {
            self.cmap.insert(c, i as u16 + 1);
        }
        self
    }

    pub fn with_char(mut self, c: char, glyph: u16) -> Self {
        self.cmap.insert(c, glyph);
        self
    }

    pub fn with_broken(mut self, glyph: u16) -> Self {
        self.broken.push(glyph);
        self
    }

    pub fn with_kerning(mut self, left: u16, right: u16, value: f32) -> Self {
        self.kerning.insert((left, right), value);
        self
    }
}

impl FontCapability for FakeFont {
    fn describe(&self) -> FontDescription {
        FontDescription {
            family_name: self.family.clone(),
            weight: self.weight,
            width: 5,
            italic: self.italic,
            design_size: None,
            capabilities: CapabilitySet {
                character_map: true,
                outlines: true,
                metrics: true,
                kerning: !self.kerning.is_empty(),
                morphing: false,
            },
        }
    }

    fn search_character_map(&self, code_point: char) -> CharMapLookup {
        match self.cmap.get(&code_point) {
            Some(&glyph) => CharMapLookup::Found(GlyphIndex(glyph)),
            None => CharMapLookup::NotFound,
        }
    }

    fn load_glyph(&self, glyph: GlyphIndex) -> Option<GlyphOutline> {
        if self.broken.contains(&glyph.0) {
            return None;
        }
        // A 100x100 box offset by the glyph index.
        let x = f32::from(glyph.0);
        Some(GlyphOutline {
            commands: vec![
                OutlineCommand::MoveTo(x, 0.0),
                OutlineCommand::LineTo(x + 100.0, 0.0),
                OutlineCommand::LineTo(x + 100.0, 100.0),
                OutlineCommand::LineTo(x, 100.0),
                OutlineCommand::Close,
            ],
        })
    }

    fn load_glyph_metrics(&self, glyph: GlyphIndex) -> Option<GlyphMetrics> {
        (!self.broken.contains(&glyph.0)).then_some(GlyphMetrics {
            advance_width: 120.0,
            left_side_bearing: 0.0,
            bounds: None,
            units_per_em: 1000,
        })
    }

    fn kerning(&self, left: GlyphIndex, right: GlyphIndex) -> Option<f32> {
        self.kerning.get(&(left.0, right.0)).copied()
    }
}

/// Loader serving `FakeFont`s by source name and counting opens.
#[derive(Default)]
pub struct FakeLoader {
    fonts: Mutex<HashMap<String, FakeFont>>,
    opens: Mutex<HashMap<String, Arc<AtomicUsize>>>,
    /// Sources that open once (registration) and fail afterwards.
    fail_reopen: Mutex<Vec<String>>,
}

impl FakeLoader {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make `font` available under the memory source `name`.
    pub fn add(&self, name: &str, font: FakeFont) -> FontSource {
        self.fonts.lock().insert(name.to_string(), font);
        FontSource::memory(name, Vec::new())
    }

    pub fn fail_reopen(&self, name: &str) {
        self.fail_reopen.lock().push(name.to_string());
    }

    pub fn open_count(&self, name: &str) -> usize {
        self.opens
            .lock()
            .get(name)
            .map_or(0, |count| count.load(Ordering::SeqCst))
    }
}

impl FontLoader for FakeLoader {
    fn open(&self, source: &FontSource) -> Result<Arc<dyn FontCapability>, FontError> {
        let name = source.display_name();
        let font = self
            .fonts
            .lock()
            .get(&name)
            .cloned()
            .ok_or_else(|| FontError::InvalidFont {
                source_name: name.clone(),
                reason: "unknown fake font".to_string(),
            })?;

        let count = Arc::clone(self.opens.lock().entry(name.clone()).or_default());
        let previous = count.fetch_add(1, Ordering::SeqCst);
        if previous > 0 && self.fail_reopen.lock().contains(&name) {
            return Err(FontError::InvalidFont {
                source_name: name,
                reason: "file changed on disk".to_string(),
            });
        }
        Ok(Arc::new(font))
    }
}

/// A registry whose last-resort font is "Fallback Sans" Regular with ASCII.
pub fn book_with(loader: &Arc<FakeLoader>) -> FontBook {
    let last_resort = loader.add(
        "fallback-sans.ttf",
        FakeFont::new("Fallback Sans", 400, false).with_ascii(),
    );
    FontBook::new(Arc::clone(loader) as Arc<dyn FontLoader>, last_resort)
        .expect("last-resort font registers")
}
