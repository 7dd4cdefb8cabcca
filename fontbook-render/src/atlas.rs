//! Glyph cache keyed by (font, glyph index) with render-on-miss.
//!
//! Each key owns a single-flight cell. The first caller for a key loads the
//! outline and metrics from the `FontBook` and renders while holding the
//! cell's lock; concurrent callers for the same key block on that lock and
//! then read the stored slot, so a glyph is rendered at most once until the
//! cache is cleared. Callers for different keys never wait on each other's
//! renders.
//!
//! `clear` bumps a generation counter. A render that started before the
//! clear is discarded when it finishes and the key is rendered again into
//! the fresh renderer state, so a slot handed out after a clear always
//! belongs to the current generation. Slots obtained before a clear are
//! invalid once it returns.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use fontbook_fonts::{FontBook, FontId, Glyph, GlyphIndex, GlyphMetrics, GlyphOutline};
use parking_lot::{Mutex, RwLock};

use crate::error::RenderError;

/// Cache key for one glyph image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphKey {
    pub font: FontId,
    pub glyph: GlyphIndex,
}

impl GlyphKey {
    pub fn new(font: FontId, glyph: GlyphIndex) -> Self {
        Self { font, glyph }
    }
}

impl From<Glyph> for GlyphKey {
    fn from(glyph: Glyph) -> Self {
        Self::new(glyph.font, glyph.index)
    }
}

/// Render callback invoked on cache misses.
pub trait GlyphRenderer: Send + Sync {
    /// Handle to the rendered image (atlas coordinates, texture id, ...).
    type Slot: Clone + Send + Sync;

    fn render_glyph(
        &self,
        key: GlyphKey,
        outline: &GlyphOutline,
        metrics: &GlyphMetrics,
    ) -> Result<Self::Slot, RenderError>;

    /// Release everything rendered so far. Called by `GlyphAtlas::clear`.
    fn reset(&self) {}
}

/// Counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AtlasStats {
    pub hits: u64,
    pub misses: u64,
    pub renders: u64,
    pub entries: usize,
}

type Cell<S> = Arc<Mutex<Option<S>>>;

/// Glyph image cache in front of a `GlyphRenderer`.
pub struct GlyphAtlas<R: GlyphRenderer> {
    renderer: R,
    cells: RwLock<HashMap<GlyphKey, Cell<R::Slot>>>,
    /// Bumped by `clear`; held for reading while a slot is stored.
    generation: RwLock<u64>,
    hits: AtomicU64,
    misses: AtomicU64,
    renders: AtomicU64,
}

impl<R: GlyphRenderer> GlyphAtlas<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            cells: RwLock::new(HashMap::new()),
            generation: RwLock::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            renders: AtomicU64::new(0),
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The slot for `key`, rendering it on first request.
    ///
    /// # Errors
    /// `RenderError::GlyphUnavailable` when the font cannot load the glyph,
    /// `RenderError::Font` for fatal font errors, or whatever the renderer
    /// reports. Failed renders are not cached; the next request retries.
    pub fn lookup(&self, book: &FontBook, key: GlyphKey) -> Result<R::Slot, RenderError> {
        loop {
            let started = *self.generation.read();
            let cell = self.cell(key);
            let mut slot = cell.lock();
            if let Some(stored) = slot.as_ref() {
                if *self.generation.read() != started {
                    // Cell dropped by a clear that ran before we locked it.
                    continue;
                }
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(stored.clone());
            }

            self.misses.fetch_add(1, Ordering::Relaxed);
            let glyph = Glyph::new(key.font, key.glyph);
            let unavailable = || RenderError::GlyphUnavailable { glyph };
            let outline = book.load_glyph_outline(glyph)?.ok_or_else(unavailable)?;
            let metrics = book.load_glyph_metrics(glyph)?.ok_or_else(unavailable)?;

            let rendered = self.renderer.render_glyph(key, &outline, &metrics)?;
            let generation = self.generation.read();
            if *generation != started {
                log::debug!(
                    "Atlas cleared while rendering {} of {}; rendering again",
                    key.glyph,
                    key.font
                );
                continue;
            }
            self.renders.fetch_add(1, Ordering::Relaxed);
            log::trace!("Rendered {} of {}", key.glyph, key.font);
            *slot = Some(rendered.clone());
            return Ok(rendered);
        }
    }

    /// `lookup` for a resolved glyph.
    pub fn lookup_glyph(&self, book: &FontBook, glyph: Glyph) -> Result<R::Slot, RenderError> {
        self.lookup(book, glyph.into())
    }

    /// The stored slot for `key`, without rendering.
    pub fn get(&self, key: GlyphKey) -> Option<R::Slot> {
        let cell = self.cells.read().get(&key).cloned()?;
        let slot = cell.lock().clone();
        slot
    }

    /// Number of keys with a rendered slot.
    pub fn len(&self) -> usize {
        // Cell locks are never taken under the map lock.
        let cells: Vec<_> = self.cells.read().values().cloned().collect();
        cells.iter().filter(|cell| cell.lock().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached slot and reset the renderer.
    ///
    /// Renders in flight finish against the old state and are thrown away;
    /// their callers render again after the reset.
    pub fn clear(&self) {
        let mut generation = self.generation.write();
        *generation += 1;
        self.cells.write().clear();
        self.renderer.reset();
        log::debug!("Glyph atlas cleared (generation {})", *generation);
    }

    pub fn stats(&self) -> AtlasStats {
        AtlasStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            renders: self.renders.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    fn cell(&self, key: GlyphKey) -> Cell<R::Slot> {
        if let Some(cell) = self.cells.read().get(&key) {
            return Arc::clone(cell);
        }
        Arc::clone(self.cells.write().entry(key).or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_glyph() {
        let glyph = Glyph::new(FontId(3), GlyphIndex(12));
        assert_eq!(GlyphKey::from(glyph), GlyphKey::new(FontId(3), GlyphIndex(12)));
    }
}
