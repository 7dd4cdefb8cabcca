//! Default grapheme-to-glyph resolution.
//!
//! Each grapheme is resolved on its own, in input order:
//! 1. NFC code points: character map + glyph load for every code point
//! 2. NFD code points, if the NFC attempt produced nothing
//! 3. Glyph 0 of the same font, if both attempts produced nothing
//!
//! An attempt is all-or-nothing: one absent code point, parse error or
//! failed load discards every glyph collected in that attempt, so composed
//! and decomposed forms never mix inside one grapheme.
//!
//! Two hooks are evaluated around this algorithm. `LigatureHook` sees the
//! run of remaining graphemes before step 1; `FallbackHook` may supply
//! glyphs from other fonts before step 3. The defaults do nothing.

use std::sync::Arc;

use crate::capability::FontCapability;
use crate::error::FontError;
use crate::font_book::FontId;
use crate::glyph::{Glyph, GlyphIndex, GlyphRun};
use crate::grapheme::Grapheme;

/// Ligature lookup over runs of graphemes.
pub trait LigatureHook: Send + Sync {
    /// Return how many leading graphemes of `graphemes` a ligature covers,
    /// and the glyphs replacing them.
    fn find_ligature(&self, font: FontId, graphemes: &[Grapheme]) -> Option<(usize, Vec<Glyph>)>;
}

/// Cross-font lookup tried before falling back to the missing glyph.
pub trait FallbackHook: Send + Sync {
    /// Glyphs for `grapheme`, which `font` could not supply.
    ///
    /// Only called after both the grapheme and its NFD decomposition failed
    /// in `font`. The glyphs may name any registered font and are used as
    /// returned. `None` or an empty vector means no fallback, and the
    /// grapheme resolves to glyph 0 of `font`.
    fn find_fallback(&self, font: FontId, grapheme: &Grapheme) -> Option<Vec<Glyph>>;
}

/// Ligature hook that never matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLigatures;

impl LigatureHook for NoLigatures {
    fn find_ligature(&self, _font: FontId, _graphemes: &[Grapheme]) -> Option<(usize, Vec<Glyph>)> {
        None
    }
}

/// Fallback hook that never supplies glyphs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFontFallback;

impl FallbackHook for NoFontFallback {
    fn find_fallback(&self, _font: FontId, _grapheme: &Grapheme) -> Option<Vec<Glyph>> {
        None
    }
}

/// The hooks used by a `FontBook` while shaping.
#[derive(Clone)]
pub struct ShapingHooks {
    pub ligatures: Arc<dyn LigatureHook>,
    pub fallback: Arc<dyn FallbackHook>,
}

impl Default for ShapingHooks {
    fn default() -> Self {
        Self {
            ligatures: Arc::new(NoLigatures),
            fallback: Arc::new(NoFontFallback),
        }
    }
}

impl std::fmt::Debug for ShapingHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapingHooks").finish_non_exhaustive()
    }
}

/// Shape a grapheme sequence against one font.
///
/// # Errors
/// Returns `FontError::MissingGlyph` when a grapheme needs the missing
/// glyph and glyph 0 itself cannot be loaded.
pub fn shape_graphemes<F>(
    font: &F,
    font_id: FontId,
    graphemes: &[Grapheme],
    hooks: &ShapingHooks,
) -> Result<GlyphRun, FontError>
where
    F: FontCapability + ?Sized,
{
    let mut run = GlyphRun::with_capacity(graphemes.len());
    let mut position = 0;

    while position < graphemes.len() {
        if let Some((consumed, glyphs)) = hooks
            .ligatures
            .find_ligature(font_id, &graphemes[position..])
            .filter(|(consumed, glyphs)| *consumed > 0 && !glyphs.is_empty())
        {
            for glyph in glyphs {
                run.push(glyph, position);
            }
            position += consumed.min(graphemes.len() - position);
            continue;
        }

        for glyph in shape_grapheme(font, font_id, &graphemes[position], hooks.fallback.as_ref())? {
            run.push(glyph, position);
        }
        position += 1;
    }

    Ok(run)
}

/// Resolve one grapheme to one or more glyphs.
pub fn shape_grapheme<F>(
    font: &F,
    font_id: FontId,
    grapheme: &Grapheme,
    fallback: &dyn FallbackHook,
) -> Result<Vec<Glyph>, FontError>
where
    F: FontCapability + ?Sized,
{
    let mut indices = resolve_code_points(font, &grapheme.nfc());
    if indices.is_empty() {
        indices = resolve_code_points(font, &grapheme.nfd());
    }
    if !indices.is_empty() {
        return Ok(indices
            .into_iter()
            .map(|index| Glyph::new(font_id, index))
            .collect());
    }

    if let Some(glyphs) = fallback
        .find_fallback(font_id, grapheme)
        .filter(|glyphs| !glyphs.is_empty())
    {
        return Ok(glyphs);
    }

    log::trace!(
        "No glyphs for grapheme {:?} in font {}, substituting missing glyph",
        grapheme.as_str(),
        font_id
    );
    missing_glyph(font, font_id).map(|glyph| vec![glyph])
}

/// Glyph 0 of `font`, verified to load.
pub fn missing_glyph<F>(font: &F, font_id: FontId) -> Result<Glyph, FontError>
where
    F: FontCapability + ?Sized,
{
    if font.load_glyph(GlyphIndex::MISSING).is_none() {
        log::error!("Could not load glyph 0 from font {font_id}");
        return Err(FontError::MissingGlyph { font: font_id });
    }
    Ok(Glyph::missing(font_id))
}

/// One all-or-nothing attempt: every code point must map and load.
fn resolve_code_points<F>(font: &F, code_points: &[char]) -> Vec<GlyphIndex>
where
    F: FontCapability + ?Sized,
{
    let mut glyphs = Vec::with_capacity(code_points.len());
    for &code_point in code_points {
        let Some(index) = font.search_character_map(code_point).glyph() else {
            return Vec::new();
        };
        if font.load_glyph(index).is_none() {
            return Vec::new();
        }
        glyphs.push(index);
    }
    glyphs
}

/// Apply the font's morph substitution to the glyphs it produced.
pub(crate) fn morph_glyphs<F>(font: &F, font_id: FontId, run: &mut GlyphRun)
where
    F: FontCapability + ?Sized,
{
    let mut indices: Vec<GlyphIndex> = run
        .iter()
        .filter(|g| g.glyph.font == font_id)
        .map(|g| g.glyph.index)
        .collect();
    if indices.is_empty() {
        return;
    }
    font.substitute_glyphs(&mut indices);

    let mut substituted = indices.into_iter();
    for placed in run.as_mut_slice() {
        if placed.glyph.font == font_id
            && let Some(index) = substituted.next()
        {
            placed.glyph.index = index;
        }
    }
}

/// Record pair kerning between adjacent glyphs of the same font.
pub(crate) fn kern_glyphs<F>(font: &F, font_id: FontId, run: &mut GlyphRun)
where
    F: FontCapability + ?Sized,
{
    let glyphs = run.as_mut_slice();
    for i in 1..glyphs.len() {
        let (left, right) = (glyphs[i - 1].glyph, glyphs[i].glyph);
        if left.font != font_id || right.font != font_id {
            continue;
        }
        if let Some(kerning) = font.kerning(left.index, right.index) {
            glyphs[i].kerning = kerning;
        }
    }
}
