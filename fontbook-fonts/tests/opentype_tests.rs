//! Integration tests for the OpenType backend against bundled DejaVu Sans Mono
//! faces (see `tests/fonts/LICENSE-DejaVu.txt`).

use std::path::Path;
use std::sync::Arc;

use fontbook_fonts::{
    CharMapLookup, FontBook, FontCapability, FontDiscovery, FontError, FontSource, GlyphIndex,
    OpenTypeFont, OpenTypeLoader,
};

const REGULAR: &[u8] = include_bytes!("fonts/DejaVuSansMono.ttf");
const BOLD: &[u8] = include_bytes!("fonts/DejaVuSansMono-Bold.ttf");

const FAMILY: &str = "DejaVu Sans Mono";

fn regular() -> OpenTypeFont {
    OpenTypeFont::from_source(&FontSource::memory("DejaVuSansMono.ttf", REGULAR.to_vec()))
        .unwrap()
}

fn regular_book() -> FontBook {
    FontBook::new(
        Arc::new(OpenTypeLoader),
        FontSource::memory("DejaVuSansMono.ttf", REGULAR.to_vec()),
    )
    .unwrap()
}

/// The regular face with its `glyf` table cut to one byte. `loca` still
/// gives every glyph a range, so only glyphs with an empty range survive.
fn truncated_glyf() -> Vec<u8> {
    let mut data = REGULAR.to_vec();
    let num_tables = usize::from(u16::from_be_bytes([data[4], data[5]]));
    for i in 0..num_tables {
        let record = 12 + 16 * i;
        if &data[record..record + 4] == b"glyf" {
            data[record + 12..record + 16].copy_from_slice(&1u32.to_be_bytes());
        }
    }
    data
}

#[test]
fn test_description_reads_name_and_style_tables() {
    let description = regular().describe();
    assert_eq!(description.family_name, FAMILY);
    assert_eq!(description.weight, 400);
    assert_eq!(description.width, 5);
    assert!(!description.italic);
    assert_eq!(description.design_size, None);

    let caps = description.capabilities;
    assert!(caps.character_map && caps.outlines && caps.metrics);
    assert!(!caps.kerning);
    assert!(!caps.morphing);

    let bold = OpenTypeFont::from_source(&FontSource::memory("bold", BOLD.to_vec())).unwrap();
    assert_eq!(bold.describe().family_name, FAMILY);
    assert_eq!(bold.describe().weight, 700);
}

#[test]
fn test_character_map_found_and_not_found() {
    let font = regular();
    assert_eq!(font.search_character_map('A'), CharMapLookup::Found(GlyphIndex(36)));
    assert_eq!(font.search_character_map(' '), CharMapLookup::Found(GlyphIndex(3)));
    assert_eq!(font.search_character_map('\u{4E00}'), CharMapLookup::NotFound);
}

#[test]
fn test_outlines_and_metrics() {
    let font = regular();
    let outline = font.load_glyph(GlyphIndex(36)).unwrap();
    assert!(!outline.is_empty());

    // Space has no contours but is a valid glyph.
    let space = font.load_glyph(GlyphIndex(3)).unwrap();
    assert!(space.is_empty());

    let metrics = font.load_glyph_metrics(GlyphIndex(36)).unwrap();
    assert_eq!(metrics.advance_width, 1233.0);
    assert_eq!(metrics.units_per_em, 2048);
    assert!(metrics.bounds.is_some());

    assert!(font.load_glyph(GlyphIndex(font.glyph_count())).is_none());
    assert!(font.load_glyph(GlyphIndex::MISSING).is_some());
    assert_eq!(font.kerning(GlyphIndex(36), GlyphIndex(68)), None);
}

#[test]
fn test_decomposed_fallback_through_font_book() {
    let book = regular_book();
    let font = book.find_font_by_name(FAMILY, 400, false);

    // U+1E15 has no glyph of its own; its NFD form e + U+0304 + U+0300 does.
    let run = book.find_glyphs_in_text(font, "\u{1E15}").unwrap();
    let indices: Vec<u16> = run.glyphs().map(|glyph| glyph.index.0).collect();
    assert_eq!(indices, vec![72, 652, 648]);
    assert!(run.iter().all(|placed| placed.grapheme == 0));

    // Decomposed input composes to the precomposed glyph.
    let run = book.find_glyphs_in_text(font, "e\u{0301}").unwrap();
    let indices: Vec<u16> = run.glyphs().map(|glyph| glyph.index.0).collect();
    assert_eq!(indices, vec![171]);

    let run = book.find_glyphs_in_text(font, "A\u{4E00}").unwrap();
    let indices: Vec<u16> = run.glyphs().map(|glyph| glyph.index.0).collect();
    assert_eq!(indices, vec![36, 0]);
}

#[test]
fn test_bold_face_fills_bold_slot() {
    let book = regular_book();
    let bold = book
        .register_font(FontSource::memory("DejaVuSansMono-Bold.ttf", BOLD.to_vec()))
        .unwrap();
    assert_eq!(book.find_font_by_name(FAMILY, 700, false), bold);
    assert_ne!(book.find_font_by_name(FAMILY, 400, false), bold);
}

#[test]
fn test_discovered_directory_registers_both_faces() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fonts");
    let mut discovery = FontDiscovery::new();
    discovery.add_directory(&dir);
    assert_eq!(discovery.len(), 2);

    let bold_path = discovery.query(FAMILY, 700, false).unwrap().display_name();
    assert!(bold_path.ends_with("DejaVuSansMono-Bold.ttf"));

    let last_resort = FontSource::file(dir.join("DejaVuSansMono.ttf"));
    let book = FontBook::new(Arc::new(OpenTypeLoader), last_resort).unwrap();
    // The regular face is already registered as the last resort.
    assert_eq!(book.register_discovered(&discovery), 1);
    assert_eq!(book.font_count(), 2);
    let bold = book.find_font_by_name(FAMILY, 700, false);
    assert_eq!(book.source(bold).unwrap().display_name(), bold_path);
}

#[test]
fn test_unreadable_outline_data_is_not_a_blank_glyph() {
    let font =
        OpenTypeFont::from_source(&FontSource::memory("truncated", truncated_glyf())).unwrap();
    assert!(font.load_glyph(GlyphIndex(36)).is_none());
    assert!(font.load_glyph(GlyphIndex::MISSING).is_none());
    // A zero-length glyph needs no glyf bytes.
    assert!(font.load_glyph(GlyphIndex(3)).unwrap().is_empty());
}

#[test]
fn test_unloadable_missing_glyph_is_fatal() {
    let book =
        FontBook::new(Arc::new(OpenTypeLoader), FontSource::memory("truncated", truncated_glyf()))
            .unwrap();
    let font = book.find_font_by_name(FAMILY, 400, false);

    let err = book.find_glyphs_in_text(font, "A").unwrap_err();
    assert!(matches!(err, FontError::MissingGlyph { font: f } if f == font));
    assert!(err.is_fatal());
}
