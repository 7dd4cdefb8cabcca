//! TrueType/OpenType backend built on `ttf-parser` (re-exported by rustybuzz).
//!
//! The font bytes are shared through an `Arc` and a `Face` is parsed on
//! each call; parsing only reads the table directory, and keeping no
//! borrowed face around lets the capability object be `'static`.

use std::sync::Arc;

use rustybuzz::ttf_parser::{Face, GlyphId, OutlineBuilder, Tag, name_id};

use crate::capability::{CapabilitySet, CharMapLookup, FontCapability, FontLoader};
use crate::error::FontError;
use crate::font_book::{FontDescription, FontSource};
use crate::glyph::{GlyphBounds, GlyphIndex, GlyphMetrics, GlyphOutline, OutlineCommand};

/// Loader for `.ttf`, `.otf`, `.ttc` and `.otc` sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenTypeLoader;

impl FontLoader for OpenTypeLoader {
    fn open(&self, source: &FontSource) -> Result<Arc<dyn FontCapability>, FontError> {
        Ok(Arc::new(OpenTypeFont::from_source(source)?))
    }
}

/// One face of an OpenType or TrueType font.
pub struct OpenTypeFont {
    data: Arc<Vec<u8>>,
    index: u32,
    glyph_count: u16,
    description: FontDescription,
}

impl std::fmt::Debug for OpenTypeFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenTypeFont")
            .field("family", &self.description.family_name)
            .field("index", &self.index)
            .field("glyph_count", &self.glyph_count)
            .finish_non_exhaustive()
    }
}

impl OpenTypeFont {
    /// Read and parse a source.
    ///
    /// # Errors
    /// `FontError::Io` when the file cannot be read, `FontError::InvalidFont`
    /// when the bytes are not a parsable face.
    pub fn from_source(source: &FontSource) -> Result<Self, FontError> {
        let data = source.read()?;
        let invalid = |reason: String| FontError::InvalidFont {
            source_name: source.display_name(),
            reason,
        };

        let face = Face::parse(&data, source.index()).map_err(|e| invalid(e.to_string()))?;
        if face.number_of_glyphs() == 0 {
            return Err(invalid("font has no glyphs".to_string()));
        }

        let glyph_count = face.number_of_glyphs();
        let description = describe_face(&face, source);

        Ok(Self {
            index: source.index(),
            glyph_count,
            description,
            data,
        })
    }

    /// Number of glyphs in the face.
    pub fn glyph_count(&self) -> u16 {
        self.glyph_count
    }

    fn face(&self) -> Option<Face<'_>> {
        Face::parse(&self.data, self.index).ok()
    }
}

impl FontCapability for OpenTypeFont {
    fn describe(&self) -> FontDescription {
        self.description.clone()
    }

    fn search_character_map(&self, code_point: char) -> CharMapLookup {
        let Some(face) = self.face() else {
            return CharMapLookup::ParseError;
        };
        if face.tables().cmap.is_none() {
            return CharMapLookup::ParseError;
        }
        match face.glyph_index(code_point) {
            Some(GlyphId(0)) | None => CharMapLookup::NotFound,
            Some(GlyphId(index)) => CharMapLookup::Found(GlyphIndex(index)),
        }
    }

    fn load_glyph(&self, glyph: GlyphIndex) -> Option<GlyphOutline> {
        if glyph.0 >= self.glyph_count {
            return None;
        }
        let face = self.face()?;
        let id = GlyphId(glyph.0);
        let mut collector = OutlineCollector::default();
        match face.outline_glyph(id, &mut collector) {
            Some(_) => Some(collector.finish()),
            // Partial outline
            None if !collector.commands.is_empty() => None,
            // No contours: valid only when the glyph stores no outline data (space).
            None => is_blank(&face, id).then(GlyphOutline::default),
        }
    }

    fn load_glyph_metrics(&self, glyph: GlyphIndex) -> Option<GlyphMetrics> {
        if glyph.0 >= self.glyph_count {
            return None;
        }
        let face = self.face()?;
        let id = GlyphId(glyph.0);
        let advance_width = face.glyph_hor_advance(id)?;
        let bounds = face.glyph_bounding_box(id).map(|rect| GlyphBounds {
            x_min: f32::from(rect.x_min),
            y_min: f32::from(rect.y_min),
            x_max: f32::from(rect.x_max),
            y_max: f32::from(rect.y_max),
        });
        let left_side_bearing = face
            .glyph_hor_side_bearing(id)
            .map(f32::from)
            .or_else(|| bounds.map(|b| b.x_min))
            .unwrap_or(0.0);

        Some(GlyphMetrics {
            advance_width: f32::from(advance_width),
            left_side_bearing,
            bounds,
            units_per_em: face.units_per_em(),
        })
    }

    fn kerning(&self, left: GlyphIndex, right: GlyphIndex) -> Option<f32> {
        let face = self.face()?;
        let kern = face.tables().kern?;
        kern.subtables
            .into_iter()
            .filter(|subtable| subtable.horizontal && !subtable.variable)
            .find_map(|subtable| subtable.glyphs_kerning(GlyphId(left.0), GlyphId(right.0)))
            .map(f32::from)
    }
}

/// Capture the metadata stored on `FontDescription`.
fn describe_face(face: &Face<'_>, source: &FontSource) -> FontDescription {
    let family_name = face_name(face, name_id::TYPOGRAPHIC_FAMILY)
        .or_else(|| face_name(face, name_id::FAMILY))
        .unwrap_or_else(|| source.stem());

    let tables = face.tables();
    let capabilities = CapabilitySet {
        character_map: tables.cmap.is_some(),
        outlines: tables.glyf.is_some() || tables.cff.is_some() || tables.cff2.is_some(),
        metrics: tables.hmtx.is_some(),
        kerning: tables.kern.is_some(),
        morphing: false,
    };

    let design_size = face
        .variation_axes()
        .into_iter()
        .find(|axis| axis.tag == Tag::from_bytes(b"opsz"))
        .map(|axis| axis.def_value);

    FontDescription {
        family_name,
        weight: face.weight().to_number(),
        width: face.width().to_number(),
        italic: face.is_italic() || face.is_oblique(),
        design_size,
        capabilities,
    }
}

/// Whether `glyph` is stored without outline data.
///
/// For TrueType outlines this is a zero-length `loca` range, so a glyph whose
/// `glyf` entry fails to parse is not mistaken for a blank one. CFF
/// charstrings carry no separate length and an empty result is taken as
/// blank, as is any glyph of a face with no outline tables.
fn is_blank(face: &Face<'_>, glyph: GlyphId) -> bool {
    let tables = face.tables();
    if tables.glyf.is_some() {
        return glyf_range(face, glyph).is_some_and(|(start, end)| start == end);
    }
    true
}

/// Byte range of `glyph` inside `glyf`, read from the raw `loca` table.
fn glyf_range(face: &Face<'_>, glyph: GlyphId) -> Option<(u32, u32)> {
    let raw = face.raw_face();
    let head = raw.table(Tag::from_bytes(b"head"))?;
    let loca = raw.table(Tag::from_bytes(b"loca"))?;
    let long_offsets = read_u16(head, 50)? != 0;
    let index = usize::from(glyph.0);
    if long_offsets {
        Some((read_u32(loca, index * 4)?, read_u32(loca, index * 4 + 4)?))
    } else {
        let start = u32::from(read_u16(loca, index * 2)?) * 2;
        let end = u32::from(read_u16(loca, index * 2 + 2)?) * 2;
        Some((start, end))
    }
}

fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// First non-empty Unicode name record with `id`.
fn face_name(face: &Face<'_>, id: u16) -> Option<String> {
    face.names()
        .into_iter()
        .filter(|name| name.name_id == id && name.is_unicode())
        .filter_map(|name| name.to_string())
        .map(|name| name.trim().to_string())
        .find(|name| !name.is_empty())
}

/// Records `ttf_parser` outline callbacks as `OutlineCommand`s.
#[derive(Default)]
struct OutlineCollector {
    commands: Vec<OutlineCommand>,
}

impl OutlineCollector {
    fn finish(self) -> GlyphOutline {
        GlyphOutline {
            commands: self.commands,
        }
    }
}

impl OutlineBuilder for OutlineCollector {
    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(OutlineCommand::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(OutlineCommand::LineTo(x, y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.commands.push(OutlineCommand::QuadTo(x1, y1, x, y));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.commands
            .push(OutlineCommand::CurveTo(x1, y1, x2, y2, x, y));
    }

    fn close(&mut self) {
        self.commands.push(OutlineCommand::Close);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_are_invalid_font() {
        let source = FontSource::memory("garbage", vec![0xde, 0xad, 0xbe, 0xef]);
        let err = OpenTypeFont::from_source(&source).unwrap_err();
        match err {
            FontError::InvalidFont { source_name, .. } => assert_eq!(source_name, "garbage"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_loader_reports_missing_file() {
        let source = FontSource::file("/nonexistent/fontbook/missing.otf");
        let err = OpenTypeLoader.open(&source).err().unwrap();
        assert!(matches!(err, FontError::Io { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_glyf_range_reads_long_loca() {
        let data = include_bytes!("../tests/fonts/DejaVuSansMono.ttf");
        let face = Face::parse(data, 0).unwrap();
        assert_eq!(glyf_range(&face, GlyphId(3)), Some((76, 76)));
        assert_eq!(glyf_range(&face, GlyphId(36)), Some((4616, 4824)));
        assert!(is_blank(&face, GlyphId(3)));
        assert!(!is_blank(&face, GlyphId(36)));
        assert_eq!(glyf_range(&face, GlyphId(u16::MAX)), None);
    }

    #[test]
    fn test_outline_collector_records_commands_in_order() {
        let mut collector = OutlineCollector::default();
        collector.move_to(0.0, 0.0);
        collector.line_to(100.0, 0.0);
        collector.quad_to(150.0, 50.0, 100.0, 100.0);
        collector.curve_to(80.0, 120.0, 20.0, 120.0, 0.0, 100.0);
        collector.close();

        let outline = collector.finish();
        assert_eq!(outline.commands.len(), 5);
        assert_eq!(outline.commands[0], OutlineCommand::MoveTo(0.0, 0.0));
        assert_eq!(outline.commands[4], OutlineCommand::Close);
    }
}
