//! CPU glyph rasterizer packing coverage masks into one RGBA page.
//!
//! Outlines are filled with zeno (through swash) at a fixed pixel size and
//! placed with row-based shelf packing: glyphs go left to right along the
//! current shelf, a new shelf starts below the tallest glyph of the
//! previous one, and the page reports `AtlasFull` once no shelf fits.

use fontbook_fonts::{GlyphMetrics, GlyphOutline, OutlineCommand};
use parking_lot::Mutex;
use swash::zeno::{Command, Mask, Origin, Transform, Vector};

use crate::atlas::{GlyphKey, GlyphRenderer};
use crate::error::RenderError;

/// Default page edge in pixels.
pub const DEFAULT_PAGE_SIZE: u32 = 2048;
/// Default gap between packed glyphs in pixels.
pub const DEFAULT_PADDING: u32 = 2;

/// Where a glyph landed in the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasSlot {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Horizontal offset from the pen position to the bitmap's left edge.
    pub bearing_x: f32,
    /// Distance from the baseline up to the bitmap's top edge.
    pub bearing_y: f32,
}

impl AtlasSlot {
    /// Whether the glyph has no visible pixels (whitespace).
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A rendered coverage mask before placement.
struct RasterizedGlyph {
    width: u32,
    height: u32,
    bearing_x: f32,
    bearing_y: f32,
    /// One alpha byte per pixel.
    coverage: Vec<u8>,
}

struct Page {
    width: u32,
    height: u32,
    /// RGBA, row-major.
    pixels: Vec<u8>,
    next_x: u32,
    next_y: u32,
    row_height: u32,
}

impl Page {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
            next_x: 0,
            next_y: 0,
            row_height: 0,
        }
    }

    fn reset(&mut self) {
        self.pixels.fill(0);
        self.next_x = 0;
        self.next_y = 0;
        self.row_height = 0;
    }

    /// Reserve a `width` x `height` rectangle, or `None` when the page is full.
    fn allocate(&mut self, width: u32, height: u32, padding: u32) -> Option<(u32, u32)> {
        if width + padding > self.width {
            return None;
        }
        if self.next_x + width + padding > self.width {
            self.next_x = 0;
            self.next_y += self.row_height + padding;
            self.row_height = 0;
        }
        if self.next_y + height + padding > self.height {
            return None;
        }

        let origin = (self.next_x, self.next_y);
        self.next_x += width + padding;
        self.row_height = self.row_height.max(height);
        Some(origin)
    }

    /// Copy a coverage mask into the page as white with alpha.
    fn blit(&mut self, x: u32, y: u32, raster: &RasterizedGlyph) {
        let row_bytes = self.width as usize * 4;
        for row in 0..raster.height as usize {
            let src = &raster.coverage[row * raster.width as usize..][..raster.width as usize];
            let start = (y as usize + row) * row_bytes + x as usize * 4;
            let dst = &mut self.pixels[start..start + raster.width as usize * 4];
            for (pixel, &alpha) in dst.chunks_exact_mut(4).zip(src) {
                pixel.copy_from_slice(&[255, 255, 255, alpha]);
            }
        }
    }
}

/// `GlyphRenderer` that fills outlines on the CPU into a shelf-packed page.
pub struct ShelfRasterizer {
    font_size: f32,
    padding: u32,
    page: Mutex<Page>,
}

impl ShelfRasterizer {
    /// A `width` x `height` page rendering glyphs at `font_size` pixels per em.
    pub fn new(width: u32, height: u32, padding: u32, font_size: f32) -> Self {
        Self {
            font_size,
            padding,
            page: Mutex::new(Page::new(width, height)),
        }
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn page_size(&self) -> (u32, u32) {
        let page = self.page.lock();
        (page.width, page.height)
    }

    /// Copy of the page's RGBA pixels.
    pub fn pixels(&self) -> Vec<u8> {
        self.page.lock().pixels.clone()
    }

    /// Fraction of page rows consumed by shelves so far.
    pub fn fill_ratio(&self) -> f32 {
        let page = self.page.lock();
        if page.height == 0 {
            return 1.0;
        }
        (page.next_y + page.row_height) as f32 / page.height as f32
    }

    fn rasterize(&self, outline: &GlyphOutline, metrics: &GlyphMetrics) -> RasterizedGlyph {
        let scale = metrics.scale(self.font_size);
        let commands = zeno_commands(outline);
        if commands.is_empty() || scale == 0.0 {
            return RasterizedGlyph {
                width: 0,
                height: 0,
                bearing_x: 0.0,
                bearing_y: 0.0,
                coverage: Vec::new(),
            };
        }

        // Outlines are y-up in font units; BottomLeft keeps that orientation.
        let (coverage, placement) = Mask::new(&commands[..])
            .origin(Origin::BottomLeft)
            .transform(Some(Transform::scale(scale, scale)))
            .render();

        RasterizedGlyph {
            width: placement.width,
            height: placement.height,
            bearing_x: placement.left as f32,
            bearing_y: placement.top as f32,
            coverage,
        }
    }
}

impl Default for ShelfRasterizer {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE, DEFAULT_PADDING, 16.0)
    }
}

impl GlyphRenderer for ShelfRasterizer {
    type Slot = AtlasSlot;

    fn render_glyph(
        &self,
        key: GlyphKey,
        outline: &GlyphOutline,
        metrics: &GlyphMetrics,
    ) -> Result<AtlasSlot, RenderError> {
        let raster = self.rasterize(outline, metrics);
        if raster.width == 0 || raster.height == 0 {
            return Ok(AtlasSlot {
                x: 0,
                y: 0,
                width: 0,
                height: 0,
                bearing_x: raster.bearing_x,
                bearing_y: raster.bearing_y,
            });
        }

        let mut page = self.page.lock();
        let Some((x, y)) = page.allocate(raster.width, raster.height, self.padding) else {
            log::warn!(
                "Atlas page full while placing {} of {} ({}x{})",
                key.glyph,
                key.font,
                raster.width,
                raster.height
            );
            return Err(RenderError::AtlasFull {
                width: raster.width,
                height: raster.height,
                page_width: page.width,
                page_height: page.height,
            });
        };
        page.blit(x, y, &raster);

        Ok(AtlasSlot {
            x,
            y,
            width: raster.width,
            height: raster.height,
            bearing_x: raster.bearing_x,
            bearing_y: raster.bearing_y,
        })
    }

    fn reset(&self) {
        self.page.lock().reset();
    }
}

fn zeno_commands(outline: &GlyphOutline) -> Vec<Command> {
    outline
        .commands
        .iter()
        .map(|command| match *command {
            OutlineCommand::MoveTo(x, y) => Command::MoveTo(Vector::new(x, y)),
            OutlineCommand::LineTo(x, y) => Command::LineTo(Vector::new(x, y)),
            OutlineCommand::QuadTo(x1, y1, x, y) => {
                Command::QuadTo(Vector::new(x1, y1), Vector::new(x, y))
            }
            OutlineCommand::CurveTo(x1, y1, x2, y2, x, y) => Command::CurveTo(
                Vector::new(x1, y1),
                Vector::new(x2, y2),
                Vector::new(x, y),
            ),
            OutlineCommand::Close => Command::Close,
        })
        .collect()
}
