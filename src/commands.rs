//! Subcommand implementations.
//!
//! Each command writes its report to a `Write` so it can be captured.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use fontbook_config::{AtlasConfig, Config};
use fontbook_fonts::{CapabilitySet, FontBook, FontId, OpenTypeLoader, graphemes};
use fontbook_render::{GlyphAtlas, ShelfRasterizer};

use crate::cli::{Cli, Commands};
use crate::setup::FontSetup;

/// Build the font book described by `config` and `cli`, then run the
/// requested subcommand against stdout.
pub fn run(cli: &Cli, config: &Config) -> Result<()> {
    let setup = FontSetup::from_config(config, &cli.font_dirs, cli.no_system_fonts);
    let book = setup.build(Arc::new(OpenTypeLoader))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&cli.command, &book, &config.atlas, &mut out)
}

/// Run one subcommand against an existing book.
pub fn execute(
    command: &Commands,
    book: &FontBook,
    atlas: &AtlasConfig,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Commands::Families => list_families(book, out),
        Commands::Resolve {
            family,
            weight,
            italic,
        } => resolve(book, family, *weight, *italic, out),
        Commands::Glyphs {
            family,
            text,
            weight,
            italic,
            render,
        } => {
            let font = book.find_font_by_name(family, *weight, *italic);
            if *render {
                let atlas = GlyphAtlas::new(ShelfRasterizer::new(
                    atlas.width,
                    atlas.height,
                    atlas.padding,
                    atlas.font_size,
                ));
                print_glyphs(book, font, text, Some(&atlas), out)
            } else {
                print_glyphs(book, font, text, None, out)
            }
        }
    }
}

/// One line per family, then one indented line per populated slot.
pub fn list_families(book: &FontBook, out: &mut impl Write) -> Result<()> {
    let mut families = book.families();
    families.sort_by(|a, b| a.name.cmp(&b.name));

    for family in families {
        let marker = if family.id == book.last_resort_family() {
            " [last resort]"
        } else {
            ""
        };
        writeln!(out, "{} ({}){}", family.name, family.id, marker)?;
        for (variant, font) in family.variants {
            writeln!(out, "  {:<20} {}", variant.to_string(), font)?;
        }
    }
    writeln!(
        out,
        "{} families, {} fonts",
        book.family_count(),
        book.font_count()
    )?;
    Ok(())
}

/// Report the family and font a request lands on.
pub fn resolve(
    book: &FontBook,
    family_name: &str,
    weight: u16,
    italic: bool,
    out: &mut impl Write,
) -> Result<()> {
    let family = book.find_family(family_name);
    let resolved_name = book.family_name(family).unwrap_or_default();
    let font = book.find_font(family, weight, italic);
    let description = book
        .description(font)
        .with_context(|| format!("resolved {font} has no description"))?;

    let style = if italic { "italic" } else { "upright" };
    writeln!(out, "requested:    {family_name} {weight} {style}")?;
    let via = if resolved_name == family_name {
        ""
    } else {
        " (via fallback)"
    };
    writeln!(out, "family:       {resolved_name} ({family}){via}")?;
    writeln!(out, "font:         {font} {}", description.variant())?;
    if let Some(source) = book.source(font) {
        writeln!(out, "source:       {}", source.display_name())?;
    }
    writeln!(
        out,
        "declared:     {} weight {}, width {}, {}",
        description.family_name,
        description.weight,
        description.width,
        if description.italic { "italic" } else { "upright" }
    )?;
    if let Some(size) = description.design_size {
        writeln!(out, "design size:  {size}pt")?;
    }
    writeln!(
        out,
        "capabilities: {}",
        capability_names(&description.capabilities)
    )?;
    Ok(())
}

/// Shape `text` with `font` and print the run grapheme by grapheme.
///
/// With an atlas, each glyph is also rasterized and its slot printed. Render
/// failures are reported inline unless they are fatal.
pub fn print_glyphs(
    book: &FontBook,
    font: FontId,
    text: &str,
    atlas: Option<&GlyphAtlas<ShelfRasterizer>>,
    out: &mut impl Write,
) -> Result<()> {
    let run = book.find_glyphs_in_text(font, text)?;
    let clusters = graphemes(text);

    for (index, grapheme) in clusters.iter().enumerate() {
        let code_points: Vec<String> = grapheme
            .code_points()
            .map(|c| format!("U+{:04X}", u32::from(c)))
            .collect();
        writeln!(out, "{index:>3} {:?} [{}]", grapheme.as_str(), code_points.join(" "))?;

        for placed in run.iter().filter(|g| g.grapheme == index) {
            let glyph = placed.glyph;
            write!(out, "      {} {}", glyph.font, glyph.index)?;
            if glyph.index.is_missing() {
                write!(out, " (missing)")?;
            }
            if placed.kerning != 0.0 {
                write!(out, " kern {}", placed.kerning)?;
            }
            if let Some(atlas) = atlas {
                match atlas.lookup_glyph(book, glyph) {
                    Ok(slot) if slot.is_empty() => write!(out, " slot empty")?,
                    Ok(slot) => write!(
                        out,
                        " slot {},{} {}x{}",
                        slot.x, slot.y, slot.width, slot.height
                    )?,
                    Err(e) if e.is_fatal() => return Err(e.into()),
                    Err(e) => write!(out, " unrendered: {e}")?,
                }
            }
            writeln!(out)?;
        }
    }

    writeln!(out, "{} glyphs for {} graphemes", run.len(), clusters.len())?;
    if let Some(atlas) = atlas {
        let stats = atlas.stats();
        writeln!(
            out,
            "atlas: {} entries, {} renders, {} hits, {} misses, {:.1}% filled",
            stats.entries,
            stats.renders,
            stats.hits,
            stats.misses,
            atlas.renderer().fill_ratio() * 100.0
        )?;
    }
    Ok(())
}

fn capability_names(capabilities: &CapabilitySet) -> String {
    let names: Vec<&str> = [
        (capabilities.character_map, "cmap"),
        (capabilities.outlines, "outlines"),
        (capabilities.metrics, "metrics"),
        (capabilities.kerning, "kerning"),
        (capabilities.morphing, "morphing"),
    ]
    .into_iter()
    .filter_map(|(present, name)| present.then_some(name))
    .collect();

    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(" ")
    }
}
