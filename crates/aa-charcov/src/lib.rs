/// Offline coverage-table builder for asciiart.
///
/// Rasterizes every printable ASCII glyph of a font at a large size and
/// records how much of it is ink.

use std::ops::RangeInclusive;
use std::path::Path;

use aa_core::coverage::{CoverageEntry, CoverageTable};
use aa_core::error::CoreError;
use ab_glyph::{Font, FontVec, PxScale};

/// Em size of the rasterization, in pixels.
pub const PIXEL_HEIGHT: u32 = 1024;

/// Average advance width of a monospace glyph relative to its em size.
pub const WIDTH_RATIO: f64 = 0.442;

/// Density of a glyph covering the whole nominal cell.
pub const DENSITY_SCALE: u64 = 10_000;

/// A sub-pixel counts as ink when its 8-bit coverage exceeds this.
pub const INK_THRESHOLD: u8 = 0;

/// Printable ASCII.
pub const CODEPOINTS: RangeInclusive<u32> = 32..=126;

/// Normalization area: `PIXEL_HEIGHT * WIDTH_RATIO * PIXEL_HEIGHT`.
#[must_use]
pub fn divisor() -> u64 {
    (f64::from(PIXEL_HEIGHT) * WIDTH_RATIO * f64::from(PIXEL_HEIGHT)) as u64
}

/// Density for `filled` ink sub-pixels.
///
/// # Example
/// ```
/// use aa_charcov::{density, divisor, DENSITY_SCALE};
/// assert_eq!(density(0), 0);
/// assert_eq!(u64::from(density(divisor())), DENSITY_SCALE);
/// ```
#[must_use]
pub fn density(filled: u64) -> u32 {
    (filled * DENSITY_SCALE / divisor()) as u32
}

/// Read and parse a font file.
///
/// # Errors
/// `FontLoad` if the file cannot be read or is not a font.
pub fn load_font(path: &Path) -> Result<FontVec, CoreError> {
    let data = std::fs::read(path).map_err(|e| CoreError::FontLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    FontVec::try_from_vec(data).map_err(|e| CoreError::FontLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Count the ink sub-pixels of `ch` rasterized with its em at
/// `PIXEL_HEIGHT` pixels.
///
/// `None` when the font has no glyph for `ch`; `Some(0)` for glyphs
/// without outline, such as the space.
pub fn filled_pixels<F: Font>(font: &F, ch: char) -> Option<u64> {
    let id = font.glyph_id(ch);
    if id.0 == 0 {
        return None;
    }
    let units_per_em = font.units_per_em().unwrap_or(1000.0);
    let scale = PxScale::from(PIXEL_HEIGHT as f32 * font.height_unscaled() / units_per_em);

    let Some(outline) = font.outline_glyph(id.with_scale(scale)) else {
        return Some(0);
    };
    let mut filled = 0u64;
    outline.draw(|_, _, coverage| {
        if (coverage * 255.0) as u8 > INK_THRESHOLD {
            filled += 1;
        }
    });
    Some(filled)
}

/// Measure every printable ASCII glyph and sort the results densest first.
///
/// Glyphs the font lacks are skipped.
pub fn build_table<F: Font>(font: &F) -> CoverageTable {
    let mut entries = Vec::with_capacity(CODEPOINTS.count());
    for glyph in CODEPOINTS.filter_map(char::from_u32) {
        match filled_pixels(font, glyph) {
            Some(filled) => entries.push(CoverageEntry {
                glyph,
                density: density(filled),
            }),
            None => log::warn!("Glyphe absent de la police : {glyph:?}"),
        }
    }
    CoverageTable::from_unsorted(entries)
}

/// Load `font_path`, measure it and write the table to `output`.
///
/// # Errors
/// `FontLoad` if the font cannot be opened, `OutputWrite` if the table
/// cannot be written.
pub fn build_table_file(font_path: &Path, output: &Path) -> Result<CoverageTable, CoreError> {
    let font = load_font(font_path)?;
    let table = build_table(&font);
    log::info!(
        "{} glyphes mesurés dans {}",
        table.len(),
        font_path.display()
    );
    table.save(output)?;
    Ok(table)
}
