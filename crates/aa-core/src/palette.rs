use std::fmt;

use crate::coverage::CoverageTable;
use crate::error::CoreError;

/// Largest palette `select` accepts: `quantize` reaches at most 256 indices.
pub const MAX_PALETTE_SIZE: usize = 256;

/// Ordered glyphs used as picture elements, sparse first.
///
/// Built once per run, either from a coverage table or from an explicit
/// string, then read-only.
///
/// # Example
/// ```
/// use aa_core::palette::Palette;
/// let palette = Palette::from_chars(" .:#@").unwrap();
/// assert_eq!(palette.len(), 5);
/// assert_eq!(palette.inverted().to_string(), "@#:. ");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    glyphs: Vec<char>,
}

impl Palette {
    /// Pick `size` glyphs whose densities are evenly spaced from 0 up to the
    /// table's maximum density.
    ///
    /// Target `i` is `(max / (size - 1)) * i` in integer arithmetic, and the
    /// glyph with the nearest density is chosen for it.
    ///
    /// # Errors
    /// `Argument` if `size` is outside `2..=MAX_PALETTE_SIZE`,
    /// `EmptyCoverageTable` if the table is empty.
    ///
    /// # Example
    /// ```
    /// use aa_core::coverage::{CoverageEntry, CoverageTable};
    /// use aa_core::palette::Palette;
    /// let table = CoverageTable::from_sorted(vec![
    ///     CoverageEntry { glyph: '@', density: 10000 },
    ///     CoverageEntry { glyph: 'o', density: 5000 },
    ///     CoverageEntry { glyph: '.', density: 0 },
    /// ]);
    /// let palette = Palette::select(&table, 3).unwrap();
    /// assert_eq!(palette.to_string(), ".o@");
    /// ```
    pub fn select(table: &CoverageTable, size: usize) -> Result<Self, CoreError> {
        if !(2..=MAX_PALETTE_SIZE).contains(&size) {
            return Err(CoreError::Argument(format!(
                "la palette doit contenir entre 2 et {MAX_PALETTE_SIZE} caractères (reçu {size})"
            )));
        }
        let max = table.max_density().ok_or(CoreError::EmptyCoverageTable)?;
        let step = u64::from(max) / (size as u64 - 1);

        let mut glyphs = Vec::with_capacity(size);
        for i in 0..size as u64 {
            let glyph = table
                .nearest(step * i)
                .ok_or(CoreError::EmptyCoverageTable)?;
            glyphs.push(glyph);
        }
        Ok(Self { glyphs })
    }

    /// Use an explicit glyph string, bypassing the coverage table.
    ///
    /// # Errors
    /// `Argument` if the string is empty.
    pub fn from_chars(chars: &str) -> Result<Self, CoreError> {
        let glyphs: Vec<char> = chars.chars().collect();
        if glyphs.is_empty() {
            return Err(CoreError::Argument("palette explicite vide".into()));
        }
        Ok(Self { glyphs })
    }

    /// Same glyphs in reverse order.
    #[must_use]
    pub fn inverted(&self) -> Self {
        let mut glyphs = self.glyphs.clone();
        glyphs.reverse();
        Self { glyphs }
    }

    /// Glyphs in palette order.
    #[must_use]
    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    /// Number of glyphs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always `false` for a constructed palette.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for glyph in &self.glyphs {
            write!(f, "{glyph}")?;
        }
        Ok(())
    }
}

/// Palette index for a luminance sample: `luminance * len / 256`.
///
/// Always `< len` for `len >= 1`.
///
/// # Example
/// ```
/// use aa_core::palette::quantize;
/// assert_eq!(quantize(0, 4), 0);
/// assert_eq!(quantize(255, 4), 3);
/// assert_eq!(quantize(128, 4), 2);
/// ```
#[inline(always)]
#[must_use]
pub fn quantize(luminance: u8, len: usize) -> usize {
    usize::from(luminance) * len / 256
}

/// Lookup table mapping luminance [0..255] → glyph.
///
/// Pre-computed from a palette at startup for O(1) per-pixel cost.
///
/// # Example
/// ```
/// use aa_core::palette::{LuminanceLut, Palette};
/// let lut = LuminanceLut::new(&Palette::from_chars(" .:#@").unwrap());
/// assert_eq!(lut.map(0), ' ');
/// assert_eq!(lut.map(255), '@');
/// ```
#[derive(Clone)]
pub struct LuminanceLut {
    lut: [char; 256],
}

impl LuminanceLut {
    /// Build the table from a palette ordered as it should be rendered.
    #[must_use]
    pub fn new(palette: &Palette) -> Self {
        let glyphs = palette.glyphs();
        let mut lut = [' '; 256];
        if glyphs.is_empty() {
            return Self { lut };
        }
        for (lum, slot) in (0..=255u8).zip(lut.iter_mut()) {
            *slot = glyphs[quantize(lum, glyphs.len())];
        }
        Self { lut }
    }

    /// Map a luminance value [0..255] to a glyph.
    #[inline(always)]
    #[must_use]
    pub fn map(&self, luminance: u8) -> char {
        self.lut[usize::from(luminance)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::CoverageEntry;

    fn table(pairs: &[(char, u32)]) -> CoverageTable {
        CoverageTable::from_sorted(
            pairs
                .iter()
                .map(|&(glyph, density)| CoverageEntry { glyph, density })
                .collect(),
        )
    }

    #[test]
    fn quantize_is_total() {
        for len in 1..=70usize {
            for lum in 0..=255u8 {
                assert!(quantize(lum, len) < len, "lum {lum} len {len}");
            }
        }
    }

    #[test]
    fn select_spans_to_max_density() {
        let t = table(&[('@', 10000), ('o', 5000), ('.', 0)]);
        let palette = Palette::select(&t, 3).unwrap();
        assert_eq!(palette.glyphs(), &['.', 'o', '@']);
    }

    #[test]
    fn select_last_glyph_is_nearest_max() {
        let t = table(&[('M', 7312), ('#', 6050), ('+', 2210), (':', 980), (' ', 0)]);
        for size in 2..=8 {
            let palette = Palette::select(&t, size).unwrap();
            assert_eq!(palette.len(), size);
            assert_eq!(palette.glyphs()[size - 1], 'M');
            assert_eq!(palette.glyphs()[0], ' ');
        }
    }

    #[test]
    fn select_rejects_empty_table_and_tiny_size() {
        assert!(matches!(
            Palette::select(&CoverageTable::default(), 4),
            Err(CoreError::EmptyCoverageTable)
        ));
        let t = table(&[('@', 1)]);
        assert!(matches!(Palette::select(&t, 1), Err(CoreError::Argument(_))));
    }

    #[test]
    fn select_rejects_oversized_palette() {
        let t = table(&[('@', 10_000), (' ', 0)]);
        assert_eq!(Palette::select(&t, MAX_PALETTE_SIZE).unwrap().len(), MAX_PALETTE_SIZE);
        assert!(matches!(
            Palette::select(&t, MAX_PALETTE_SIZE + 1),
            Err(CoreError::Argument(_))
        ));
        assert!(matches!(Palette::select(&t, usize::MAX), Err(CoreError::Argument(_))));
    }

    #[test]
    fn invert_twice_is_identity() {
        let palette = Palette::from_chars(" .-=+*#%@").unwrap();
        assert_eq!(palette.inverted().inverted(), palette);
    }

    #[test]
    fn explicit_palette_must_not_be_empty() {
        assert!(Palette::from_chars("").is_err());
    }

    #[test]
    fn lut_monotonic() {
        let palette = Palette::from_chars(" .:#@").unwrap();
        let lut = LuminanceLut::new(&palette);
        let mut prev_idx = 0usize;
        for i in 0..=255u8 {
            let ch = lut.map(i);
            let idx = palette.glyphs().iter().position(|&c| c == ch).unwrap();
            assert!(idx >= prev_idx, "LUT non monotone à luminance {i}");
            prev_idx = idx;
        }
    }
}
