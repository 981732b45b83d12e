use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::CoreError;

/// Default location of the coverage table, relative to the working directory.
pub const DEFAULT_TABLE_PATH: &str = "charsizes.txt";

/// Ink coverage measured for one glyph.
///
/// `density` is the share of "ink" sub-pixels of a large rasterization,
/// scaled to an integer range (0..=10000 for typical glyphs).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoverageEntry {
    /// Glyph measured.
    pub glyph: char,
    /// Normalized ink coverage.
    pub density: u32,
}

/// Ordered `(glyph, density)` table, densest glyph first.
///
/// # Example
/// ```
/// use aa_core::coverage::{CoverageEntry, CoverageTable};
/// let table = CoverageTable::from_unsorted(vec![
///     CoverageEntry { glyph: '.', density: 0 },
///     CoverageEntry { glyph: '@', density: 10000 },
/// ]);
/// assert_eq!(table.entries()[0].glyph, '@');
/// assert_eq!(table.max_density(), Some(10000));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoverageTable {
    entries: Vec<CoverageEntry>,
}

impl CoverageTable {
    /// Wrap entries that are already sorted descending by density.
    ///
    /// No re-sort happens: this is the shape produced by the builder and
    /// expected from table files.
    #[must_use]
    pub fn from_sorted(entries: Vec<CoverageEntry>) -> Self {
        Self { entries }
    }

    /// Sort entries descending by density. Ties keep their input order.
    #[must_use]
    pub fn from_unsorted(mut entries: Vec<CoverageEntry>) -> Self {
        entries.sort_by(|a, b| b.density.cmp(&a.density));
        Self { entries }
    }

    /// Entries in table order.
    #[must_use]
    pub fn entries(&self) -> &[CoverageEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the table has no entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Density of the first entry, which is the maximum of a sorted table.
    #[must_use]
    pub fn max_density(&self) -> Option<u32> {
        self.entries.first().map(|e| e.density)
    }

    /// Glyph whose density is nearest to `target`.
    ///
    /// Every entry is compared. On equal distance the entry appearing first
    /// in table order wins.
    ///
    /// # Example
    /// ```
    /// use aa_core::coverage::{CoverageEntry, CoverageTable};
    /// let table = CoverageTable::from_sorted(vec![
    ///     CoverageEntry { glyph: '@', density: 10000 },
    ///     CoverageEntry { glyph: 'o', density: 5000 },
    ///     CoverageEntry { glyph: '.', density: 0 },
    /// ]);
    /// assert_eq!(table.nearest(4000), Some('o'));
    /// ```
    #[must_use]
    pub fn nearest(&self, target: u64) -> Option<char> {
        let mut best: Option<(u64, char)> = None;
        for entry in &self.entries {
            let distance = u64::from(entry.density).abs_diff(target);
            match best {
                Some((d, _)) if d <= distance => {}
                _ => best = Some((distance, entry.glyph)),
            }
        }
        best.map(|(_, glyph)| glyph)
    }

    /// Load a table file: one `<glyph> <density>` per line, no header.
    ///
    /// # Errors
    /// `CoverageTableIo` if the file cannot be opened or read,
    /// `CoverageTableParse` on a malformed line.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let file = File::open(path).map_err(|source| CoreError::CoverageTableIo {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::read_from(BufReader::new(file)).map_err(|e| match e {
            CoreError::CoverageTableRead(source) => CoreError::CoverageTableIo {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        log::debug!("{} entrées chargées depuis {}", table.len(), path.display());
        Ok(table)
    }

    /// Parse a table from any buffered reader.
    ///
    /// Blank lines are ignored. The density field starts right after the
    /// glyph and its single separator.
    ///
    /// # Errors
    /// `CoverageTableRead` on read failure, `CoverageTableParse` on a malformed line.
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self, CoreError> {
        let mut entries = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(CoreError::CoverageTableRead)?;
            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                continue;
            }
            entries.push(parse_line(idx + 1, line)?);
        }
        Ok(Self { entries })
    }

    /// Write the table to `path`, one entry per line.
    ///
    /// # Errors
    /// `OutputWrite` if the file cannot be created or written.
    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        let target = path.display().to_string();
        let file = File::create(path).map_err(|e| CoreError::output(&target, e))?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)
            .and_then(|()| writer.flush())
            .map_err(|e| CoreError::output(target, e))
    }

    /// Serialize entries as `<glyph> <density>\n` lines.
    ///
    /// # Errors
    /// Propagates writer failures.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for entry in &self.entries {
            writeln!(writer, "{} {}", entry.glyph, entry.density)?;
        }
        Ok(())
    }
}

fn parse_line(line_no: usize, line: &str) -> Result<CoverageEntry, CoreError> {
    let malformed = || CoreError::CoverageTableParse {
        line: line_no,
        content: line.to_string(),
    };
    let glyph = line.chars().next().ok_or_else(malformed)?;
    let rest = line.get(glyph.len_utf8() + 1..).ok_or_else(malformed)?;
    let density = rest.trim().parse::<u32>().map_err(|_| malformed())?;
    Ok(CoverageEntry { glyph, density })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(glyph: char, density: u32) -> CoverageEntry {
        CoverageEntry { glyph, density }
    }

    #[test]
    fn parses_space_glyph_and_keeps_file_order() {
        let text = "@ 10000\no 5000\n  0\n";
        let table = CoverageTable::read_from(text.as_bytes()).unwrap();
        assert_eq!(
            table.entries(),
            &[entry('@', 10000), entry('o', 5000), entry(' ', 0)]
        );
    }

    #[test]
    fn missing_density_is_a_parse_error() {
        let err = CoverageTable::read_from("@ 10\n#\n".as_bytes()).unwrap_err();
        assert!(matches!(err, CoreError::CoverageTableParse { line: 2, .. }));

        let err = CoverageTable::read_from("# abc\n".as_bytes()).unwrap_err();
        assert!(matches!(err, CoreError::CoverageTableParse { line: 1, .. }));
    }

    #[test]
    fn stream_read_failure_carries_no_path() {
        let invalid_utf8: &[u8] = b"@ 10\n\xff 3\n";
        let err = CoverageTable::read_from(invalid_utf8).unwrap_err();
        assert!(matches!(err, CoreError::CoverageTableRead(_)));
    }

    #[test]
    fn load_labels_read_failure_with_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        std::fs::write(&path, b"@ 10\n\xe9 3\n").unwrap();
        match CoverageTable::load(&path).unwrap_err() {
            CoreError::CoverageTableIo { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CoverageTable::load(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, CoreError::CoverageTableIo { .. }));
    }

    #[test]
    fn save_then_load_preserves_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charsizes.txt");
        let table = CoverageTable::from_unsorted(vec![
            entry(' ', 0),
            entry('#', 6120),
            entry('.', 310),
            entry('@', 7400),
        ]);
        table.save(&path).unwrap();

        let loaded = CoverageTable::load(&path).unwrap();
        assert_eq!(loaded, table);
        assert_eq!(loaded.entries()[0], entry('@', 7400));
        assert_eq!(loaded.entries()[3], entry(' ', 0));
    }

    #[test]
    fn unsorted_ties_keep_input_order() {
        let table = CoverageTable::from_unsorted(vec![entry('a', 5), entry('b', 9), entry('c', 5)]);
        let glyphs: String = table.entries().iter().map(|e| e.glyph).collect();
        assert_eq!(glyphs, "bac");
    }

    #[test]
    fn nearest_prefers_earliest_on_tie() {
        let table = CoverageTable::from_sorted(vec![entry('x', 200), entry('y', 100)]);
        assert_eq!(table.nearest(150), Some('x'));
        assert_eq!(CoverageTable::default().nearest(0), None);
    }
}
