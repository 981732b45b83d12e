use std::io::Write;

use aa_core::error::CoreError;
use aa_core::frame::Frame;
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};

const TARGET: &str = "terminal";

/// How a new frame replaces the previous one on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RedrawMode {
    /// Rewrite only the lines that differ from the previous frame.
    #[default]
    Incremental,
    /// Clear the screen and rewrite every line, every frame.
    Full,
}

/// What one `present` call emitted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisplayStats {
    /// The screen was cleared and the cursor homed.
    pub cleared: bool,
    /// Number of lines written.
    pub lines_written: usize,
}

/// Terminal display that remembers the last frame it drew.
///
/// The first frame (or every frame in `RedrawMode::Full`) clears the
/// screen and writes all lines. Later frames only move the cursor to the
/// changed rows (`ESC[row;1H`) and overwrite them. Frame width is fixed for
/// a run, so no clear-to-end-of-line is emitted.
///
/// # Example
/// ```
/// use aa_core::frame::Frame;
/// use aa_render::display::{Display, RedrawMode};
///
/// let mut display = Display::new(RedrawMode::Incremental);
/// let mut out = Vec::new();
/// let first = Frame::from_lines(vec!["ab".into(), "cd".into()]);
/// assert!(display.present(&mut out, &first).unwrap().cleared);
///
/// let second = Frame::from_lines(vec!["ab".into(), "cx".into()]);
/// let stats = display.present(&mut out, &second).unwrap();
/// assert_eq!(stats.lines_written, 1);
/// ```
#[derive(Debug, Default)]
pub struct Display {
    previous: Vec<String>,
    mode: RedrawMode,
}

impl Display {
    /// Fresh display with nothing drawn yet.
    #[must_use]
    pub fn new(mode: RedrawMode) -> Self {
        Self {
            previous: Vec::new(),
            mode,
        }
    }

    /// Lines of the last frame presented.
    #[must_use]
    pub fn previous(&self) -> &[String] {
        &self.previous
    }

    /// Forget the last frame; the next `present` redraws everything.
    pub fn reset(&mut self) {
        self.previous.clear();
    }

    /// Draw `frame` and remember it as the previous frame.
    ///
    /// # Errors
    /// `OutputWrite` if the writer fails, `Argument` if the frame has more
    /// rows than a cursor position can address.
    pub fn present<W: Write>(&mut self, out: &mut W, frame: &Frame) -> Result<DisplayStats, CoreError> {
        let stats = if self.previous.is_empty() || self.mode == RedrawMode::Full {
            redraw_all(out, frame)?
        } else {
            self.redraw_changed(out, frame)?
        };
        out.flush().map_err(|e| CoreError::output(TARGET, e))?;

        self.previous.clone_from(&frame.lines);
        Ok(stats)
    }

    /// Move the cursor to the first row below the last frame, so that later
    /// output does not overwrite it.
    ///
    /// # Errors
    /// `OutputWrite` if the writer fails.
    pub fn park_cursor<W: Write>(&self, out: &mut W) -> Result<(), CoreError> {
        let row = row_index(self.previous.len())?;
        queue!(out, MoveTo(0, row)).map_err(|e| CoreError::output(TARGET, e))?;
        out.flush().map_err(|e| CoreError::output(TARGET, e))
    }

    fn redraw_changed<W: Write>(&self, out: &mut W, frame: &Frame) -> Result<DisplayStats, CoreError> {
        let mut written = 0;
        for (i, line) in frame.lines.iter().enumerate() {
            if self.previous.get(i) == Some(line) {
                continue;
            }
            let row = row_index(i)?;
            queue!(out, MoveTo(0, row), Print(line)).map_err(|e| CoreError::output(TARGET, e))?;
            written += 1;
        }
        Ok(DisplayStats {
            cleared: false,
            lines_written: written,
        })
    }
}

fn redraw_all<W: Write>(out: &mut W, frame: &Frame) -> Result<DisplayStats, CoreError> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0)).map_err(|e| CoreError::output(TARGET, e))?;
    for line in &frame.lines {
        queue!(out, Print(line), Print('\n')).map_err(|e| CoreError::output(TARGET, e))?;
    }
    Ok(DisplayStats {
        cleared: true,
        lines_written: frame.lines.len(),
    })
}

fn row_index(i: usize) -> Result<u16, CoreError> {
    u16::try_from(i).map_err(|_| CoreError::Argument(format!("ligne {i} hors de l'écran")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(lines: &[&str]) -> Frame {
        Frame::from_lines(lines.iter().map(|s| (*s).to_string()).collect())
    }

    fn text(out: &[u8]) -> String {
        String::from_utf8(out.to_vec()).unwrap()
    }

    #[test]
    fn first_frame_clears_and_writes_all() {
        let mut display = Display::new(RedrawMode::Incremental);
        let mut out = Vec::new();
        let stats = display.present(&mut out, &frame(&["aa", "bb", "cc"])).unwrap();

        assert_eq!(
            stats,
            DisplayStats {
                cleared: true,
                lines_written: 3
            }
        );
        let s = text(&out);
        assert!(s.starts_with("\x1b[2J\x1b[1;1H"));
        assert!(s.ends_with("aa\nbb\ncc\n"));
    }

    #[test]
    fn only_changed_lines_are_rewritten() {
        let mut display = Display::new(RedrawMode::Incremental);
        let mut out = Vec::new();
        let before = ["l0", "l1", "l2", "l3", "l4", "l5", "l6"];
        display.present(&mut out, &frame(&before)).unwrap();

        let mut after = before;
        after[2] = "X2";
        after[5] = "X5";
        out.clear();
        let stats = display.present(&mut out, &frame(&after)).unwrap();

        assert_eq!(
            stats,
            DisplayStats {
                cleared: false,
                lines_written: 2
            }
        );
        assert_eq!(text(&out), "\x1b[3;1HX2\x1b[6;1HX5");
        assert_eq!(display.previous(), &after);
    }

    #[test]
    fn identical_frame_writes_nothing() {
        let mut display = Display::new(RedrawMode::Incremental);
        let mut out = Vec::new();
        display.present(&mut out, &frame(&["ab", "cd"])).unwrap();
        out.clear();
        let stats = display.present(&mut out, &frame(&["ab", "cd"])).unwrap();
        assert_eq!(stats.lines_written, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn extra_rows_are_written() {
        let mut display = Display::new(RedrawMode::Incremental);
        let mut out = Vec::new();
        display.present(&mut out, &frame(&["ab"])).unwrap();
        out.clear();
        let stats = display.present(&mut out, &frame(&["ab", "cd"])).unwrap();
        assert_eq!(stats.lines_written, 1);
        assert_eq!(text(&out), "\x1b[2;1Hcd");
    }

    #[test]
    fn full_mode_always_redraws() {
        let mut display = Display::new(RedrawMode::Full);
        let mut out = Vec::new();
        display.present(&mut out, &frame(&["ab", "cd"])).unwrap();
        let stats = display.present(&mut out, &frame(&["ab", "cd"])).unwrap();
        assert!(stats.cleared);
        assert_eq!(stats.lines_written, 2);
    }

    #[test]
    fn reset_forces_full_redraw() {
        let mut display = Display::new(RedrawMode::Incremental);
        let mut out = Vec::new();
        display.present(&mut out, &frame(&["ab"])).unwrap();
        display.reset();
        assert!(display.present(&mut out, &frame(&["ab"])).unwrap().cleared);
    }

    #[test]
    fn rows_beyond_cursor_range_are_rejected() {
        let mut display = Display::new(RedrawMode::Incremental);
        let mut out = Vec::new();
        display.present(&mut out, &frame(&["a"])).unwrap();

        let tall = Frame::from_lines(vec!["z".to_string(); usize::from(u16::MAX) + 2]);
        out.clear();
        let err = display.present(&mut out, &tall).unwrap_err();
        assert!(matches!(err, CoreError::Argument(_)));
        assert_eq!(display.previous(), &["a"]);
    }

    #[test]
    fn park_cursor_moves_below_frame() {
        let mut display = Display::new(RedrawMode::Incremental);
        let mut out = Vec::new();
        display.present(&mut out, &frame(&["a", "b", "c"])).unwrap();
        out.clear();
        display.park_cursor(&mut out).unwrap();
        assert_eq!(text(&out), "\x1b[4;1H");
    }
}
