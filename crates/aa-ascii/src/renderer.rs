use aa_core::error::CoreError;
use aa_core::frame::{Frame, PixelBuffer, luminance_bt601};
use aa_core::palette::LuminanceLut;
use std::fmt::Write;

/// Attribute reset closing every colored line.
pub const RESET: &str = "\x1b[0m";

/// Which representations a render call must produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Produce the terminal frame.
    pub terminal: bool,
    /// Produce the plain frame for the output file.
    pub file: bool,
    /// Prefix terminal glyphs with truecolor escapes. Off = grayscale pipeline.
    pub color: bool,
}

/// Frames produced by one render call, one per active sink.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderedFrame {
    /// Terminal lines (colored when `RenderOptions::color`).
    pub terminal: Option<Frame>,
    /// Glyph-only lines.
    pub file: Option<Frame>,
}

/// Convert a pixel buffer into glyph lines, one glyph per pixel.
///
/// Each pixel's luminance (BT.601) is quantized once through `lut`; the
/// terminal and file frames share that glyph. Colored terminal lines carry
/// `ESC[38;2;R;G;Bm` before every glyph and `ESC[0m` at the end of the line.
///
/// # Errors
/// `UnsupportedChannels` for 2-channel buffers in color mode, or for a
/// channel count outside 1..=4.
///
/// # Example
/// ```
/// use aa_core::frame::PixelBuffer;
/// use aa_core::palette::{LuminanceLut, Palette};
/// use aa_ascii::renderer::{render_frame, RenderOptions};
///
/// let buf = PixelBuffer::from_raw(2, 1, 1, vec![0, 255]).unwrap();
/// let lut = LuminanceLut::new(&Palette::from_chars(" @").unwrap());
/// let opts = RenderOptions { terminal: false, file: true, color: false };
/// let out = render_frame(&buf, &lut, opts).unwrap();
/// assert_eq!(out.file.unwrap().lines, vec![" @".to_string()]);
/// ```
pub fn render_frame(
    buffer: &PixelBuffer,
    lut: &LuminanceLut,
    opts: RenderOptions,
) -> Result<RenderedFrame, CoreError> {
    match buffer.channels {
        1 | 3 | 4 => {}
        2 if !opts.color => {}
        channels => return Err(CoreError::UnsupportedChannels { channels }),
    }

    let colored = opts.terminal && opts.color;
    let want_plain = opts.file || (opts.terminal && !opts.color);
    let rows = buffer.height as usize;
    let cols = buffer.width as usize;

    let mut colored_lines = Vec::with_capacity(if colored { rows } else { 0 });
    let mut plain_lines = Vec::with_capacity(if want_plain { rows } else { 0 });

    for y in 0..buffer.height {
        let mut colored_line = String::new();
        let mut plain_line = String::with_capacity(if want_plain { cols } else { 0 });
        if colored {
            // "\x1b[38;2;255;255;255m" is 19 bytes
            colored_line.reserve(cols * 20 + 4);
        }

        for x in 0..buffer.width {
            let (r, g, b) = buffer.rgb(x, y);
            let glyph = lut.map(luminance_bt601(r, g, b));
            if colored {
                push_colored(&mut colored_line, glyph, (r, g, b));
            }
            if want_plain {
                plain_line.push(glyph);
            }
        }

        if colored {
            push_reset(&mut colored_line);
            colored_lines.push(colored_line);
        }
        if want_plain {
            plain_lines.push(plain_line);
        }
    }

    let plain = want_plain.then(|| Frame::from_lines(plain_lines));
    let terminal = if colored {
        Some(Frame::from_lines(colored_lines))
    } else if opts.terminal {
        plain.clone()
    } else {
        None
    };
    let file = if opts.file { plain } else { None };

    Ok(RenderedFrame { terminal, file })
}

// Exact escape bytes, independent of NO_COLOR.
#[inline]
fn push_colored(line: &mut String, glyph: char, (r, g, b): (u8, u8, u8)) {
    // fmt::Write into a String never fails.
    let _ = write!(line, "\x1b[38;2;{r};{g};{b}m{glyph}");
}

#[inline]
fn push_reset(line: &mut String) {
    line.push_str(RESET);
}
