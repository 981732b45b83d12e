use crate::error::CoreError;

/// Owned rectangular pixel buffer, row-major, one byte per channel.
///
/// `channels` is 1 (gray), 2 (gray + alpha), 3 (RGB) or 4 (RGBA).
///
/// # Example
/// ```
/// use aa_core::frame::PixelBuffer;
/// let buf = PixelBuffer::new(10, 10, 3).unwrap();
/// assert_eq!(buf.data.len(), 300);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Samples, `width * height * channels` bytes.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Bytes per pixel.
    pub channels: u8,
}

impl PixelBuffer {
    /// Allocate a zeroed (black) buffer.
    ///
    /// # Errors
    /// `UnsupportedChannels` outside 1..=4, `Allocation` if the memory
    /// cannot be reserved.
    pub fn new(width: u32, height: u32, channels: u8) -> Result<Self, CoreError> {
        check_channels(channels)?;
        let bytes = byte_len(width, height, channels)?;
        let mut data = Vec::new();
        data.try_reserve_exact(bytes)
            .map_err(|_| CoreError::Allocation { bytes })?;
        data.resize(bytes, 0);
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Wrap decoded samples.
    ///
    /// # Errors
    /// `UnsupportedChannels` outside 1..=4, `Argument` if `data` does not
    /// match the dimensions.
    pub fn from_raw(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self, CoreError> {
        check_channels(channels)?;
        let bytes = byte_len(width, height, channels)?;
        if data.len() != bytes {
            return Err(CoreError::Argument(format!(
                "buffer de {} octets pour {width}×{height}×{channels}",
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Samples of pixel (x, y), `channels` bytes long.
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let c = usize::from(self.channels);
        let idx = (y as usize * self.width as usize + x as usize) * c;
        &self.data[idx..idx + c]
    }

    /// (r, g, b) of pixel (x, y).
    ///
    /// Gray buffers replicate the first sample; alpha is ignored.
    ///
    /// # Example
    /// ```
    /// use aa_core::frame::PixelBuffer;
    /// let buf = PixelBuffer::from_raw(1, 1, 2, vec![90, 255]).unwrap();
    /// assert_eq!(buf.rgb(0, 0), (90, 90, 90));
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn rgb(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let px = self.pixel(x, y);
        if px.len() >= 3 {
            (px[0], px[1], px[2])
        } else {
            (px[0], px[0], px[0])
        }
    }
}

/// Perceptual luminance, ITU-R BT.601 weights, truncated to 8 bits.
///
/// Fixed-point so that r = g = b = v yields exactly v.
///
/// # Example
/// ```
/// use aa_core::frame::luminance_bt601;
/// assert_eq!(luminance_bt601(255, 255, 255), 255);
/// assert_eq!(luminance_bt601(255, 0, 0), 76);
/// ```
#[inline(always)]
#[must_use]
pub fn luminance_bt601(r: u8, g: u8, b: u8) -> u8 {
    ((u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000) as u8
}

fn check_channels(channels: u8) -> Result<(), CoreError> {
    if (1..=4).contains(&channels) {
        Ok(())
    } else {
        Err(CoreError::UnsupportedChannels { channels })
    }
}

fn byte_len(width: u32, height: u32, channels: u8) -> Result<usize, CoreError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(usize::from(channels)))
        .ok_or(CoreError::Allocation { bytes: usize::MAX })
}

/// One rendered grid: `height` lines of `width` glyphs, possibly with
/// embedded color escapes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    /// Rendered rows, top to bottom.
    pub lines: Vec<String>,
}

impl Frame {
    /// Frame from ready-made lines.
    #[must_use]
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.lines.len()
    }

    /// `true` when the frame has no row (the "nothing displayed yet" state).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
