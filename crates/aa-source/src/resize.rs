use std::path::Path;

use aa_core::error::CoreError;
use aa_core::frame::PixelBuffer;
use fast_image_resize::images::{Image, ImageRef};
use fast_image_resize::{PixelType, ResizeOptions, Resizer as FirResizer};

/// Resizer réutilisable wrappant fast_image_resize.
///
/// Handles 1 to 4 channel `PixelBuffer`s.
///
/// # Example
/// ```
/// use aa_source::resize::Resizer;
/// use aa_core::frame::PixelBuffer;
/// let mut r = Resizer::new();
/// let src = PixelBuffer::new(100, 100, 3).unwrap();
/// let dst = r.resize(&src, 50, 20).unwrap();
/// assert_eq!((dst.width, dst.height, dst.channels), (50, 20, 3));
/// ```
pub struct Resizer {
    inner: FirResizer,
    options: ResizeOptions,
}

impl Resizer {
    /// Create a new resizer with the default (convolution) filter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: FirResizer::new(),
            options: ResizeOptions::new(),
        }
    }

    /// Resize `src` to `width × height`, same channel layout.
    ///
    /// # Errors
    /// `Argument` for zero dimensions or a failing resize,
    /// `Allocation` if the destination cannot be allocated.
    pub fn resize(
        &mut self,
        src: &PixelBuffer,
        width: u32,
        height: u32,
    ) -> Result<PixelBuffer, CoreError> {
        if width == 0 || height == 0 {
            return Err(CoreError::Argument(format!(
                "dimensions de sortie invalides : {width}×{height}"
            )));
        }
        if src.width == width && src.height == height {
            return Ok(src.clone());
        }

        let pixel_type = pixel_type(src.channels)?;
        let mut dst = PixelBuffer::new(width, height, src.channels)?;

        let src_image = ImageRef::new(src.width, src.height, &src.data, pixel_type)
            .map_err(|e| CoreError::Argument(format!("source invalide : {e}")))?;
        let mut dst_image = Image::from_slice_u8(width, height, &mut dst.data, pixel_type)
            .map_err(|e| CoreError::Argument(format!("destination invalide : {e}")))?;

        self.inner
            .resize(&src_image, &mut dst_image, Some(&self.options))
            .map_err(|e| CoreError::Argument(format!("redimensionnement impossible : {e}")))?;

        Ok(dst)
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}

fn pixel_type(channels: u8) -> Result<PixelType, CoreError> {
    match channels {
        1 => Ok(PixelType::U8),
        2 => Ok(PixelType::U8x2),
        3 => Ok(PixelType::U8x3),
        4 => Ok(PixelType::U8x4),
        _ => Err(CoreError::UnsupportedChannels { channels }),
    }
}

/// Output height keeping the image aspect, squashed by `aspect_ratio` to
/// compensate for tall terminal cells. Never below 1.
///
/// # Example
/// ```
/// use aa_source::resize::derived_height;
/// assert_eq!(derived_height(128, 200, 100, 0.45), 28);
/// ```
#[must_use]
pub fn derived_height(width: u32, img_width: u32, img_height: u32, aspect_ratio: f32) -> u32 {
    if img_width == 0 {
        return 1;
    }
    let h = width as f32 * (img_height as f32 / img_width as f32) * aspect_ratio;
    (h as u32).max(1)
}

/// Decode `path` and resize it to `width` glyph columns.
///
/// # Errors
/// Propagates decode, allocation and resize errors.
pub fn load_resized(path: &Path, width: u32, aspect_ratio: f32) -> Result<PixelBuffer, CoreError> {
    let src = crate::image::load_image(path)?;
    let height = derived_height(width, src.width, src.height, aspect_ratio);
    let dst = Resizer::new().resize(&src, width, height)?;
    log::info!("Image redimensionnée : {width}×{height}");
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_gray_stays_uniform() {
        let mut src = PixelBuffer::new(64, 32, 1).unwrap();
        src.data.fill(128);
        let dst = Resizer::new().resize(&src, 16, 4).unwrap();
        assert_eq!(dst.data.len(), 16 * 4);
        assert!(dst.data.iter().all(|&v| v == 128));
    }

    #[test]
    fn same_size_is_a_copy() {
        let src = PixelBuffer::from_raw(2, 1, 2, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(Resizer::new().resize(&src, 2, 1).unwrap(), src);
    }

    #[test]
    fn zero_target_is_rejected() {
        let src = PixelBuffer::new(4, 4, 3).unwrap();
        assert!(Resizer::new().resize(&src, 0, 4).is_err());
    }

    #[test]
    fn derived_height_never_zero() {
        assert_eq!(derived_height(10, 1000, 1, 0.45), 1);
        assert_eq!(derived_height(100, 100, 100, 0.5), 50);
    }
}
