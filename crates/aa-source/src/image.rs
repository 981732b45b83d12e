use std::path::{Path, PathBuf};

use aa_core::error::CoreError;
use aa_core::frame::PixelBuffer;

/// Resolve a user-supplied image path.
///
/// Absolute paths are returned as is; relative ones are joined to the
/// current working directory.
///
/// # Example
/// ```
/// use aa_source::image::resolve_input_path;
/// use std::path::Path;
/// let p = resolve_input_path(Path::new("/tmp/a.png"));
/// assert_eq!(p, Path::new("/tmp/a.png"));
/// ```
#[must_use]
pub fn resolve_input_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(e) => {
            log::warn!("Répertoire courant inaccessible ({e}), chemin utilisé tel quel");
            path.to_path_buf()
        }
    }
}

/// Decode an image from disk, keeping its channel layout.
///
/// Gray images stay 1 channel, gray + alpha 2, RGB 3, RGBA 4. Deeper
/// sample formats are narrowed to 8 bits.
///
/// # Errors
/// `ImageLoad` if the file cannot be opened or decoded, or is empty.
///
/// # Example
/// ```no_run
/// use aa_source::image::load_image;
/// use std::path::Path;
/// let buf = load_image(Path::new("img/madeline.png")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<PixelBuffer, CoreError> {
    let img = image::open(path).map_err(|e| CoreError::ImageLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(CoreError::ImageLoad {
            path: path.to_path_buf(),
            reason: format!("dimensions nulles {width}×{height}"),
        });
    }

    let color = img.color();
    let (channels, data) = match (color.has_color(), color.has_alpha()) {
        (false, false) => (1, img.into_luma8().into_raw()),
        (false, true) => (2, img.into_luma_alpha8().into_raw()),
        (true, false) => (3, img.into_rgb8().into_raw()),
        (true, true) => (4, img.into_rgba8().into_raw()),
    };
    log::info!(
        "Image chargée : {} ({width}×{height}, {channels} canaux)",
        path.display()
    );
    PixelBuffer::from_raw(width, height, channels, data)
}
