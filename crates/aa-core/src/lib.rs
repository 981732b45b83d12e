/// Configuration, types, and shared structures for asciiart.
///
/// This crate holds the coverage table, the palette/quantizer, the pixel
/// and frame types, and the configuration logic shared across the workspace.

pub mod config;
pub mod coverage;
pub mod error;
pub mod frame;
pub mod palette;

pub use config::Config;
pub use coverage::{CoverageEntry, CoverageTable};
pub use error::CoreError;
pub use frame::{Frame, PixelBuffer};
pub use palette::{LuminanceLut, Palette};
