/// Image source for asciiart: decode, channel handling, resize.

pub mod image;
pub mod resize;

pub use crate::image::{load_image, resolve_input_path};
pub use crate::resize::{Resizer, derived_height, load_resized};
