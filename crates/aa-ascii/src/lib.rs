/// Glyph conversion engine for asciiart.
///
/// Converts pixel buffers to plain and truecolor glyph frames.
pub mod renderer;

pub use renderer::{RenderOptions, RenderedFrame, render_frame};
