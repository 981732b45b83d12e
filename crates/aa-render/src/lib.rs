/// Output side of asciiart: terminal display, file sink, rotation and pacing.
pub mod display;
pub mod file;
pub mod pacing;
pub mod rotate;
pub mod sequence;

pub use display::{Display, DisplayStats, RedrawMode};
pub use pacing::FrameClock;
pub use sequence::RotationPlan;
