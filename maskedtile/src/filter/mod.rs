//! Hue/saturation/brightness color filtering.
//!
//! The filter works in HSL space: hue is rotated, saturation and lightness
//! are scaled and clamped to `[0, 1]`. The identity state is a fast path
//! that leaves pixels bit-for-bit unchanged.

mod engine;
mod state;

pub use engine::{apply, apply_image, ColorFilter};
pub use state::FilterState;
