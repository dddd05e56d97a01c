//! Color transforms.
//!
//! Tonal adjustments and filter presets are both expressed as a 4x5 affine
//! color matrix and applied through the same per-pixel path.

mod matrix;
mod presets;

pub use matrix::{apply_matrix, ColorMatrix};
pub use presets::{apply_filter, FilterKind};
