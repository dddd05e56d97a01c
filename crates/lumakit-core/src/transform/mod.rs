//! Geometric pixel-buffer transforms.
//!
//! All transforms are pure: the input [`RasterBuffer`](crate::RasterBuffer)
//! is never mutated and a new buffer is returned. Out-of-range inputs are
//! clamped instead of raising errors; there is no geometry error type by
//! design.

mod crop;
mod flip;
mod rotation;

pub use crop::crop;
pub use flip::{flip, flip_horizontal, flip_vertical};
pub use rotation::{
    compute_rotated_bounds, rotate, rotate180, rotate90_ccw, rotate90_cw,
};
