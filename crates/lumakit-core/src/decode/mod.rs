//! Image loading pipeline for Lumakit.
//!
//! This module turns opaque encoded bytes (JPEG or PNG) into a
//! [`RasterBuffer`](crate::RasterBuffer) bounded to a maximum edge length:
//!
//! 1. Read the pixel dimensions from the container header.
//! 2. Compute a power-of-two downsample factor so the decoded result stays
//!    within the target edge (2048 px by default).
//! 3. Decode, downsample, and apply the EXIF orientation tag.
//!
//! The source bytes are read once for bounds and once for pixel data.
//! A failed decode surfaces a [`DecodeError`]; there is no silent empty
//! result and no retry.

mod orient;
mod sample;
mod source;
mod types;

pub use orient::{apply_orientation, read_orientation, Orientation};
pub use sample::{sample_factor, DEFAULT_TARGET_EDGE};
pub use source::{decode_bounds, decode_image, decode_image_bounded, decode_image_default};
pub use types::DecodeError;
