//! Image encoding for export.
//!
//! Exports are JPEG at a fixed quality of 100; the encoder validates the
//! buffer before writing so a malformed raster never produces partial
//! output.

mod jpeg;

pub use jpeg::{encode_jpeg, EncodeError, EXPORT_QUALITY};
