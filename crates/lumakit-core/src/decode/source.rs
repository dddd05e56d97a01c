//! Bounded decoding of an opaque byte source.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};

use super::{apply_orientation, read_orientation, sample_factor, DecodeError, DEFAULT_TARGET_EDGE};
use crate::raster::RasterBuffer;

/// Read the pixel dimensions of an encoded image without decoding it.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes are not a recognized
/// raster container, or `DecodeError::CorruptedFile` if the header cannot
/// be parsed.
pub fn decode_bounds(bytes: &[u8]) -> Result<(u32, u32), DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    reader
        .into_dimensions()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

/// Decode an image at full resolution, applying EXIF orientation.
///
/// # Errors
///
/// Returns a `DecodeError` if the bytes cannot be decoded. EXIF parse
/// failures are not errors; they simply mean no orientation correction.
pub fn decode_image(bytes: &[u8]) -> Result<RasterBuffer, DecodeError> {
    let orientation = read_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let oriented = apply_orientation(img, orientation);
    Ok(RasterBuffer::from_rgba_image(oriented.into_rgba8()))
}

/// Decode an image bounded to a maximum edge length.
///
/// The source is read twice: once for its header bounds, then for pixel
/// data. The power-of-two downsample factor computed from the bounds keeps
/// the decoded buffer within `target_edge` in the sense of
/// [`sample_factor`]: halving stops as soon as either edge would drop
/// below the target. Orientation is applied after downsampling, so the
/// returned buffer displays upright.
///
/// # Errors
///
/// Returns a `DecodeError` if the source is unreadable or not a valid
/// raster.
pub fn decode_image_bounded(bytes: &[u8], target_edge: u32) -> Result<RasterBuffer, DecodeError> {
    let (width, height) = decode_bounds(bytes)?;
    let factor = sample_factor(width, height, target_edge);

    let orientation = read_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let img = downsample(img, factor);
    let oriented = apply_orientation(img, orientation);
    Ok(RasterBuffer::from_rgba_image(oriented.into_rgba8()))
}

/// Decode bounded to the default 2048 px target edge.
pub fn decode_image_default(bytes: &[u8]) -> Result<RasterBuffer, DecodeError> {
    decode_image_bounded(bytes, DEFAULT_TARGET_EDGE)
}

fn downsample(img: DynamicImage, factor: u32) -> DynamicImage {
    if factor <= 1 {
        return img;
    }
    let w = (img.width() / factor).max(1);
    let h = (img.height() / factor).max(1);
    img.resize_exact(w, h, FilterType::Triangle)
}
