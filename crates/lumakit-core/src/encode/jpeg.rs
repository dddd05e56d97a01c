//! JPEG encoding using the `image` crate's encoder.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use thiserror::Error;

use crate::raster::{RasterBuffer, BYTES_PER_PIXEL};

/// Fixed quality used for exports.
pub const EXPORT_QUALITY: u8 = 100;

/// Errors that can occur during JPEG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match the stated dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// JPEG encoding failed
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode a raster to JPEG bytes at the given quality.
///
/// JPEG carries no alpha channel, so the buffer's alpha is dropped during
/// encoding. Quality is clamped to 1-100.
///
/// # Errors
///
/// Returns `EncodeError` if the buffer has zero dimensions, a mismatched
/// pixel length, or the encoder itself fails.
pub fn encode_jpeg(image: &RasterBuffer, quality: u8) -> Result<Vec<u8>, EncodeError> {
    if image.width == 0 || image.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    let expected_len = image.width as usize * image.height as usize * BYTES_PER_PIXEL;
    if image.pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: image.pixels.len(),
        });
    }

    // Strip alpha; JPEG is RGB only
    let mut rgb = Vec::with_capacity(image.width as usize * image.height as usize * 3);
    for px in image.pixels.chunks_exact(BYTES_PER_PIXEL) {
        rgb.extend_from_slice(&px[..3]);
    }

    let quality = quality.clamp(1, 100);
    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);

    encoder
        .write_image(&rgb, image.width, image.height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_valid_buffer() {
        let img = RasterBuffer::filled(32, 24, [128, 64, 32, 255]);
        let jpeg = encode_jpeg(&img, EXPORT_QUALITY).unwrap();

        // JPEG magic bytes
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        assert!(jpeg.len() > 100);
    }

    #[test]
    fn test_encode_round_trips_through_decoder() {
        let img = RasterBuffer::filled(16, 16, [200, 150, 100, 255]);
        let jpeg = encode_jpeg(&img, EXPORT_QUALITY).unwrap();

        let decoded = crate::decode::decode_image(&jpeg).unwrap();
        assert_eq!((decoded.width, decoded.height), (16, 16));

        // Quality 100 keeps a flat color almost exact
        let px = decoded.pixel(8, 8);
        assert!((px[0] as i32 - 200).abs() <= 4);
        assert!((px[1] as i32 - 150).abs() <= 4);
        assert!((px[2] as i32 - 100).abs() <= 4);
    }

    #[test]
    fn test_encode_zero_dimensions_errors() {
        let img = RasterBuffer::new(0, 0, vec![]);
        let result = encode_jpeg(&img, EXPORT_QUALITY);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_encode_mismatched_length_errors() {
        let img = RasterBuffer {
            width: 10,
            height: 10,
            pixels: vec![0u8; 10],
        };
        let result = encode_jpeg(&img, EXPORT_QUALITY);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }

    #[test]
    fn test_quality_clamped() {
        let img = RasterBuffer::filled(8, 8, [1, 2, 3, 255]);
        // Quality 0 would be rejected by the encoder; the clamp saves it
        assert!(encode_jpeg(&img, 0).is_ok());
    }
}
