//! Clamping pixel crop.
//!
//! Crop parameters arrive in source pixel coordinates, typically converted
//! from an interactive display-space rectangle. They may be negative or
//! oversized; the crop clamps every edge into the buffer instead of
//! failing, and degenerates to a no-op when nothing useful remains.

use crate::raster::{RasterBuffer, BYTES_PER_PIXEL};

/// Crop a rectangle out of a buffer, clamping it into bounds.
///
/// `x` and `y` are clamped into `[0, width)` and `[0, height)`; `width`
/// and `height` are then clamped so the rectangle stays inside the buffer.
/// If the clamped rectangle has no area the input is returned unchanged.
///
/// # Arguments
///
/// * `image` - Source buffer
/// * `x`, `y` - Top-left corner of the crop rectangle, in pixels
/// * `width`, `height` - Requested crop size, in pixels
pub fn crop(image: &RasterBuffer, x: i32, y: i32, width: i32, height: i32) -> RasterBuffer {
    if image.is_empty() {
        return image.clone();
    }

    let src_w = image.width as i64;
    let src_h = image.height as i64;

    let left = (x as i64).clamp(0, src_w - 1);
    let top = (y as i64).clamp(0, src_h - 1);
    let out_w = (width as i64).min(src_w - left);
    let out_h = (height as i64).min(src_h - top);

    if out_w <= 0 || out_h <= 0 {
        return image.clone();
    }

    let (left, top) = (left as usize, top as usize);
    let (out_w, out_h) = (out_w as usize, out_h as usize);
    let src_stride = image.width as usize * BYTES_PER_PIXEL;
    let dst_stride = out_w * BYTES_PER_PIXEL;

    let mut output = vec![0u8; out_w * out_h * BYTES_PER_PIXEL];

    // Copy row by row; each output row is a contiguous slice of the source.
    for row in 0..out_h {
        let src_start = (top + row) * src_stride + left * BYTES_PER_PIXEL;
        let dst_start = row * dst_stride;
        output[dst_start..dst_start + dst_stride]
            .copy_from_slice(&image.pixels[src_start..src_start + dst_stride]);
    }

    RasterBuffer::new(out_w as u32, out_h as u32, output)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
