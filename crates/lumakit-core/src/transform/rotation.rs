//! Image rotation.
//!
//! Exact quarter turns are direct index remaps and therefore lossless;
//! repeated 90-degree rotations never accumulate resampling error.
//! Arbitrary angles use inverse mapping with bilinear interpolation: for
//! each pixel of the expanded output canvas, the contributing source
//! position is found by rotating backwards about the center.

use crate::raster::{RasterBuffer, BYTES_PER_PIXEL};

const ANGLE_EPSILON: f64 = 0.001;

/// Compute the bounding-box dimensions of a rotated image.
///
/// Exact multiples of 90 degrees take a fast path (swapped or unchanged
/// dimensions); any other angle expands the canvas to the rotated
/// bounding box.
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    let normalized = angle_degrees.rem_euclid(360.0);

    if normalized.abs() < ANGLE_EPSILON || (360.0 - normalized).abs() < ANGLE_EPSILON {
        return (width, height);
    }
    if (normalized - 90.0).abs() < ANGLE_EPSILON || (normalized - 270.0).abs() < ANGLE_EPSILON {
        return (height, width);
    }
    if (normalized - 180.0).abs() < ANGLE_EPSILON {
        return (width, height);
    }

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    let w = width as f64;
    let h = height as f64;

    // Bounding box of a rotated rectangle
    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (w * sin + h * cos).round() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Rotate 90 degrees clockwise by index remapping.
pub fn rotate90_cw(image: &RasterBuffer) -> RasterBuffer {
    if image.is_empty() {
        return image.clone();
    }

    let (w, h) = (image.width as usize, image.height as usize);
    let new_w = h;
    let mut output = vec![0u8; image.pixels.len()];

    for (idx, dst) in output.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
        let dx = idx % new_w;
        let dy = idx / new_w;
        let src_x = dy;
        let src_y = new_w - 1 - dx;
        let src = (src_y * w + src_x) * BYTES_PER_PIXEL;
        dst.copy_from_slice(&image.pixels[src..src + BYTES_PER_PIXEL]);
    }

    RasterBuffer::new(image.height, image.width, output)
}

/// Rotate 90 degrees counter-clockwise by index remapping.
pub fn rotate90_ccw(image: &RasterBuffer) -> RasterBuffer {
    if image.is_empty() {
        return image.clone();
    }

    let (w, h) = (image.width as usize, image.height as usize);
    let new_w = h;
    let mut output = vec![0u8; image.pixels.len()];

    for (idx, dst) in output.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
        let dx = idx % new_w;
        let dy = idx / new_w;
        let src_y = dx;
        let src_x = w - 1 - dy;
        let src = (src_y * w + src_x) * BYTES_PER_PIXEL;
        dst.copy_from_slice(&image.pixels[src..src + BYTES_PER_PIXEL]);
    }

    RasterBuffer::new(image.height, image.width, output)
}

/// Rotate 180 degrees by reversing pixel order.
pub fn rotate180(image: &RasterBuffer) -> RasterBuffer {
    if image.is_empty() {
        return image.clone();
    }

    let mut output = Vec::with_capacity(image.pixels.len());
    for px in image.pixels.chunks_exact(BYTES_PER_PIXEL).rev() {
        output.extend_from_slice(px);
    }

    RasterBuffer::new(image.width, image.height, output)
}

/// Rotate by an arbitrary angle about the buffer center.
///
/// Positive angles rotate clockwise (matching the quarter-turn helpers).
/// Exact multiples of 90 degrees are dispatched to the lossless index
/// remaps; other angles expand the canvas to the rotated bounding box and
/// resample bilinearly, filling uncovered corners with transparent black.
/// Deterministic for a given input.
pub fn rotate(image: &RasterBuffer, angle_degrees: f64) -> RasterBuffer {
    if image.is_empty() {
        return image.clone();
    }

    let normalized = angle_degrees.rem_euclid(360.0);
    if normalized.abs() < ANGLE_EPSILON || (360.0 - normalized).abs() < ANGLE_EPSILON {
        return image.clone();
    }
    if (normalized - 90.0).abs() < ANGLE_EPSILON {
        return rotate90_cw(image);
    }
    if (normalized - 180.0).abs() < ANGLE_EPSILON {
        return rotate180(image);
    }
    if (normalized - 270.0).abs() < ANGLE_EPSILON {
        return rotate90_ccw(image);
    }

    let (src_w, src_h) = (image.width as f64, image.height as f64);
    let (dst_w, dst_h) = compute_rotated_bounds(image.width, image.height, angle_degrees);

    // Inverse mapping: rotate each destination point backwards
    let angle_rad = -angle_degrees.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    let src_cx = src_w / 2.0;
    let src_cy = src_h / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let mut output = vec![0u8; (dst_w as usize) * (dst_h as usize) * BYTES_PER_PIXEL];

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            let dx = dst_x as f64 - dst_cx;
            let dy = dst_y as f64 - dst_cy;

            let src_x = dx * cos - dy * sin + src_cx;
            let src_y = dx * sin + dy * cos + src_cy;

            let dst_idx = ((dst_y * dst_w + dst_x) as usize) * BYTES_PER_PIXEL;
            let pixel = sample_bilinear(image, src_x, src_y);
            output[dst_idx..dst_idx + BYTES_PER_PIXEL].copy_from_slice(&pixel);
        }
    }

    RasterBuffer::new(dst_w, dst_h, output)
}

#[inline]
fn get_pixel_f64(image: &RasterBuffer, px: usize, py: usize) -> [f64; 4] {
    let idx = (py * image.width as usize + px) * BYTES_PER_PIXEL;
    [
        image.pixels[idx] as f64,
        image.pixels[idx + 1] as f64,
        image.pixels[idx + 2] as f64,
        image.pixels[idx + 3] as f64,
    ]
}

/// Sample a pixel using bilinear interpolation of the 4 nearest neighbors.
/// Out-of-bounds positions return transparent black.
fn sample_bilinear(image: &RasterBuffer, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (image.width as i64, image.height as i64);

    if x < 0.0 || x >= (w - 1) as f64 || y < 0.0 || y >= (h - 1) as f64 {
        return [0, 0, 0, 0];
    }

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = x0 + 1;
    let y1 = y0 + 1;

    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x1, y0);
    let p01 = get_pixel_f64(image, x0, y1);
    let p11 = get_pixel_f64(image, x1, y1);

    let mut result = [0u8; 4];
    for (i, out) in result.iter_mut().enumerate() {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        *out = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}
