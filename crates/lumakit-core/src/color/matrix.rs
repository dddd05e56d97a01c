//! 4x5 affine color matrices and their per-pixel application.
//!
//! A matrix maps a pixel's straight (non-premultiplied) RGBA channels to
//! new channel values. Rows are output channels; the first four columns
//! mix the input channels and the fifth is a constant offset in 0-255
//! space:
//!
//! ```text
//! R' = m[0]*R  + m[1]*G  + m[2]*B  + m[3]*A  + m[4]
//! G' = m[5]*R  + m[6]*G  + m[7]*B  + m[8]*A  + m[9]
//! B' = m[10]*R + m[11]*G + m[12]*B + m[13]*A + m[14]
//! A' = m[15]*R + m[16]*G + m[17]*B + m[18]*A + m[19]
//! ```
//!
//! Results are clamped to [0, 255] after the affine map.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::raster::{RasterBuffer, BYTES_PER_PIXEL};

/// Minimum pixel count before the per-pixel loop parallelizes across rows.
const PARALLEL_PIXEL_THRESHOLD: usize = 262_144; // 512x512

/// Luminance weights used for desaturation, matching the Rec. 709 values
/// common to platform color-matrix implementations.
const LUM_R: f32 = 0.213;
const LUM_G: f32 = 0.715;
const LUM_B: f32 = 0.072;

/// A 4x5 row-major affine color transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorMatrix(pub [f32; 20]);

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl ColorMatrix {
    /// The identity transform.
    #[rustfmt::skip]
    pub const fn identity() -> Self {
        Self([
            1.0, 0.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 1.0, 0.0,
        ])
    }

    /// Build the brightness/contrast matrix.
    ///
    /// `brightness` is in [-100, 100] and `contrast` in [-50, 150]. The
    /// contrast scale pivots around mid gray: `scale = 1 + contrast/100`
    /// with `translate = 128 * (1 - scale)` so a value of 128 maps to
    /// itself. Brightness is a plain additive offset. At (0, 0) this is
    /// exactly the identity.
    #[rustfmt::skip]
    pub fn brightness_contrast(brightness: f32, contrast: f32) -> Self {
        let scale = 1.0 + contrast / 100.0;
        let translate = 128.0 * (1.0 - scale);
        let offset = translate + brightness;

        Self([
            scale, 0.0, 0.0, 0.0, offset,
            0.0, scale, 0.0, 0.0, offset,
            0.0, 0.0, scale, 0.0, offset,
            0.0, 0.0, 0.0, 1.0, 0.0,
        ])
    }

    /// Build a saturation matrix; `s = 0` desaturates to luminance and
    /// `s = 1` is the identity.
    #[rustfmt::skip]
    pub fn saturation(s: f32) -> Self {
        let inv = 1.0 - s;
        let r = inv * LUM_R;
        let g = inv * LUM_G;
        let b = inv * LUM_B;

        Self([
            r + s, g,     b,     0.0, 0.0,
            r,     g + s, b,     0.0, 0.0,
            r,     g,     b + s, 0.0, 0.0,
            0.0,   0.0,   0.0,   1.0, 0.0,
        ])
    }

    /// True if this is exactly the identity transform.
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Map a single RGBA pixel through the matrix.
    #[inline]
    pub fn map_pixel(&self, px: [u8; 4]) -> [u8; 4] {
        let m = &self.0;
        let (r, g, b, a) = (px[0] as f32, px[1] as f32, px[2] as f32, px[3] as f32);

        let out_r = m[0] * r + m[1] * g + m[2] * b + m[3] * a + m[4];
        let out_g = m[5] * r + m[6] * g + m[7] * b + m[8] * a + m[9];
        let out_b = m[10] * r + m[11] * g + m[12] * b + m[13] * a + m[14];
        let out_a = m[15] * r + m[16] * g + m[17] * b + m[18] * a + m[19];

        [
            out_r.clamp(0.0, 255.0).round() as u8,
            out_g.clamp(0.0, 255.0).round() as u8,
            out_b.clamp(0.0, 255.0).round() as u8,
            out_a.clamp(0.0, 255.0).round() as u8,
        ]
    }
}

/// Apply a color matrix to every pixel, producing a new buffer.
///
/// The identity matrix short-circuits to a clone so a neutral adjustment
/// is pixel-identical to its input. Buffers above the parallel threshold
/// are processed row-parallel with rayon.
pub fn apply_matrix(image: &RasterBuffer, matrix: &ColorMatrix) -> RasterBuffer {
    if image.is_empty() || matrix.is_identity() {
        return image.clone();
    }

    let stride = image.width as usize * BYTES_PER_PIXEL;
    let mut output = vec![0u8; image.pixels.len()];

    let map_row = |(dst_row, src_row): (&mut [u8], &[u8])| {
        for (dst, src) in dst_row
            .chunks_exact_mut(BYTES_PER_PIXEL)
            .zip(src_row.chunks_exact(BYTES_PER_PIXEL))
        {
            let px = matrix.map_pixel([src[0], src[1], src[2], src[3]]);
            dst.copy_from_slice(&px);
        }
    };

    if image.pixel_count() as usize >= PARALLEL_PIXEL_THRESHOLD {
        output
            .par_chunks_exact_mut(stride)
            .zip(image.pixels.par_chunks_exact(stride))
            .for_each(map_row);
    } else {
        output
            .chunks_exact_mut(stride)
            .zip(image.pixels.chunks_exact(stride))
            .for_each(map_row);
    }

    RasterBuffer::new(image.width, image.height, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image(width: u32, height: u32) -> RasterBuffer {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.extend_from_slice(&[v, v.wrapping_add(40), v.wrapping_add(80), 255]);
            }
        }
        RasterBuffer::new(width, height, pixels)
    }

    #[test]
    fn test_neutral_adjustment_is_identity() {
        let matrix = ColorMatrix::brightness_contrast(0.0, 0.0);
        assert!(matrix.is_identity());

        let img = test_image(16, 16);
        let result = apply_matrix(&img, &matrix);
        assert_eq!(result.pixels, img.pixels);
    }

    #[test]
    fn test_brightness_shifts_channels() {
        let img = RasterBuffer::filled(4, 4, [100, 100, 100, 255]);
        let result = apply_matrix(&img, &ColorMatrix::brightness_contrast(30.0, 0.0));
        assert_eq!(result.pixel(0, 0), [130, 130, 130, 255]);

        let result = apply_matrix(&img, &ColorMatrix::brightness_contrast(-30.0, 0.0));
        assert_eq!(result.pixel(0, 0), [70, 70, 70, 255]);
    }

    #[test]
    fn test_contrast_pivots_on_mid_gray() {
        let img = RasterBuffer::filled(2, 2, [128, 128, 128, 255]);
        let result = apply_matrix(&img, &ColorMatrix::brightness_contrast(0.0, 100.0));
        // 128 maps to itself under any contrast scale
        assert_eq!(result.pixel(0, 0), [128, 128, 128, 255]);

        let img = RasterBuffer::filled(2, 2, [160, 160, 160, 255]);
        let result = apply_matrix(&img, &ColorMatrix::brightness_contrast(0.0, 100.0));
        // scale 2.0: 160*2 - 128 = 192
        assert_eq!(result.pixel(0, 0), [192, 192, 192, 255]);
    }

    #[test]
    fn test_negative_contrast_flattens() {
        // scale 0.5: 200*0.5 + 64 = 164
        let img = RasterBuffer::filled(2, 2, [200, 200, 200, 255]);
        let result = apply_matrix(&img, &ColorMatrix::brightness_contrast(0.0, -50.0));
        assert_eq!(result.pixel(0, 0), [164, 164, 164, 255]);
    }

    #[test]
    fn test_output_clamped() {
        let img = RasterBuffer::filled(2, 2, [240, 240, 240, 255]);
        let result = apply_matrix(&img, &ColorMatrix::brightness_contrast(100.0, 0.0));
        assert_eq!(result.pixel(0, 0), [255, 255, 255, 255]);

        let img = RasterBuffer::filled(2, 2, [10, 10, 10, 255]);
        let result = apply_matrix(&img, &ColorMatrix::brightness_contrast(-100.0, 0.0));
        assert_eq!(result.pixel(0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_alpha_passes_through() {
        let img = RasterBuffer::filled(2, 2, [50, 60, 70, 120]);
        let result = apply_matrix(&img, &ColorMatrix::brightness_contrast(20.0, 50.0));
        assert_eq!(result.pixel(0, 0)[3], 120);
    }

    #[test]
    fn test_saturation_zero_is_gray() {
        let img = RasterBuffer::filled(2, 2, [200, 100, 50, 255]);
        let result = apply_matrix(&img, &ColorMatrix::saturation(0.0));
        let px = result.pixel(0, 0);
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn test_saturation_one_is_identity() {
        let img = test_image(8, 8);
        let result = apply_matrix(&img, &ColorMatrix::saturation(1.0));
        assert_eq!(result.pixels, img.pixels);
    }

    #[test]
    fn test_input_is_untouched() {
        let img = test_image(8, 8);
        let before = img.pixels.clone();
        let _ = apply_matrix(&img, &ColorMatrix::brightness_contrast(50.0, 50.0));
        assert_eq!(img.pixels, before);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
