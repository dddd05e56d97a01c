//! Owned pixel storage shared by every stage of the editing pipeline.
//!
//! A [`RasterBuffer`] is a fixed-format raster: 8-bit RGBA plus dimensions.
//! Buffers are never mutated while another reader can observe them; every
//! transform allocates a fresh buffer and callers publish it by replacing
//! their current-image reference.

/// Number of bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// An owned RGBA raster with 8 bits per channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    /// Length is always width * height * 4.
    pub pixels: Vec<u8>,
}

impl RasterBuffer {
    /// Create a new RasterBuffer with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * BYTES_PER_PIXEL,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a buffer filled with a single RGBA color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * BYTES_PER_PIXEL);
        for _ in 0..width as usize * height as usize {
            pixels.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a RasterBuffer from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert to an image::RgbaImage for further processing.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Byte offset of the pixel at (x, y).
    #[inline]
    pub fn pixel_offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    /// Read the RGBA value of the pixel at (x, y).
    ///
    /// Coordinates must be in bounds; checked only in debug builds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        debug_assert!(x < self.width && y < self.height, "Pixel out of bounds");
        let i = self.pixel_offset(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// Center of the image in pixel coordinates.
    pub fn center(&self) -> (f32, f32) {
        (self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}
