//! Horizontal and vertical mirroring.

use crate::raster::{RasterBuffer, BYTES_PER_PIXEL};

/// Mirror the image left-right. Output dimensions are unchanged.
pub fn flip_horizontal(image: &RasterBuffer) -> RasterBuffer {
    if image.is_empty() {
        return image.clone();
    }

    let width = image.width as usize;
    let mut output = Vec::with_capacity(image.pixels.len());

    for row in image.pixels.chunks_exact(width * BYTES_PER_PIXEL) {
        for px in row.chunks_exact(BYTES_PER_PIXEL).rev() {
            output.extend_from_slice(px);
        }
    }

    RasterBuffer::new(image.width, image.height, output)
}

/// Mirror the image top-bottom. Output dimensions are unchanged.
pub fn flip_vertical(image: &RasterBuffer) -> RasterBuffer {
    if image.is_empty() {
        return image.clone();
    }

    let stride = image.width as usize * BYTES_PER_PIXEL;
    let mut output = Vec::with_capacity(image.pixels.len());

    for row in image.pixels.chunks_exact(stride).rev() {
        output.extend_from_slice(row);
    }

    RasterBuffer::new(image.width, image.height, output)
}

/// Mirror along either or both axes.
pub fn flip(image: &RasterBuffer, horizontal: bool, vertical: bool) -> RasterBuffer {
    match (horizontal, vertical) {
        (false, false) => image.clone(),
        (true, false) => flip_horizontal(image),
        (false, true) => flip_vertical(image),
        (true, true) => flip_vertical(&flip_horizontal(image)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3x2 image with pixel ids 1..=6 in the red channel.
    fn test_image() -> RasterBuffer {
        let mut pixels = Vec::new();
        for id in 1..=6u8 {
            pixels.extend_from_slice(&[id, 0, 0, 255]);
        }
        RasterBuffer::new(3, 2, pixels)
    }

    fn ids(image: &RasterBuffer) -> Vec<u8> {
        image.pixels.chunks_exact(4).map(|p| p[0]).collect()
    }

    #[test]
    fn test_flip_horizontal_maps_pixels() {
        let result = flip_horizontal(&test_image());
        assert_eq!((result.width, result.height), (3, 2));
        assert_eq!(ids(&result), vec![3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn test_flip_vertical_maps_pixels() {
        let result = flip_vertical(&test_image());
        assert_eq!((result.width, result.height), (3, 2));
        assert_eq!(ids(&result), vec![4, 5, 6, 1, 2, 3]);
    }

    #[test]
    fn test_flip_both_is_180() {
        let result = flip(&test_image(), true, true);
        assert_eq!(ids(&result), vec![6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_flip_neither_is_identity() {
        let img = test_image();
        let result = flip(&img, false, false);
        assert_eq!(result.pixels, img.pixels);
    }

    #[test]
    fn test_double_flip_round_trip() {
        let img = test_image();
        let there_and_back = flip(&flip(&img, true, false), true, false);
        assert_eq!(there_and_back.pixels, img.pixels);

        let there_and_back = flip(&flip(&img, false, true), false, true);
        assert_eq!(there_and_back.pixels, img.pixels);
    }
}
