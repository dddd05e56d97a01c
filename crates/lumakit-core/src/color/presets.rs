//! Named filter presets.
//!
//! Each preset is a fixed [`ColorMatrix`] applied through the same path as
//! the tonal adjustments. The catalog is enumerable in UI order so a host
//! can build a filter strip.

use serde::{Deserialize, Serialize};

use super::matrix::{apply_matrix, ColorMatrix};
use crate::raster::RasterBuffer;

/// The preset color filters, in UI order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterKind {
    /// Identity, leaves the image untouched.
    #[default]
    Original,
    /// Desaturate to luminance.
    Grayscale,
    /// Vintage brown tint.
    Sepia,
    /// Red boosted, blue reduced.
    Warm,
    /// Blue boosted, red reduced.
    Cool,
    /// Negative of every channel.
    Invert,
    /// High contrast with a yellow cast.
    Polaroid,
}

impl FilterKind {
    /// Every preset in the order a filter strip shows them.
    pub const ALL: [FilterKind; 7] = [
        FilterKind::Original,
        FilterKind::Grayscale,
        FilterKind::Sepia,
        FilterKind::Warm,
        FilterKind::Cool,
        FilterKind::Invert,
        FilterKind::Polaroid,
    ];

    /// Human-readable name for the filter strip.
    pub fn display_name(self) -> &'static str {
        match self {
            FilterKind::Original => "Original",
            FilterKind::Grayscale => "Grayscale",
            FilterKind::Sepia => "Sepia",
            FilterKind::Warm => "Warm",
            FilterKind::Cool => "Cool",
            FilterKind::Invert => "Invert",
            FilterKind::Polaroid => "Polaroid",
        }
    }

    /// The color matrix realizing this preset.
    #[rustfmt::skip]
    pub fn matrix(self) -> ColorMatrix {
        match self {
            FilterKind::Original => ColorMatrix::identity(),
            FilterKind::Grayscale => ColorMatrix::saturation(0.0),
            FilterKind::Sepia => ColorMatrix([
                0.393, 0.769, 0.189, 0.0, 0.0,
                0.349, 0.686, 0.168, 0.0, 0.0,
                0.272, 0.534, 0.131, 0.0, 0.0,
                0.0,   0.0,   0.0,   1.0, 0.0,
            ]),
            FilterKind::Warm => ColorMatrix([
                1.1, 0.0, 0.0, 0.0, 0.0,
                0.0, 1.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.9, 0.0, 0.0,
                0.0, 0.0, 0.0, 1.0, 0.0,
            ]),
            FilterKind::Cool => ColorMatrix([
                0.9, 0.0, 0.0, 0.0, 0.0,
                0.0, 1.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 1.1, 0.0, 0.0,
                0.0, 0.0, 0.0, 1.0, 0.0,
            ]),
            FilterKind::Invert => ColorMatrix([
                -1.0, 0.0,  0.0,  0.0, 255.0,
                0.0,  -1.0, 0.0,  0.0, 255.0,
                0.0,  0.0,  -1.0, 0.0, 255.0,
                0.0,  0.0,  0.0,  1.0, 0.0,
            ]),
            FilterKind::Polaroid => {
                // Contrast 1.2 with asymmetric channel gains and a warm
                // offset pair that cuts blue for the yellow cast.
                let contrast = 1.2;
                let translate = 128.0 * (1.0 - contrast);
                ColorMatrix([
                    contrast * 1.0,  0.0, 0.0, 0.0, translate + 10.0,
                    0.0, contrast * 0.95, 0.0, 0.0, translate + 10.0,
                    0.0, 0.0, contrast * 0.8,  0.0, translate - 20.0,
                    0.0, 0.0, 0.0,             1.0, 0.0,
                ])
            }
        }
    }
}

/// Apply a preset filter, producing a new buffer.
///
/// `Original` short-circuits to a clone and is pixel-identical to the
/// input.
pub fn apply_filter(image: &RasterBuffer, filter: FilterKind) -> RasterBuffer {
    if filter == FilterKind::Original {
        return image.clone();
    }
    apply_matrix(image, &filter.matrix())
}
