//! Floating text overlays.
//!
//! Layers live in source-bitmap pixel space so their positions survive
//! zoom and pan. The store is copy-on-write: edits build a modified copy
//! and replace the stored entry, never mutating one in place. Rasterizing
//! happens only at export, in [`compositor`].

mod compositor;
mod fonts;
mod layer;

pub use compositor::stamp_layers;
pub use fonts::font_face;
pub use layer::{
    FontFamily, LayerEdit, TextLayer, TextLayerSet, MAX_FONT_SIZE, MIN_FONT_SIZE,
};
