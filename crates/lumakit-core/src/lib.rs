//! Pure image-processing kernel for the LumaKit editor.
//!
//! Every operation here is a value transform over [`RasterBuffer`]s:
//! decoding produces a buffer, each edit takes a buffer (plus parameters)
//! and returns a new one, and export encodes a buffer to JPEG bytes.
//! Nothing in this crate touches threads, timers, or the display; the
//! interactive layer lives in `lumakit-editor`.

pub mod color;
pub mod decode;
pub mod encode;
pub mod export;
pub mod raster;
pub mod text;
pub mod transform;

pub use color::{apply_filter, apply_matrix, ColorMatrix, FilterKind};
pub use decode::{decode_bounds, decode_image, decode_image_bounded, DecodeError};
pub use encode::{encode_jpeg, EncodeError, EXPORT_QUALITY};
pub use export::{export, flatten, ExportError, ExportSink};
pub use raster::RasterBuffer;
pub use text::{LayerEdit, TextLayer, TextLayerSet};
