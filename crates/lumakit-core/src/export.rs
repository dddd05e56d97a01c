//! Flattening and export.
//!
//! Export copies the current buffer, stamps every text layer in insertion
//! order, encodes the result as JPEG at quality 100, and hands the
//! complete bytes to an [`ExportSink`] in one call. A failed export never
//! partially overwrites a prior successful one; the sink only ever sees
//! whole encodings.

use thiserror::Error;

use crate::encode::{encode_jpeg, EncodeError, EXPORT_QUALITY};
use crate::raster::RasterBuffer;
use crate::text::{stamp_layers, TextLayer};

/// Errors surfaced by a failed export. Terminal for the attempt; the
/// caller may retry the whole export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Encoding the flattened raster failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The persistence collaborator rejected the write.
    #[error("Export sink failed: {reason}")]
    Sink { reason: String },
}

/// External persistence collaborator. Receives the complete encoded bytes
/// and answers with an opaque success handle (a path, URI, or media-store
/// id) or a failure reason.
pub trait ExportSink {
    fn write(&mut self, jpeg: &[u8]) -> Result<String, String>;
}

/// Flatten the buffer and its text layers into a single raster.
pub fn flatten<'a>(
    image: &RasterBuffer,
    layers: impl IntoIterator<Item = &'a TextLayer>,
) -> RasterBuffer {
    stamp_layers(image, layers)
}

/// Flatten, encode at fixed quality 100, and write through the sink.
///
/// # Errors
///
/// Returns `ExportError::Encode` if encoding fails and
/// `ExportError::Sink` if the collaborator refuses the write.
pub fn export<'a, S: ExportSink>(
    image: &RasterBuffer,
    layers: impl IntoIterator<Item = &'a TextLayer>,
    sink: &mut S,
) -> Result<String, ExportError> {
    let flattened = flatten(image, layers);
    let jpeg = encode_jpeg(&flattened, EXPORT_QUALITY)?;
    sink.write(&jpeg).map_err(|reason| ExportError::Sink { reason })
}
