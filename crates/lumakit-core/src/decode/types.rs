//! Error types for image decoding.

use thiserror::Error;

/// Error types for image decoding operations.
///
/// A failed decode is terminal for the load attempt; callers surface the
/// error and wait for a fresh user-initiated load.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The byte source is not a recognized raster format.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::CorruptedFile("unexpected EOF".to_string());
        assert_eq!(
            err.to_string(),
            "Corrupted or incomplete image file: unexpected EOF"
        );

        let err = DecodeError::InvalidFormat;
        assert_eq!(err.to_string(), "Invalid or unsupported image format");
    }
}
