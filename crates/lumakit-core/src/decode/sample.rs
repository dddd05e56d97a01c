//! Power-of-two decode sampling.
//!
//! Phone photographs are routinely 50+ megapixels; decoding one at full
//! resolution just to edit a preview wastes most of that memory. The factor
//! computed here bounds the decoded size while staying a power of two, so
//! the downsample divides evenly and keeps aspect ratio exact.

/// Default edge length (in pixels) the decoded image must keep covering.
pub const DEFAULT_TARGET_EDGE: u32 = 2048;

/// Compute the power-of-two downsample factor for a source image.
///
/// Returns the largest `2^k` such that half the source, divided by the
/// factor, still covers `target` in both dimensions. Sources already within
/// `target` return 1.
///
/// # Arguments
///
/// * `width` - Source width in pixels
/// * `height` - Source height in pixels
/// * `target` - Edge length that must remain covered after sampling
pub fn sample_factor(width: u32, height: u32, target: u32) -> u32 {
    let mut factor = 1u32;
    if target == 0 {
        return factor;
    }

    if height > target || width > target {
        let half_height = height / 2;
        let half_width = width / 2;

        while half_height / factor >= target && half_width / factor >= target {
            factor *= 2;
        }
    }

    factor
}


// ============================================================================
// Property-Based Tests
// ============================================================================
