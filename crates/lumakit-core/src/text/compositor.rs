//! Rasterizing text layers onto a buffer.
//!
//! Each layer's glyph run is laid out with the embedded face, rasterized
//! into a coverage buffer, then rotated and scaled about the layer anchor
//! while alpha-blending onto the base image. The anchor sits at the
//! center of the run: lines are horizontally centered and the block is
//! vertically centered using the face ascent/descent metrics.

use ab_glyph::{point, Font, FontRef, PxScale, ScaleFont};

use super::fonts::font_face;
use super::layer::TextLayer;
use crate::raster::{RasterBuffer, BYTES_PER_PIXEL};

/// Stamp every layer onto a copy of the base buffer, in insertion order.
pub fn stamp_layers<'a>(
    base: &RasterBuffer,
    layers: impl IntoIterator<Item = &'a TextLayer>,
) -> RasterBuffer {
    let mut out = base.clone();
    for layer in layers {
        stamp_layer(&mut out, layer);
    }
    out
}

/// Single-channel glyph coverage for one laid-out text block.
struct CoverageBlock {
    width: usize,
    height: usize,
    coverage: Vec<f32>,
}

impl CoverageBlock {
    fn accumulate(&mut self, x: i32, y: i32, cov: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let slot = &mut self.coverage[y as usize * self.width + x as usize];
        // Overlapping outlines compose like stacked translucent ink
        *slot = (*slot + cov * (1.0 - *slot)).min(1.0);
    }
}

fn stamp_layer(buf: &mut RasterBuffer, layer: &TextLayer) {
    if layer.text.is_empty() || layer.alpha <= 0.0 || buf.is_empty() {
        return;
    }

    let face = font_face(layer.font_family);
    // Gesture scale folds into the rendered pixel size
    let px_size = (layer.font_size * layer.scale).max(1.0);
    let block = match layout_block(face, &layer.text, px_size) {
        Some(block) => block,
        None => return,
    };

    composite_rotated(buf, layer, &block);
}

/// Rasterize the layer text into a coverage block. Lines are split on
/// `\n` and each is horizontally centered within the block.
fn layout_block(face: &FontRef<'_>, text: &str, px_size: f32) -> Option<CoverageBlock> {
    let scale = PxScale::from(px_size);
    let scaled = face.as_scaled(scale);
    let line_h = scaled.ascent() - scaled.descent() + scaled.line_gap();

    let lines: Vec<&str> = text.split('\n').collect();
    let line_widths: Vec<f32> = lines
        .iter()
        .map(|line| {
            line.chars()
                .map(|c| scaled.h_advance(face.glyph_id(c)))
                .sum()
        })
        .collect();

    let block_w = line_widths.iter().copied().fold(0.0f32, f32::max);
    let block_h = lines.len() as f32 * line_h;
    if block_w < 1.0 || block_h < 1.0 {
        return None;
    }

    let mut block = CoverageBlock {
        width: block_w.ceil() as usize,
        height: block_h.ceil() as usize,
        coverage: vec![0.0; block_w.ceil() as usize * block_h.ceil() as usize],
    };

    for (line_idx, (line, line_w)) in lines.iter().zip(&line_widths).enumerate() {
        let baseline = line_idx as f32 * line_h + scaled.ascent();
        let mut pen_x = (block_w - line_w) / 2.0;

        for ch in line.chars() {
            let gid = face.glyph_id(ch);
            let advance = scaled.h_advance(gid);
            let glyph = gid.with_scale_and_position(scale, point(pen_x, baseline));
            if let Some(outlined) = face.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, cov| {
                    let tx = (bounds.min.x + gx as f32) as i32;
                    let ty = (bounds.min.y + gy as f32) as i32;
                    block.accumulate(tx, ty, cov);
                });
            }
            pen_x += advance;
        }
    }

    Some(block)
}

/// Blend the coverage block onto the base, rotated about the layer
/// anchor. Only the bounding box of the rotated block is visited; each
/// destination pixel is inverse-mapped into block space.
fn composite_rotated(buf: &mut RasterBuffer, layer: &TextLayer, block: &CoverageBlock) {
    let (iw, ih) = (buf.width as i32, buf.height as i32);
    let (rcx, rcy) = (layer.x, layer.y);
    let half_w = block.width as f32 / 2.0;
    let half_h = block.height as f32 / 2.0;

    let angle = layer.rotation.to_radians();
    let (sin_a, cos_a) = angle.sin_cos();

    let corners = [
        (
            rcx - half_w * cos_a + half_h * sin_a,
            rcy - half_w * sin_a - half_h * cos_a,
        ),
        (
            rcx + half_w * cos_a + half_h * sin_a,
            rcy + half_w * sin_a - half_h * cos_a,
        ),
        (
            rcx + half_w * cos_a - half_h * sin_a,
            rcy + half_w * sin_a + half_h * cos_a,
        ),
        (
            rcx - half_w * cos_a - half_h * sin_a,
            rcy - half_w * sin_a + half_h * cos_a,
        ),
    ];
    let min_x = (corners.iter().map(|c| c.0).fold(f32::MAX, f32::min).floor() as i32).max(0);
    let max_x = (corners.iter().map(|c| c.0).fold(f32::MIN, f32::max).ceil() as i32).min(iw);
    let min_y = (corners.iter().map(|c| c.1).fold(f32::MAX, f32::min).floor() as i32).max(0);
    let max_y = (corners.iter().map(|c| c.1).fold(f32::MIN, f32::max).ceil() as i32).min(ih);

    let fill = [
        layer.color[0] as f32,
        layer.color[1] as f32,
        layer.color[2] as f32,
    ];
    let fill_alpha = layer.alpha * layer.color[3] as f32 / 255.0;

    for py in min_y..max_y {
        for px in min_x..max_x {
            let dx = px as f32 - rcx;
            let dy = py as f32 - rcy;
            let ux = dx * cos_a + dy * sin_a;
            let uy = -dx * sin_a + dy * cos_a;
            let tx = (ux + half_w) as i32;
            let ty = (uy + half_h) as i32;
            if tx < 0 || ty < 0 || tx >= block.width as i32 || ty >= block.height as i32 {
                continue;
            }

            let cov = block.coverage[ty as usize * block.width + tx as usize];
            let src_a = cov * fill_alpha;
            if src_a < 1e-5 {
                continue;
            }

            let idx = (py as usize * buf.width as usize + px as usize) * BYTES_PER_PIXEL;
            let dst = &mut buf.pixels[idx..idx + BYTES_PER_PIXEL];
            let dst_a = dst[3] as f32 / 255.0;
            let out_a = src_a + dst_a * (1.0 - src_a);
            if out_a < 1e-5 {
                continue;
            }

            for c in 0..3 {
                let blended =
                    (fill[c] * src_a + dst[c] as f32 * dst_a * (1.0 - src_a)) / out_a;
                dst[c] = blended.clamp(0.0, 255.0).round() as u8;
            }
            dst[3] = (out_a * 255.0).clamp(0.0, 255.0).round() as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::layer::LayerEdit;

    fn black_canvas() -> RasterBuffer {
        RasterBuffer::filled(400, 300, [0, 0, 0, 255])
    }

    fn ink_coverage(img: &RasterBuffer) -> usize {
        img.pixels.chunks_exact(4).filter(|p| p[0] > 16).count()
    }

    #[test]
    fn test_stamp_draws_something() {
        let base = black_canvas();
        let layer = TextLayer::new(0, 200.0, 150.0);
        let out = stamp_layers(&base, [&layer]);

        assert_eq!((out.width, out.height), (400, 300));
        assert!(ink_coverage(&out) > 0, "expected white glyph pixels");
    }

    #[test]
    fn test_empty_text_is_noop() {
        let base = black_canvas();
        let layer = TextLayer::new(0, 200.0, 150.0).edited(LayerEdit::SetText(String::new()));
        let out = stamp_layers(&base, [&layer]);
        assert_eq!(out.pixels, base.pixels);
    }

    #[test]
    fn test_zero_alpha_is_noop() {
        let base = black_canvas();
        let layer = TextLayer::new(0, 200.0, 150.0).edited(LayerEdit::SetAlpha(0.0));
        let out = stamp_layers(&base, [&layer]);
        assert_eq!(out.pixels, base.pixels);
    }

    #[test]
    fn test_base_is_untouched() {
        let base = black_canvas();
        let before = base.pixels.clone();
        let layer = TextLayer::new(0, 200.0, 150.0);
        let _ = stamp_layers(&base, [&layer]);
        assert_eq!(base.pixels, before);
    }

    #[test]
    fn test_run_centered_on_anchor() {
        let base = black_canvas();
        let layer = TextLayer::new(0, 200.0, 150.0).edited(LayerEdit::SetText("I".into()));
        let out = stamp_layers(&base, [&layer]);

        // Centroid of the inked pixels lands near the anchor
        let mut n = 0usize;
        let (mut sum_x, mut sum_y) = (0f64, 0f64);
        for y in 0..out.height {
            for x in 0..out.width {
                if out.pixel(x, y)[0] > 16 {
                    n += 1;
                    sum_x += x as f64;
                    sum_y += y as f64;
                }
            }
        }
        assert!(n > 0);
        let cx = sum_x / n as f64;
        let cy = sum_y / n as f64;
        assert!((cx - 200.0).abs() < 10.0, "centroid x was {}", cx);
        assert!((cy - 150.0).abs() < 15.0, "centroid y was {}", cy);
    }

    #[test]
    fn test_rotation_moves_ink() {
        let base = black_canvas();
        let flat = TextLayer::new(0, 200.0, 150.0).edited(LayerEdit::SetText("wide text".into()));
        let turned = flat.clone().edited(LayerEdit::SetRotation(90.0));

        let out_flat = stamp_layers(&base, [&flat]);
        let out_turned = stamp_layers(&base, [&turned]);
        assert_ne!(out_flat.pixels, out_turned.pixels);
        assert!(ink_coverage(&out_turned) > 0);
    }

    #[test]
    fn test_layers_render_in_insertion_order() {
        let base = black_canvas();
        let below = TextLayer::new(0, 200.0, 150.0).edited(LayerEdit::SetColor([255, 0, 0, 255]));
        let above = TextLayer::new(1, 200.0, 150.0).edited(LayerEdit::SetColor([0, 255, 0, 255]));

        let out = stamp_layers(&base, [&below, &above]);

        // The later layer covers the earlier one where they overlap, so
        // fully-saturated green ink must exist while fully red-only ink
        // has been painted over at the shared anchor.
        let green = out
            .pixels
            .chunks_exact(4)
            .filter(|p| p[1] > 200 && p[0] < 50)
            .count();
        assert!(green > 0, "top layer should win overlapping pixels");
    }

    #[test]
    fn test_half_alpha_blends() {
        let base = black_canvas();
        let layer = TextLayer::new(0, 200.0, 150.0).edited(LayerEdit::SetAlpha(0.5));
        let out = stamp_layers(&base, [&layer]);

        // Fully covered glyph interiors land near mid gray, not white
        let max_r = out.pixels.chunks_exact(4).map(|p| p[0]).max().unwrap();
        assert!(max_r > 64, "some ink expected");
        assert!(max_r < 200, "half alpha must not reach full white, got {max_r}");
    }

    #[test]
    fn test_offscreen_anchor_does_not_panic() {
        let base = black_canvas();
        let layer = TextLayer::new(0, -500.0, -500.0);
        let out = stamp_layers(&base, [&layer]);
        assert_eq!(out.pixels, base.pixels);
    }
}
