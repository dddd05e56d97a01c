//! Interactive crop geometry.
//!
//! The crop rectangle lives in display space and is always a subset of the
//! fitted image rect. Gestures never error; every delta is clamped so the
//! rect stays legal (`width, height >= 50`, inside the image). Conversion
//! to source-pixel coordinates happens once, at confirm time.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, Size};

/// Minimum crop dimension in display units.
pub const MIN_CROP_SIZE: f32 = 50.0;

/// Corner-handle hit radius in display units.
pub const HANDLE_HIT_THRESHOLD: f32 = 100.0;

/// Which part of the crop rect a drag gesture grabbed. Resolved once at
/// gesture start and held for the whole drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CropHandle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Move,
    None,
}

/// Aspect ratio locks offered by the crop toolbar, in UI order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    Free,
    Square,
    FourThirds,
    SixteenNine,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 4] = [
        AspectRatio::Free,
        AspectRatio::Square,
        AspectRatio::FourThirds,
        AspectRatio::SixteenNine,
    ];

    /// Width-over-height ratio, or `None` for free-form.
    pub fn ratio(&self) -> Option<f32> {
        match self {
            AspectRatio::Free => None,
            AspectRatio::Square => Some(1.0),
            AspectRatio::FourThirds => Some(4.0 / 3.0),
            AspectRatio::SixteenNine => Some(16.0 / 9.0),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AspectRatio::Free => "Free",
            AspectRatio::Square => "1:1",
            AspectRatio::FourThirds => "4:3",
            AspectRatio::SixteenNine => "16:9",
        }
    }
}

/// Letterbox-fit a bitmap into a viewport. Returns the fitted placement
/// rect; the uniform scale is `rect.width / bitmap_w`.
pub fn fit_display(viewport: Size, bitmap_w: u32, bitmap_h: u32) -> Rect {
    if bitmap_w == 0 || bitmap_h == 0 || viewport.width <= 0.0 || viewport.height <= 0.0 {
        return Rect::default();
    }
    let scale = (viewport.width / bitmap_w as f32).min(viewport.height / bitmap_h as f32);
    let w = bitmap_w as f32 * scale;
    let h = bitmap_h as f32 * scale;
    Rect::new(
        (viewport.width - w) / 2.0,
        (viewport.height - h) / 2.0,
        w,
        h,
    )
}

/// Resize `rect` to aspect ratio `r` (width / height) while staying inside
/// `bounds`. Shrinks first (height from width, then from bounds height,
/// then width from bounds width), recenters on the original center, and
/// finally translates the box minimally back inside the bounds.
pub fn fit_aspect_ratio(rect: Rect, bounds: Rect, r: f32) -> Rect {
    let mut w = rect.width;
    let mut h = w / r;
    if h > bounds.height {
        h = bounds.height;
        w = h * r;
    }
    if w > bounds.width {
        w = bounds.width;
        h = w / r;
    }
    let center = rect.center();
    let fitted = Rect::new(center.x - w / 2.0, center.y - h / 2.0, w, h);
    fitted.clamped_inside(bounds)
}

/// Crop-mode state: the fitted image rect, the live crop rect, the active
/// ratio lock, and the handle grabbed by the in-flight drag (if any).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropState {
    image_rect: Rect,
    crop_rect: Rect,
    ratio: AspectRatio,
    active_handle: CropHandle,
    bitmap_width: u32,
    bitmap_height: u32,
}

impl CropState {
    /// Fit the bitmap into the viewport; the crop rect starts as the full
    /// fitted image.
    pub fn new(viewport: Size, bitmap_w: u32, bitmap_h: u32) -> Self {
        let image_rect = fit_display(viewport, bitmap_w, bitmap_h);
        Self {
            image_rect,
            crop_rect: image_rect,
            ratio: AspectRatio::Free,
            active_handle: CropHandle::None,
            bitmap_width: bitmap_w,
            bitmap_height: bitmap_h,
        }
    }

    pub fn image_rect(&self) -> Rect {
        self.image_rect
    }

    pub fn crop_rect(&self) -> Rect {
        self.crop_rect
    }

    pub fn ratio(&self) -> AspectRatio {
        self.ratio
    }

    pub fn active_handle(&self) -> CropHandle {
        self.active_handle
    }

    /// Reset on viewport or bitmap change: refit and restore the crop rect
    /// to the full image.
    pub fn reset(&mut self, viewport: Size, bitmap_w: u32, bitmap_h: u32) {
        *self = Self::new(viewport, bitmap_w, bitmap_h);
    }

    /// Resolve which handle the gesture start grabbed. The decision is
    /// held until [`end_drag`](Self::end_drag); re-evaluating per delta
    /// would flicker when the pointer drifts off the corner mid-drag.
    pub fn begin_drag(&mut self, start: Point) -> CropHandle {
        let corners = [
            (CropHandle::TopLeft, self.crop_rect.top_left()),
            (CropHandle::TopRight, self.crop_rect.top_right()),
            (CropHandle::BottomLeft, self.crop_rect.bottom_left()),
            (CropHandle::BottomRight, self.crop_rect.bottom_right()),
        ];
        let mut best = CropHandle::None;
        let mut best_dist = HANDLE_HIT_THRESHOLD;
        for (handle, corner) in corners {
            let d = start.distance_to(corner);
            if d < best_dist {
                best = handle;
                best_dist = d;
            }
        }
        if best == CropHandle::None && self.crop_rect.contains(start) {
            best = CropHandle::Move;
        }
        self.active_handle = best;
        best
    }

    /// Apply one drag delta to the handle resolved at gesture start.
    pub fn drag_by(&mut self, dx: f32, dy: f32) {
        let bounds = self.image_rect;
        let r = self.crop_rect;
        match self.active_handle {
            CropHandle::None => {}
            CropHandle::Move => {
                let moved = Rect::new(r.left + dx, r.top + dy, r.width, r.height);
                self.crop_rect = moved.clamped_inside(bounds);
            }
            CropHandle::TopLeft => {
                let left = (r.left + dx).clamp(bounds.left, r.right() - MIN_CROP_SIZE);
                let top = (r.top + dy).clamp(bounds.top, r.bottom() - MIN_CROP_SIZE);
                self.set_edges(left, top, r.right(), r.bottom());
            }
            CropHandle::TopRight => {
                let right = (r.right() + dx).clamp(r.left + MIN_CROP_SIZE, bounds.right());
                let top = (r.top + dy).clamp(bounds.top, r.bottom() - MIN_CROP_SIZE);
                self.set_edges(r.left, top, right, r.bottom());
            }
            CropHandle::BottomLeft => {
                let left = (r.left + dx).clamp(bounds.left, r.right() - MIN_CROP_SIZE);
                let bottom = (r.bottom() + dy).clamp(r.top + MIN_CROP_SIZE, bounds.bottom());
                self.set_edges(left, r.top, r.right(), bottom);
            }
            CropHandle::BottomRight => {
                let right = (r.right() + dx).clamp(r.left + MIN_CROP_SIZE, bounds.right());
                let bottom = (r.bottom() + dy).clamp(r.top + MIN_CROP_SIZE, bounds.bottom());
                self.set_edges(r.left, r.top, right, bottom);
            }
        }
    }

    pub fn end_drag(&mut self) {
        self.active_handle = CropHandle::None;
    }

    /// Switch the ratio lock, immediately refitting the crop rect when a
    /// fixed ratio is chosen.
    pub fn set_ratio(&mut self, ratio: AspectRatio) {
        self.ratio = ratio;
        if let Some(r) = ratio.ratio() {
            self.crop_rect = fit_aspect_ratio(self.crop_rect, self.image_rect, r);
        }
    }

    fn set_edges(&mut self, left: f32, top: f32, right: f32, bottom: f32) {
        let mut rect = Rect::new(left, top, right - left, bottom - top);
        if let Some(r) = self.ratio.ratio() {
            rect = fit_aspect_ratio(rect, self.image_rect, r);
        }
        self.crop_rect = rect;
    }

    /// Convert the display-space crop rect into source-pixel coordinates
    /// for the crop transform. Returns `(x, y, w, h)`.
    pub fn pixel_rect(&self) -> (i32, i32, i32, i32) {
        if self.image_rect.width <= 0.0 {
            return (0, 0, 0, 0);
        }
        let pixel_scale = self.bitmap_width as f32 / self.image_rect.width;
        let x = ((self.crop_rect.left - self.image_rect.left) * pixel_scale).round() as i32;
        let y = ((self.crop_rect.top - self.image_rect.top) * pixel_scale).round() as i32;
        let w = (self.crop_rect.width * pixel_scale).round() as i32;
        let h = (self.crop_rect.height * pixel_scale).round() as i32;
        (x, y, w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_1000x750() -> CropState {
        // 2000x1500 bitmap in a 1000x1000 viewport: scale 0.5, fitted at
        // (0, 125) with size 1000x750.
        CropState::new(Size::new(1000.0, 1000.0), 2000, 1500)
    }

    #[test]
    fn test_fit_display_letterboxes() {
        let rect = fit_display(Size::new(1000.0, 1000.0), 2000, 1500);
        assert_eq!(rect, Rect::new(0.0, 125.0, 1000.0, 750.0));
    }

    #[test]
    fn test_crop_starts_as_full_image() {
        let state = state_1000x750();
        assert_eq!(state.crop_rect(), state.image_rect());
    }

    #[test]
    fn test_begin_drag_picks_nearest_corner() {
        let mut state = state_1000x750();
        // Near top-left corner (0, 125), within the 100-unit threshold.
        assert_eq!(state.begin_drag(Point::new(30.0, 160.0)), CropHandle::TopLeft);
        state.end_drag();
        // Center of the rect: inside but far from all corners.
        assert_eq!(state.begin_drag(Point::new(500.0, 500.0)), CropHandle::Move);
        state.end_drag();
        // Outside the rect and away from corners.
        assert_eq!(state.begin_drag(Point::new(500.0, 1.0)), CropHandle::None);
    }

    #[test]
    fn test_corner_drag_moves_adjacent_edges_only() {
        let mut state = state_1000x750();
        state.begin_drag(Point::new(0.0, 125.0));
        state.drag_by(100.0, 50.0);
        let r = state.crop_rect();
        assert_eq!(r.left, 100.0);
        assert_eq!(r.top, 175.0);
        assert_eq!(r.right(), 1000.0);
        assert_eq!(r.bottom(), 875.0);
    }

    #[test]
    fn test_corner_drag_enforces_min_size() {
        let mut state = state_1000x750();
        state.begin_drag(Point::new(0.0, 125.0));
        state.drag_by(5000.0, 5000.0);
        let r = state.crop_rect();
        assert_eq!(r.width, MIN_CROP_SIZE);
        assert_eq!(r.height, MIN_CROP_SIZE);
        assert_eq!(r.right(), 1000.0);
        assert_eq!(r.bottom(), 875.0);
    }

    #[test]
    fn test_corner_drag_clamps_to_image_rect() {
        let mut state = state_1000x750();
        state.begin_drag(Point::new(0.0, 125.0));
        state.drag_by(-500.0, -500.0);
        let r = state.crop_rect();
        assert_eq!(r.left, 0.0);
        assert_eq!(r.top, 125.0);
    }

    #[test]
    fn test_handle_fixed_for_gesture_duration() {
        let mut state = state_1000x750();
        state.begin_drag(Point::new(0.0, 125.0));
        assert_eq!(state.active_handle(), CropHandle::TopLeft);
        // Drag far past the opposite corner; the handle must not flip.
        state.drag_by(900.0, 700.0);
        assert_eq!(state.active_handle(), CropHandle::TopLeft);
        state.end_drag();
        assert_eq!(state.active_handle(), CropHandle::None);
    }

    #[test]
    fn test_move_translates_as_unit() {
        let mut state = state_1000x750();
        state.begin_drag(Point::new(100.0, 225.0));
        state.drag_by(200.0, 100.0);
        state.end_drag();
        state.begin_drag(Point::new(500.0, 500.0));
        state.drag_by(-30.0, 20.0);
        // Full-image rect cannot move; shrink first.
        let mut small = state_1000x750();
        small.begin_drag(Point::new(0.0, 125.0));
        small.drag_by(400.0, 300.0);
        small.end_drag();
        let before = small.crop_rect();
        small.begin_drag(Point::new(700.0, 600.0));
        small.drag_by(-100.0, -50.0);
        let after = small.crop_rect();
        assert_eq!(after.width, before.width);
        assert_eq!(after.height, before.height);
        assert_eq!(after.left, before.left - 100.0);
        assert_eq!(after.top, before.top - 50.0);
    }

    #[test]
    fn test_move_clamps_inside_image() {
        let mut state = state_1000x750();
        state.begin_drag(Point::new(0.0, 125.0));
        state.drag_by(600.0, 400.0);
        state.end_drag();
        state.begin_drag(Point::new(800.0, 700.0));
        state.drag_by(5000.0, 5000.0);
        let r = state.crop_rect();
        assert_eq!(r.right(), 1000.0);
        assert_eq!(r.bottom(), 875.0);
    }

    #[test]
    fn test_fit_aspect_ratio_square_from_wide() {
        // Width-first: the square grows to 300x300 (which fits the
        // 400x400 bounds), recenters on (150, 50), and shifts down into
        // bounds.
        let fitted = fit_aspect_ratio(
            Rect::new(0.0, 0.0, 300.0, 100.0),
            Rect::new(0.0, 0.0, 400.0, 400.0),
            1.0,
        );
        assert_eq!(fitted.width, 300.0);
        assert_eq!(fitted.height, 300.0);
        assert_eq!(fitted.left, 0.0);
        assert_eq!(fitted.top, 0.0);
    }

    #[test]
    fn test_fit_aspect_ratio_shrinks_to_bounds() {
        let bounds = Rect::new(0.0, 0.0, 400.0, 100.0);
        let fitted = fit_aspect_ratio(Rect::new(0.0, 0.0, 400.0, 100.0), bounds, 1.0);
        assert_eq!(fitted.width, 100.0);
        assert_eq!(fitted.height, 100.0);
        assert!(fitted.left >= bounds.left && fitted.right() <= bounds.right());
        assert!(fitted.top >= bounds.top && fitted.bottom() <= bounds.bottom());
    }

    #[test]
    fn test_set_ratio_refits_immediately() {
        let mut state = state_1000x750();
        state.set_ratio(AspectRatio::Square);
        let r = state.crop_rect();
        assert!((r.width - r.height).abs() < 0.01);
        assert_eq!(r.height, 750.0);
    }

    #[test]
    fn test_ratio_held_during_corner_drag() {
        let mut state = state_1000x750();
        state.set_ratio(AspectRatio::SixteenNine);
        state.begin_drag(Point::new(
            state.crop_rect().left,
            state.crop_rect().top,
        ));
        state.drag_by(120.0, 40.0);
        let r = state.crop_rect();
        assert!((r.width / r.height - 16.0 / 9.0).abs() < 0.01);
    }

    #[test]
    fn test_pixel_rect_round_trip_scale() {
        let mut state = state_1000x750();
        state.begin_drag(Point::new(0.0, 125.0));
        state.drag_by(100.0, 100.0);
        state.end_drag();
        // Display (100, 225)-(1000, 875) at pixel_scale 2.0 from the
        // fitted origin (0, 125).
        let (x, y, w, h) = state.pixel_rect();
        assert_eq!((x, y, w, h), (200, 200, 1800, 1300));
    }

    #[test]
    fn test_pixel_rect_full_image() {
        let state = state_1000x750();
        assert_eq!(state.pixel_rect(), (0, 0, 2000, 1500));
    }

    #[test]
    fn test_ratio_catalog() {
        assert_eq!(AspectRatio::ALL.len(), 4);
        assert_eq!(AspectRatio::Free.ratio(), None);
        assert_eq!(AspectRatio::Square.display_name(), "1:1");
        assert!((AspectRatio::FourThirds.ratio().unwrap() - 4.0 / 3.0).abs() < 1e-6);
    }

    // -------------------------------------------------------------------
    // Property-based tests
    // -------------------------------------------------------------------

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_drag_keeps_rect_legal(
                sx in 0.0f32..1000.0,
                sy in 0.0f32..1000.0,
                dx in -2000.0f32..2000.0,
                dy in -2000.0f32..2000.0,
            ) {
                let mut state = state_1000x750();
                state.begin_drag(Point::new(sx, sy));
                state.drag_by(dx, dy);
                let r = state.crop_rect();
                let img = state.image_rect();
                prop_assert!(r.width >= MIN_CROP_SIZE - 0.01);
                prop_assert!(r.height >= MIN_CROP_SIZE - 0.01);
                prop_assert!(r.left >= img.left - 0.01);
                prop_assert!(r.top >= img.top - 0.01);
                prop_assert!(r.right() <= img.right() + 0.01);
                prop_assert!(r.bottom() <= img.bottom() + 0.01);
            }

            #[test]
            fn prop_fit_aspect_ratio_stays_in_bounds(
                w in 60.0f32..800.0,
                h in 60.0f32..600.0,
                ratio in 0.2f32..5.0,
            ) {
                let bounds = Rect::new(0.0, 0.0, 800.0, 600.0);
                let fitted = fit_aspect_ratio(Rect::new(10.0, 10.0, w.min(790.0), h.min(590.0)), bounds, ratio);
                prop_assert!(fitted.left >= bounds.left - 0.01);
                prop_assert!(fitted.top >= bounds.top - 0.01);
                prop_assert!(fitted.right() <= bounds.right() + 0.01);
                prop_assert!(fitted.bottom() <= bounds.bottom() + 0.01);
                prop_assert!((fitted.width / fitted.height - ratio).abs() < 0.01);
            }
        }
    }
}
