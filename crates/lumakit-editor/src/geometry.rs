//! Display-space geometry primitives.
//!
//! All values are `f32` display units. Pixel-space conversion happens at a
//! single boundary ([`crate::crop::CropState::pixel_rect`]).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in display space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn top_right(&self) -> Point {
        Point::new(self.right(), self.top)
    }

    pub fn bottom_left(&self) -> Point {
        Point::new(self.left, self.bottom())
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    /// Translate the rect as a unit so it lies inside `bounds`. Each axis
    /// shifts independently and the size is preserved. Rects larger than
    /// the bounds pin to the bounds origin.
    pub fn clamped_inside(&self, bounds: Rect) -> Rect {
        let mut r = *self;
        if r.right() > bounds.right() {
            r.left = bounds.right() - r.width;
        }
        if r.left < bounds.left {
            r.left = bounds.left;
        }
        if r.bottom() > bounds.bottom() {
            r.top = bounds.bottom() - r.height;
        }
        if r.top < bounds.top {
            r.top = bounds.top;
        }
        r
    }
}
