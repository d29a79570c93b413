//! Geometric types for clip regions and viewport coordinates

use serde::{Deserialize, Serialize};

/// A point in viewport (CSS pixel) coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset from `origin` to this point
    pub fn delta_from(self, origin: Point) -> (f32, f32) {
        (self.x - origin.x, self.y - origin.y)
    }

    pub fn distance(self, other: Point) -> f32 {
        let (dx, dy) = self.delta_from(other);
        (dx * dx + dy * dy).sqrt()
    }
}

/// Logical size of a surface or of the viewport's client area
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The user-selected clip rectangle.
///
/// While a drag is in progress `w` and `h` may be negative; call [`ClipRegion::normalized`]
/// before handing the region to anything outside the selection controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipRegion {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl ClipRegion {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle spanned by two opposite corners, in either order
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            w: (b.x - a.x).abs(),
            h: (b.y - a.y).abs(),
        }
    }

    /// Shift the origin and take the absolute size so that `w, h >= 0`
    pub fn normalized(self) -> Self {
        let mut region = self;
        if region.w < 0.0 {
            region.x -= region.w.abs();
            region.w = region.w.abs();
        }
        if region.h < 0.0 {
            region.y -= region.h.abs();
            region.h = region.h.abs();
        }
        region
    }

    pub fn is_normalized(&self) -> bool {
        self.w >= 0.0 && self.h >= 0.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict interior test; points on the border are outside
    pub fn contains_point(&self, p: Point) -> bool {
        p.x > self.x && p.x < self.right() && p.y > self.y && p.y < self.bottom()
    }

    /// Move the origin by `(dx, dy)` while keeping the rectangle inside `bounds`.
    ///
    /// A rectangle larger than `bounds` is pinned to the top-left edge.
    pub fn translate_clamped(&self, dx: f32, dy: f32, bounds: Size) -> Self {
        let x = (self.x + dx).min(bounds.width - self.w).max(0.0);
        let y = (self.y + dy).min(bounds.height - self.h).max(0.0);
        Self { x, y, ..*self }
    }
}
