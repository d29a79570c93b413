//! Shared geometry calculations for annotations
//!
//! Pure math used by the tiny-skia drawing functions in `render::image`.

/// Arrow geometry
pub mod arrow {
    /// Shaft width in pixels for a size level (1, 2, 3). Out-of-range levels clamp.
    pub fn width_for_size(size: u32) -> f32 {
        match size {
            0 | 1 => 3.0,
            2 => 5.0,
            _ => 7.0,
        }
    }

    /// Head length as a multiple of the shaft width
    pub const HEAD_LENGTH: f32 = 4.0;
    /// Head half-width as a multiple of the shaft width
    pub const HEAD_HALF_WIDTH: f32 = 2.0;

    /// Outline of a filled arrow from `(x0, y0)` to the tip at `(x1, y1)`.
    ///
    /// Returns the seven polygon vertices (shaft base, head barbs, tip), or `None` for a
    /// zero-length drag. Short arrows shrink the head to fit.
    pub fn polygon(x0: f32, y0: f32, x1: f32, y1: f32, width: f32) -> Option<[(f32, f32); 7]> {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let length = (dx * dx + dy * dy).sqrt();
        if length <= f32::EPSILON {
            return None;
        }

        // Unit direction and its normal
        let ux = dx / length;
        let uy = dy / length;
        let nx = -uy;
        let ny = ux;

        let head_length = (width * HEAD_LENGTH).min(length);
        let head_half = width * HEAD_HALF_WIDTH;
        let shaft_half = width * 0.5;

        let neck_x = x1 - ux * head_length;
        let neck_y = y1 - uy * head_length;

        Some([
            (x0 + nx * shaft_half, y0 + ny * shaft_half),
            (neck_x + nx * shaft_half, neck_y + ny * shaft_half),
            (neck_x + nx * head_half, neck_y + ny * head_half),
            (x1, y1),
            (neck_x - nx * head_half, neck_y - ny * head_half),
            (neck_x - nx * shaft_half, neck_y - ny * shaft_half),
            (x0 - nx * shaft_half, y0 - ny * shaft_half),
        ])
    }
}

/// Ellipse drawn as an anisotropically scaled circle
pub mod ellipse {
    /// Circle parameters for a drag of `(dx, dy)` from `(x, y)`.
    ///
    /// Returns `(radius, sx, sy, cx, cy)`: a circle of diameter `max(|dx|, |dy|)` centred
    /// at the origin, to be scaled by `(sx, sy)` and then translated to `(cx, cy)`.
    /// A zero-size drag yields `None`.
    pub fn scaled_circle(x: f32, y: f32, dx: f32, dy: f32) -> Option<(f32, f32, f32, f32, f32)> {
        let d = dx.abs().max(dy.abs());
        if d <= f32::EPSILON {
            return None;
        }
        let sx = dx.abs() / d;
        let sy = dy.abs() / d;
        Some((d * 0.5, sx, sy, x + dx * 0.5, y + dy * 0.5))
    }
}

/// Normalize min/max coordinates from arbitrary start/end points
#[inline]
pub fn normalize_rect(x1: f32, y1: f32, x2: f32, y2: f32) -> (f32, f32, f32, f32) {
    let (min_x, max_x) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
    let (min_y, max_y) = if y1 < y2 { (y1, y2) } else { (y2, y1) };
    (min_x, min_y, max_x, max_y)
}
