//! Raster drawing for annotation strokes using tiny-skia
//!
//! Every function draws into a stroke's private layer in surface-local pixels.

use tiny_skia::{
    BlendMode, Color, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint,
    Stroke, Transform,
};

use super::geometry::{self, arrow, ellipse};
use crate::config::ShapeColor;
use crate::domain::{Point, ToolKind, ToolOptions};

fn paint_for(color: ShapeColor) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = true;
    paint
}

fn stroke_for(width: f32) -> Stroke {
    Stroke {
        width: width.max(1.0),
        line_cap: LineCap::Round,
        line_join: LineJoin::Miter,
        ..Default::default()
    }
}

/// Clear a layer to fully transparent
pub fn clear(pixmap: &mut Pixmap) {
    pixmap.fill(Color::TRANSPARENT);
}

/// Stroke the axis-aligned rectangle spanned by `from` and `to`
pub fn draw_rect(pixmap: &mut Pixmap, from: Point, to: Point, width: f32, color: ShapeColor) {
    let (min_x, min_y, max_x, max_y) = geometry::normalize_rect(from.x, from.y, to.x, to.y);

    let mut pb = PathBuilder::new();
    pb.move_to(min_x, min_y);
    pb.line_to(max_x, min_y);
    pb.line_to(max_x, max_y);
    pb.line_to(min_x, max_y);
    pb.close();
    let Some(path) = pb.finish() else {
        return;
    };

    pixmap.stroke_path(
        &path,
        &paint_for(color),
        &stroke_for(width),
        Transform::identity(),
        None,
    );
}

/// Stroke the ellipse inscribed in the box spanned by `from` and `to`.
///
/// The circle path is scaled before stroking so the line width stays uniform.
pub fn draw_ellipse(pixmap: &mut Pixmap, from: Point, to: Point, width: f32, color: ShapeColor) {
    let (dx, dy) = to.delta_from(from);
    let Some((radius, sx, sy, cx, cy)) = ellipse::scaled_circle(from.x, from.y, dx, dy) else {
        return;
    };

    let mut pb = PathBuilder::new();
    pb.push_circle(0.0, 0.0, radius);
    let Some(path) = pb.finish() else {
        return;
    };
    let Some(path) = path.transform(Transform::from_scale(sx, sy).post_translate(cx, cy)) else {
        log::debug!("Degenerate ellipse skipped ({dx}x{dy})");
        return;
    };

    pixmap.stroke_path(
        &path,
        &paint_for(color),
        &stroke_for(width),
        Transform::identity(),
        None,
    );
}

/// Fill an arrow from `from` to the tip at `to`
pub fn draw_arrow(pixmap: &mut Pixmap, from: Point, to: Point, size: u32, color: ShapeColor) {
    let width = arrow::width_for_size(size);
    let Some(points) = arrow::polygon(from.x, from.y, to.x, to.y, width) else {
        return;
    };

    let mut pb = PathBuilder::new();
    pb.move_to(points[0].0, points[0].1);
    for (x, y) in &points[1..] {
        pb.line_to(*x, *y);
    }
    pb.close();
    let Some(path) = pb.finish() else {
        return;
    };

    pixmap.fill_path(
        &path,
        &paint_for(color),
        FillRule::Winding,
        Transform::identity(),
        None,
    );
}

/// Append one freehand segment
pub fn draw_segment(pixmap: &mut Pixmap, from: Point, to: Point, width: f32, color: ShapeColor) {
    let mut pb = PathBuilder::new();
    pb.move_to(from.x, from.y);
    pb.line_to(to.x, to.y);
    let Some(path) = pb.finish() else {
        return;
    };

    pixmap.stroke_path(
        &path,
        &paint_for(color),
        &stroke_for(width),
        Transform::identity(),
        None,
    );
}

/// Draw the shape for `tool` from `anchor` to `current`.
///
/// Shape tools clear the layer first; the brush accumulates. Text is rasterized
/// separately by `render::text`.
pub fn draw_tool(pixmap: &mut Pixmap, tool: &ToolOptions, anchor: Point, current: Point) {
    if tool.kind.redraws_on_move() {
        clear(pixmap);
    }
    let width = tool.size as f32;
    match tool.kind {
        ToolKind::Rect => draw_rect(pixmap, anchor, current, width, tool.color),
        ToolKind::Ellipse => draw_ellipse(pixmap, anchor, current, width, tool.color),
        ToolKind::Arrow => draw_arrow(pixmap, anchor, current, tool.size, tool.color),
        ToolKind::Brush => draw_segment(pixmap, anchor, current, width, tool.color),
        ToolKind::Text => {}
    }
}

/// Composite `layers` in order onto `target`, replacing its previous content
pub fn flatten<'a>(target: &mut Pixmap, layers: impl IntoIterator<Item = &'a Pixmap>) {
    clear(target);
    let paint = PixmapPaint {
        blend_mode: BlendMode::SourceOver,
        ..Default::default()
    };
    for layer in layers {
        target.draw_pixmap(0, 0, layer.as_ref(), &paint, Transform::identity(), None);
    }
}
