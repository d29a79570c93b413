//! Selection overlay: translucent mask, clip border and handle dots

use tiny_skia::{BlendMode, Color, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::config::{PageClipConfig, ShapeColor};
use crate::domain::{ClipRegion, HandleSet, Size};
use crate::error::{Error, Result};

/// Full-viewport surface repainted after every selection change
pub struct Overlay {
    pixmap: Pixmap,
    mask_color: ShapeColor,
    border_color: ShapeColor,
    dot_radius: f32,
}

impl Overlay {
    pub fn new(viewport: Size, config: &PageClipConfig) -> Result<Self> {
        let width = viewport.width.max(1.0) as u32;
        let height = viewport.height.max(1.0) as u32;
        let pixmap = Pixmap::new(width, height).ok_or(Error::Surface { width, height })?;
        Ok(Self {
            pixmap,
            mask_color: config.mask_color,
            border_color: config.border_color,
            dot_radius: config.dot_radius,
        })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Repaint the overlay.
    ///
    /// `region` must already be normalized. Without a region the whole viewport is masked.
    pub fn render(&mut self, region: Option<&ClipRegion>, handles: Option<&HandleSet>) {
        self.pixmap.fill(Color::TRANSPARENT);

        let mut mask = Paint::default();
        mask.set_color(self.mask_color.to_skia());
        if let Some(full) = Rect::from_xywh(
            0.0,
            0.0,
            self.pixmap.width() as f32,
            self.pixmap.height() as f32,
        ) {
            self.pixmap
                .fill_rect(full, &mask, Transform::identity(), None);
        }

        let Some(region) = region else {
            return;
        };

        // Punch the clip region out of the mask
        if let Some(hole) = Rect::from_xywh(region.x, region.y, region.w, region.h) {
            let mut clear = Paint::default();
            clear.blend_mode = BlendMode::Clear;
            self.pixmap
                .fill_rect(hole, &clear, Transform::identity(), None);
        }

        let mut border = Paint::default();
        border.set_color(self.border_color.to_skia());
        border.anti_alias = true;

        let mut pb = PathBuilder::new();
        pb.move_to(region.x, region.y);
        pb.line_to(region.right(), region.y);
        pb.line_to(region.right(), region.bottom());
        pb.line_to(region.x, region.bottom());
        pb.close();
        if let Some(path) = pb.finish() {
            let stroke = Stroke {
                width: 1.0,
                ..Default::default()
            };
            self.pixmap
                .stroke_path(&path, &border, &stroke, Transform::identity(), None);
        }

        let Some(handles) = handles else {
            return;
        };
        let mut pb = PathBuilder::new();
        for handle in handles.iter() {
            pb.push_circle(handle.point.x, handle.point.y, self.dot_radius);
        }
        if let Some(dots) = pb.finish() {
            self.pixmap.fill_path(
                &dots,
                &border,
                tiny_skia::FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }
}
