//! Layered drawing surface over the clip region
//!
//! Pointer coordinates given to the engine are surface-local: the session subtracts
//! the surface origin before forwarding.

use ab_glyph::FontArc;
use tiny_skia::Pixmap;

use super::stroke::{AnnotationStack, Stroke};
use super::text::TextEditSession;
use crate::config::PageClipConfig;
use crate::core::host::{Host, Layer};
use crate::domain::{ClipRegion, Point, ToolKind, ToolOptions};
use crate::error::{Error, Result};
use crate::render::{image, text};

pub struct AnnotationEngine {
    /// Flattened composite of every stroke
    surface: Pixmap,
    /// Where the surface sits in the viewport
    frame: ClipRegion,
    stack: AnnotationStack,
    tool: Option<ToolOptions>,
    /// Anchor of the drag in progress
    drag: Option<Point>,
    text: Option<TextEditSession>,
    font: Option<FontArc>,
    line_spacing: f32,
    z_index: i32,
    attached: bool,
}

impl AnnotationEngine {
    pub fn new(config: &PageClipConfig) -> Result<Self> {
        let surface = Pixmap::new(1, 1).ok_or(Error::Surface {
            width: 1,
            height: 1,
        })?;
        let font = text::load_font(config.font_path.as_deref());
        if font.is_none() {
            log::warn!("No usable font found, text annotations are disabled");
        }
        Ok(Self {
            surface,
            frame: ClipRegion::default(),
            stack: AnnotationStack::default(),
            tool: None,
            drag: None,
            text: None,
            font,
            line_spacing: config.text_line_spacing,
            z_index: config.z_index + Layer::Annotations.z_offset(),
            attached: false,
        })
    }

    pub fn surface(&self) -> &Pixmap {
        &self.surface
    }

    pub fn frame(&self) -> ClipRegion {
        self.frame
    }

    pub fn tool(&self) -> Option<ToolOptions> {
        self.tool
    }

    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn text_session(&self) -> Option<&TextEditSession> {
        self.text.as_ref()
    }

    /// Select or clear the active tool. An open text session is committed first.
    pub fn set_tool(&mut self, tool: Option<ToolOptions>) {
        self.commit_text();
        self.drag = None;
        self.tool = tool;
    }

    /// Resize and move the surface to `region`.
    ///
    /// Fails without touching the surface once any stroke exists.
    pub fn update_canvas_position(&mut self, region: ClipRegion) -> Result<()> {
        if !self.stack.is_empty() {
            return Err(Error::CanvasLocked(self.stack.len()));
        }
        let width = region.w.round().max(1.0) as u32;
        let height = region.h.round().max(1.0) as u32;
        if (width, height) != (self.surface.width(), self.surface.height()) {
            self.surface = Pixmap::new(width, height).ok_or(Error::Surface { width, height })?;
        }
        self.frame = region;
        Ok(())
    }

    /// Viewport point to surface-local point
    pub fn to_local(&self, point: Point) -> Point {
        Point::new(point.x - self.frame.x, point.y - self.frame.y)
    }

    /// Whether a surface-local point lies within the frame.
    ///
    /// Bounds are the unrounded frame, matching the selection region.
    pub fn contains_local(&self, point: Point) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && point.x <= self.frame.w && point.y <= self.frame.h
    }

    pub fn pointer_down(&mut self, point: Point) -> Result<()> {
        let Some(tool) = self.tool else {
            return Ok(());
        };

        // A click while typing only finishes the text
        if self.text.is_some() {
            self.commit_text();
            return Ok(());
        }

        self.stack.push(Stroke::new(
            tool,
            self.surface.width(),
            self.surface.height(),
        )?);

        if tool.kind == ToolKind::Text {
            self.text = Some(TextEditSession::new(
                point,
                self.surface.width() as f32,
                tool.size as f32,
                tool.color,
            ));
        } else {
            self.drag = Some(point);
        }
        Ok(())
    }

    pub fn pointer_move(&mut self, point: Point) {
        let Some(anchor) = self.drag else {
            return;
        };
        let Some(stroke) = self.stack.top_mut() else {
            self.drag = None;
            return;
        };

        image::draw_tool(&mut stroke.layer, &stroke.tool, anchor, point);
        if stroke.tool.kind == ToolKind::Brush {
            self.drag = Some(point);
        }
        self.flatten();
    }

    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    // ========================================================================
    // Text entry
    // ========================================================================

    pub fn insert_text(&mut self, text: &str) {
        if let Some(session) = self.text.as_mut() {
            session.insert(text);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(session) = self.text.as_mut() {
            session.backspace();
        }
    }

    pub fn set_text(&mut self, text: String) {
        if let Some(session) = self.text.as_mut() {
            session.set(text);
        }
    }

    /// Rasterize the open text session into its pending stroke.
    ///
    /// Returns true when a stroke was kept. A blank buffer drops the pending stroke.
    pub fn commit_text(&mut self) -> bool {
        let Some(session) = self.text.take() else {
            return false;
        };

        if session.is_blank() {
            self.stack.pop();
            self.flatten();
            return false;
        }

        let Some(font) = self.font.as_ref() else {
            log::error!("Dropping text annotation: no font available");
            self.stack.pop();
            self.flatten();
            return false;
        };
        let Some(stroke) = self.stack.top_mut() else {
            return false;
        };

        let style = text::TextStyle {
            font_size: session.font_size,
            line_spacing: self.line_spacing,
            color: session.color,
        };
        let lines = text::draw_text(
            &mut stroke.layer,
            font,
            session.anchor,
            session.width,
            &session.buffer,
            &style,
        );
        log::debug!("Committed text annotation ({lines} lines)");
        self.flatten();
        true
    }

    /// Remove the most recent stroke. Returns how many remain.
    pub fn undo(&mut self) -> usize {
        // An open text session owns the top stroke
        self.text = None;
        self.drag = None;
        if self.stack.pop().is_some() {
            self.flatten();
        }
        self.stack.len()
    }

    /// Mount the surface on `host`. Does nothing when already mounted.
    pub fn attach(&mut self, host: &mut dyn Host) {
        if self.attached {
            return;
        }
        host.mount(Layer::Annotations, self.frame, self.z_index);
        self.attached = true;
    }

    /// Unmount the surface and discard every stroke
    pub fn detach(&mut self, host: &mut dyn Host) {
        if self.attached {
            host.unmount(Layer::Annotations);
            self.attached = false;
        }
        self.text = None;
        self.drag = None;
        self.stack.clear();
        self.flatten();
    }

    fn flatten(&mut self) {
        image::flatten(&mut self.surface, self.stack.layers());
    }
}
