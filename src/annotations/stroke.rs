//! Stroke layers and the linear undo history

use tiny_skia::Pixmap;

use crate::domain::ToolOptions;
use crate::error::{Error, Result};

/// One annotation: the tool that drew it and its private raster layer
#[derive(Debug, Clone)]
pub struct Stroke {
    pub tool: ToolOptions,
    pub layer: Pixmap,
}

impl Stroke {
    /// Empty stroke covering a `width` x `height` surface
    pub fn new(tool: ToolOptions, width: u32, height: u32) -> Result<Self> {
        let layer = Pixmap::new(width, height).ok_or(Error::Surface { width, height })?;
        Ok(Self { tool, layer })
    }
}

/// Ordered strokes, bottom to top. Only the top entry is ever drawn into or removed.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStack {
    strokes: Vec<Stroke>,
}

impl AnnotationStack {
    pub fn push(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    pub fn pop(&mut self) -> Option<Stroke> {
        self.strokes.pop()
    }

    pub fn top_mut(&mut self) -> Option<&mut Stroke> {
        self.strokes.last_mut()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    /// Layers in z-order
    pub fn layers(&self) -> impl Iterator<Item = &Pixmap> {
        self.strokes.iter().map(|stroke| &stroke.layer)
    }
}
