//! Text entry sub-mode

use crate::config::ShapeColor;
use crate::domain::Point;

/// Editable text waiting to be rasterized into the top stroke
#[derive(Debug, Clone, PartialEq)]
pub struct TextEditSession {
    /// Top-left corner of the first line, surface-local
    pub anchor: Point,
    /// Wrap width: from the anchor to the right edge of the surface
    pub width: f32,
    pub buffer: String,
    pub font_size: f32,
    pub color: ShapeColor,
}

impl TextEditSession {
    pub fn new(anchor: Point, surface_width: f32, font_size: f32, color: ShapeColor) -> Self {
        Self {
            anchor,
            width: (surface_width - anchor.x).max(0.0),
            buffer: String::new(),
            font_size,
            color,
        }
    }

    pub fn insert(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    pub fn set(&mut self, text: String) {
        self.buffer = text;
    }

    /// Whitespace-only buffers are discarded on commit
    pub fn is_blank(&self) -> bool {
        self.buffer.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_runs_to_surface_edge() {
        let session = TextEditSession::new(Point::new(30.0, 5.0), 200.0, 18.0, ShapeColor::BLACK);
        assert_eq!(session.width, 170.0);
        assert!(session.is_blank());
    }

    #[test]
    fn test_buffer_editing() {
        let mut session = TextEditSession::new(Point::new(0.0, 0.0), 100.0, 14.0, ShapeColor::RED);
        session.insert("héllo");
        session.backspace();
        assert_eq!(session.buffer, "héll");
        session.set(" \n\t".to_string());
        assert!(session.is_blank());
    }
}
