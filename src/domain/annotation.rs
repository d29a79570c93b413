//! Annotation tool types
//!
//! Coordinates handed to the annotation engine are local to the annotation surface.

use serde::{Deserialize, Serialize};

use crate::config::ShapeColor;

/// Drawing tool kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Rect,
    Ellipse,
    Arrow,
    Brush,
    Text,
}

impl ToolKind {
    /// Every kind except brush redraws its whole shape from the anchor on each move
    pub fn redraws_on_move(self) -> bool {
        !matches!(self, ToolKind::Brush | ToolKind::Text)
    }

    /// Which size panel the toolbar should show for this tool
    pub fn option_mode(self) -> OptionMode {
        match self {
            ToolKind::Text => OptionMode::Text,
            _ => OptionMode::Common,
        }
    }
}

/// Size options offered by the toolbar: line width levels or font sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionMode {
    Common,
    Text,
}

impl OptionMode {
    /// Selectable sizes for this mode
    pub fn sizes(self) -> [u32; 3] {
        match self {
            OptionMode::Common => COMMON_SIZES,
            OptionMode::Text => TEXT_SIZES,
        }
    }
}

/// Line width levels (small, middle, large)
pub const COMMON_SIZES: [u32; 3] = [1, 2, 3];
/// Font sizes in pixels (small, middle, large)
pub const TEXT_SIZES: [u32; 3] = [14, 18, 22];

/// The active drawing tool and its parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolOptions {
    pub kind: ToolKind,
    pub size: u32,
    pub color: ShapeColor,
}

impl ToolOptions {
    pub fn new(kind: ToolKind, size: u32, color: ShapeColor) -> Self {
        Self { kind, size, color }
    }

    /// Default options for `kind`: middle size, black
    pub fn default_for(kind: ToolKind) -> Self {
        let size = match kind.option_mode() {
            OptionMode::Common => COMMON_SIZES[1],
            OptionMode::Text => TEXT_SIZES[1],
        };
        Self {
            kind,
            size,
            color: ShapeColor::BLACK,
        }
    }
}
