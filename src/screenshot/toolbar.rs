//! Toolbar collaborator and its anchored placement

use serde::{Deserialize, Serialize};

use crate::config::ShapeColor;
use crate::domain::{ClipRegion, OptionMode, Size};

/// Measured toolbar extents in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ToolbarSize {
    pub width: f32,
    pub toolbar_height: f32,
    /// Height of the option panel shown next to the toolbar while a tool is active
    pub option_panel_height: f32,
}

/// Which side of the clip region the toolbar sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolbarSide {
    Top,
    #[default]
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ToolbarPlacement {
    pub side: ToolbarSide,
    pub left: f32,
    pub top: f32,
}

/// Anchor the toolbar to the bottom-right corner of `region`, `gap` pixels away.
///
/// Prefers below the region. Flips above when the toolbar plus its option panel would
/// overflow the viewport bottom, then clamps to the top and left edges.
pub fn place_toolbar(
    region: &ClipRegion,
    size: &ToolbarSize,
    client: Size,
    gap: f32,
) -> ToolbarPlacement {
    let mut side = ToolbarSide::Bottom;
    let mut top = region.bottom() + gap;
    if top + size.toolbar_height + size.option_panel_height > client.height {
        side = ToolbarSide::Top;
        top = region.y - gap - size.toolbar_height;
    }
    let left = region.right() - size.width - gap;

    ToolbarPlacement {
        side,
        left: left.max(0.0),
        top: top.max(0.0),
    }
}

/// External toolbar widget driven by the session.
///
/// The toolbar reports user actions back as `ToolbarMsg` values.
pub trait Toolbar {
    /// Show the size and colour choices for the selected tool
    fn set_active_option_panel(&mut self, size: u32, color: ShapeColor, mode: OptionMode);

    fn set_position(&mut self, placement: ToolbarPlacement);

    fn size(&self) -> ToolbarSize;

    fn show(&mut self);

    fn hide(&mut self);

    /// Return to no active tool
    fn reset(&mut self);
}

/// Toolbar with fixed dimensions that only records what it was told
#[derive(Debug, Clone, Default)]
pub struct HeadlessToolbar {
    pub size: ToolbarSize,
    pub placement: Option<ToolbarPlacement>,
    pub visible: bool,
    pub option_panel: Option<(u32, ShapeColor, OptionMode)>,
}

impl HeadlessToolbar {
    pub fn new(size: ToolbarSize) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }
}

impl Toolbar for HeadlessToolbar {
    fn set_active_option_panel(&mut self, size: u32, color: ShapeColor, mode: OptionMode) {
        self.option_panel = Some((size, color, mode));
    }

    fn set_position(&mut self, placement: ToolbarPlacement) {
        log::debug!("toolbar at {placement:?}");
        self.placement = Some(placement);
    }

    fn size(&self) -> ToolbarSize {
        self.size
    }

    fn show(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn reset(&mut self) {
        self.option_panel = None;
    }
}
