//! Host surface abstraction
//!
//! The session never touches a global document. Everything it shows goes through
//! a [`Host`] injected at `Session::begin`.

use crate::domain::{ClipRegion, Cursor};

/// Surfaces mounted by a session, bottom to top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Frozen page snapshot shown behind the mask
    Snapshot,
    /// Translucent mask with the clip border and handle dots; receives pointer input
    Mask,
    /// Flattened annotation surface, positioned over the clip region
    Annotations,
    /// Toolbar widget
    Toolbar,
}

impl Layer {
    /// Stacking offset added to the configured base z-index
    pub fn z_offset(self) -> i32 {
        match self {
            Layer::Snapshot | Layer::Mask => 0,
            Layer::Annotations | Layer::Toolbar => 100,
        }
    }
}

pub trait Host {
    /// Show `layer` at `frame` (viewport coordinates)
    fn mount(&mut self, layer: Layer, frame: ClipRegion, z_index: i32);

    /// Move an already mounted layer
    fn place(&mut self, layer: Layer, frame: ClipRegion);

    fn unmount(&mut self, layer: Layer);

    fn set_cursor(&mut self, cursor: Cursor);
}

/// Host that only logs what it is asked to do
#[derive(Debug, Default)]
pub struct LogHost {
    pub mounted: Vec<Layer>,
    pub cursor: Cursor,
}

impl Host for LogHost {
    fn mount(&mut self, layer: Layer, frame: ClipRegion, z_index: i32) {
        log::debug!("mount {layer:?} at {frame:?} (z {z_index})");
        if !self.mounted.contains(&layer) {
            self.mounted.push(layer);
        }
    }

    fn place(&mut self, layer: Layer, frame: ClipRegion) {
        log::debug!("place {layer:?} at {frame:?}");
    }

    fn unmount(&mut self, layer: Layer) {
        log::debug!("unmount {layer:?}");
        self.mounted.retain(|l| *l != layer);
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        if self.cursor != cursor {
            log::trace!("cursor {cursor:?}");
            self.cursor = cursor;
        }
    }
}
