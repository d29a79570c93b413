//! Handle model and interaction state for the clip region

use serde::{Deserialize, Serialize};

use super::geometry::{ClipRegion, Point};

/// Which part of the clip region a handle drags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Top,
    Bottom,
    Left,
    Right,
    LeftTop,
    LeftBottom,
    RightTop,
    RightBottom,
}

/// Side of an axis moved by a resize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    /// Left or top: origin moves, size shrinks by the delta
    Start,
    /// Right or bottom: size grows by the delta
    End,
}

impl Direction {
    /// Handle order used by [`compute_handles`]
    pub const ALL: [Direction; 8] = [
        Direction::LeftTop,
        Direction::Top,
        Direction::RightTop,
        Direction::Left,
        Direction::LeftBottom,
        Direction::Right,
        Direction::Bottom,
        Direction::RightBottom,
    ];

    /// Resize cursor shown while hovering this handle.
    /// Opposite handles share a hint.
    pub fn cursor(self) -> CursorHint {
        match self {
            Direction::LeftTop | Direction::RightBottom => CursorHint::NwResize,
            Direction::RightTop | Direction::LeftBottom => CursorHint::NeResize,
            Direction::Top | Direction::Bottom => CursorHint::NsResize,
            Direction::Left | Direction::Right => CursorHint::EwResize,
        }
    }

    fn edges(self) -> (Option<Edge>, Option<Edge>) {
        match self {
            Direction::Top => (None, Some(Edge::Start)),
            Direction::Bottom => (None, Some(Edge::End)),
            Direction::Left => (Some(Edge::Start), None),
            Direction::Right => (Some(Edge::End), None),
            Direction::LeftTop => (Some(Edge::Start), Some(Edge::Start)),
            Direction::LeftBottom => (Some(Edge::Start), Some(Edge::End)),
            Direction::RightTop => (Some(Edge::End), Some(Edge::Start)),
            Direction::RightBottom => (Some(Edge::End), Some(Edge::End)),
        }
    }

    /// Apply a pointer delta to `region` according to this handle.
    ///
    /// Corners combine the rules of their two edges. The result is not normalized.
    pub fn apply(self, region: ClipRegion, dx: f32, dy: f32) -> ClipRegion {
        let mut out = region;
        let (horizontal, vertical) = self.edges();
        match horizontal {
            Some(Edge::Start) => {
                out.x += dx;
                out.w -= dx;
            }
            Some(Edge::End) => out.w += dx,
            None => {}
        }
        match vertical {
            Some(Edge::Start) => {
                out.y += dy;
                out.h -= dy;
            }
            Some(Edge::End) => out.h += dy,
            None => {}
        }
        out
    }
}

/// Resize cursor symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorHint {
    EwResize,
    NsResize,
    NwResize,
    NeResize,
}

impl CursorHint {
    /// CSS-style cursor name
    pub fn name(self) -> &'static str {
        match self {
            CursorHint::EwResize => "ew-resize",
            CursorHint::NsResize => "ns-resize",
            CursorHint::NwResize => "nw-resize",
            CursorHint::NeResize => "ne-resize",
        }
    }
}

/// Pointer cursor requested from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cursor {
    #[default]
    Default,
    Move,
    Resize(CursorHint),
}

/// One of the eight drag points on the clip region border
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub point: Point,
    pub direction: Direction,
    pub cursor: CursorHint,
}

/// The eight handles of a region, in [`Direction::ALL`] order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleSet([Handle; 8]);

impl HandleSet {
    pub fn iter(&self) -> impl Iterator<Item = &Handle> {
        self.0.iter()
    }

    pub fn get(&self, direction: Direction) -> &Handle {
        let index = Direction::ALL
            .iter()
            .position(|d| *d == direction)
            .unwrap_or_default();
        &self.0[index]
    }

    pub fn as_slice(&self) -> &[Handle] {
        &self.0
    }
}

/// Compute the handle positions: corners at the rectangle's corners, edge handles at the
/// edge midpoints.
pub fn compute_handles(region: &ClipRegion) -> HandleSet {
    let ClipRegion { x, y, w, h } = *region;
    let position = |direction: Direction| match direction {
        Direction::LeftTop => Point::new(x, y),
        Direction::Top => Point::new(x + w * 0.5, y),
        Direction::RightTop => Point::new(x + w, y),
        Direction::Left => Point::new(x, y + h * 0.5),
        Direction::LeftBottom => Point::new(x, y + h),
        Direction::Right => Point::new(x + w, y + h * 0.5),
        Direction::Bottom => Point::new(x + w * 0.5, y + h),
        Direction::RightBottom => Point::new(x + w, y + h),
    };
    HandleSet(Direction::ALL.map(|direction| Handle {
        point: position(direction),
        direction,
        cursor: direction.cursor(),
    }))
}

/// Result of classifying a pointer position against the clip region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTest {
    Inside,
    OnHandle(Direction),
    Outside,
}

impl HitTest {
    /// Cursor feedback for an idle hover at this position
    pub fn cursor(self) -> Cursor {
        match self {
            HitTest::Inside => Cursor::Move,
            HitTest::OnHandle(direction) => Cursor::Resize(direction.cursor()),
            HitTest::Outside => Cursor::Default,
        }
    }
}

/// Classify `point` against `region`.
///
/// A point within `tolerance` of a handle centre wins over interior containment. With
/// `handles_enabled` false only the interior test runs.
pub fn hit_test(
    region: &ClipRegion,
    handles: &HandleSet,
    point: Point,
    tolerance: f32,
    handles_enabled: bool,
) -> HitTest {
    if handles_enabled
        && let Some(handle) = handles
            .iter()
            .find(|handle| handle.point.distance(point) <= tolerance)
    {
        return HitTest::OnHandle(handle.direction);
    }

    if region.contains_point(point) {
        HitTest::Inside
    } else {
        HitTest::Outside
    }
}

/// Selection controller drag state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    CreatingRegion {
        anchor: Point,
    },
    TranslatingRegion {
        anchor: Point,
    },
    ResizingRegion {
        anchor: Point,
        direction: Direction,
    },
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }
}
