//! Region selection state machine
//!
//! Owns the clip region. During a drag the stored width and height may be negative;
//! every accessor hands out a normalized copy.

use crate::domain::{
    ClipRegion, Cursor, HandleSet, HitTest, InteractionState, Point, Size, compute_handles,
    hit_test,
};
use crate::error::{Error, Result};

/// Outcome of a pointer move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// The region changed and the overlay must be repainted
    pub region_changed: bool,
    /// Cursor to show, only reported while idle
    pub cursor: Option<Cursor>,
}

#[derive(Debug, Clone)]
pub struct SelectionController {
    region: Option<ClipRegion>,
    state: InteractionState,
    client: Size,
    tolerance: f32,
}

impl SelectionController {
    pub fn new(client: Size, tolerance: f32) -> Self {
        Self {
            region: None,
            state: InteractionState::Idle,
            client,
            tolerance,
        }
    }

    /// Normalized snapshot of the current region
    pub fn region(&self) -> Option<ClipRegion> {
        self.region.map(ClipRegion::normalized)
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        !self.state.is_idle()
    }

    pub fn handles(&self) -> Option<HandleSet> {
        self.region().map(|region| compute_handles(&region))
    }

    pub fn hit_test(&self, point: Point, handles_enabled: bool) -> Result<HitTest> {
        let region = self
            .region()
            .ok_or(Error::InvalidState("hit test before a region exists"))?;
        Ok(hit_test(
            &region,
            &compute_handles(&region),
            point,
            self.tolerance,
            handles_enabled,
        ))
    }

    pub fn pointer_down(&mut self, point: Point, handles_enabled: bool) -> Result<()> {
        if !self.state.is_idle() {
            return Ok(());
        }

        self.state = match self.region {
            // The region only comes into existence on the first move
            None => InteractionState::CreatingRegion { anchor: point },
            Some(_) => match self.hit_test(point, handles_enabled)? {
                HitTest::Inside => InteractionState::TranslatingRegion { anchor: point },
                HitTest::OnHandle(direction) => InteractionState::ResizingRegion {
                    anchor: point,
                    direction,
                },
                HitTest::Outside => InteractionState::Idle,
            },
        };
        log::trace!("pointer down at {point:?}: {:?}", self.state);
        Ok(())
    }

    pub fn pointer_move(&mut self, point: Point, handles_enabled: bool) -> MoveOutcome {
        let unchanged = MoveOutcome {
            region_changed: false,
            cursor: None,
        };

        let updated = match (self.state, self.region) {
            (InteractionState::CreatingRegion { anchor }, _) => {
                let (dx, dy) = point.delta_from(anchor);
                ClipRegion::new(anchor.x, anchor.y, dx, dy)
            }
            (_, None) => return unchanged,
            (InteractionState::Idle, Some(_)) => {
                let cursor = self
                    .hit_test(point, handles_enabled)
                    .map(HitTest::cursor)
                    .unwrap_or_default();
                return MoveOutcome {
                    cursor: Some(cursor),
                    ..unchanged
                };
            }
            (InteractionState::TranslatingRegion { anchor }, Some(region)) => {
                let (dx, dy) = point.delta_from(anchor);
                self.state = InteractionState::TranslatingRegion { anchor: point };
                region.normalized().translate_clamped(dx, dy, self.client)
            }
            (InteractionState::ResizingRegion { anchor, direction }, Some(region)) => {
                let (dx, dy) = point.delta_from(anchor);
                self.state = InteractionState::ResizingRegion {
                    anchor: point,
                    direction,
                };
                direction.apply(region, dx, dy)
            }
        };

        self.region = Some(updated);
        MoveOutcome {
            region_changed: true,
            cursor: None,
        }
    }

    /// Finish the drag in progress. Returns the normalized region when one was dragged.
    ///
    /// A click without movement creates nothing.
    pub fn pointer_up(&mut self) -> Option<ClipRegion> {
        if self.state.is_idle() {
            return None;
        }
        self.state = InteractionState::Idle;
        self.region = self.region.map(ClipRegion::normalized);
        self.region
    }

    pub fn reset(&mut self) {
        self.region = None;
        self.state = InteractionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CursorHint, Direction};

    fn controller() -> SelectionController {
        SelectionController::new(Size::new(800.0, 600.0), 3.0)
    }

    fn drag(controller: &mut SelectionController, from: Point, to: Point) -> Option<ClipRegion> {
        controller.pointer_down(from, true).unwrap();
        controller.pointer_move(to, true);
        controller.pointer_up()
    }

    #[test]
    fn test_reverse_drag_normalizes() {
        let mut controller = controller();
        let region = drag(
            &mut controller,
            Point::new(300.0, 200.0),
            Point::new(100.0, 50.0),
        );
        assert_eq!(region, Some(ClipRegion::new(100.0, 50.0, 200.0, 150.0)));
        assert!(controller.state().is_idle());
    }

    #[test]
    fn test_click_without_drag_creates_nothing() {
        let mut controller = controller();
        controller.pointer_down(Point::new(50.0, 50.0), true).unwrap();
        assert!(controller.region().is_none());
        assert_eq!(controller.pointer_up(), None);
        assert!(controller.state().is_idle());

        // A later drag still creates the region
        let region = drag(
            &mut controller,
            Point::new(100.0, 100.0),
            Point::new(200.0, 200.0),
        );
        assert_eq!(region, Some(ClipRegion::new(100.0, 100.0, 100.0, 100.0)));
    }

    #[test]
    fn test_region_read_mid_drag_is_normalized() {
        let mut controller = controller();
        controller.pointer_down(Point::new(300.0, 200.0), true).unwrap();
        controller.pointer_move(Point::new(250.0, 150.0), true);
        let region = controller.region().unwrap();
        assert_eq!(region, ClipRegion::new(250.0, 150.0, 50.0, 50.0));
        assert!(controller.is_dragging());
    }

    #[test]
    fn test_translation_stays_in_bounds() {
        let mut controller = controller();
        drag(&mut controller, Point::new(100.0, 100.0), Point::new(300.0, 250.0));

        controller.pointer_down(Point::new(200.0, 200.0), true).unwrap();
        assert!(matches!(
            controller.state(),
            InteractionState::TranslatingRegion { .. }
        ));
        controller.pointer_move(Point::new(-500.0, -500.0), true);
        assert_eq!(
            controller.region(),
            Some(ClipRegion::new(0.0, 0.0, 200.0, 150.0))
        );
        controller.pointer_move(Point::new(2000.0, 2000.0), true);
        let region = controller.pointer_up().unwrap();
        assert_eq!(region, ClipRegion::new(600.0, 450.0, 200.0, 150.0));
    }

    #[test]
    fn test_resize_from_handle() {
        let mut controller = controller();
        drag(&mut controller, Point::new(0.0, 0.0), Point::new(100.0, 100.0));

        controller.pointer_down(Point::new(100.0, 100.0), true).unwrap();
        assert_eq!(
            controller.state(),
            InteractionState::ResizingRegion {
                anchor: Point::new(100.0, 100.0),
                direction: Direction::RightBottom,
            }
        );
        controller.pointer_move(Point::new(110.0, 95.0), true);
        assert_eq!(
            controller.pointer_up(),
            Some(ClipRegion::new(0.0, 0.0, 110.0, 95.0))
        );
    }

    #[test]
    fn test_resize_past_opposite_edge_flips_on_release() {
        let mut controller = controller();
        drag(&mut controller, Point::new(100.0, 100.0), Point::new(200.0, 200.0));

        controller.pointer_down(Point::new(100.0, 150.0), true).unwrap();
        controller.pointer_move(Point::new(250.0, 150.0), true);
        assert_eq!(
            controller.pointer_up(),
            Some(ClipRegion::new(200.0, 100.0, 50.0, 100.0))
        );
    }

    #[test]
    fn test_handles_disabled_translates_instead() {
        let mut controller = controller();
        drag(&mut controller, Point::new(100.0, 100.0), Point::new(200.0, 200.0));

        // Just inside the top-left corner handle
        controller.pointer_down(Point::new(101.0, 101.0), false).unwrap();
        assert!(matches!(
            controller.state(),
            InteractionState::TranslatingRegion { .. }
        ));
    }

    #[test]
    fn test_pointer_down_outside_is_noop() {
        let mut controller = controller();
        drag(&mut controller, Point::new(100.0, 100.0), Point::new(200.0, 200.0));

        controller.pointer_down(Point::new(500.0, 500.0), true).unwrap();
        assert!(controller.state().is_idle());
        let outcome = controller.pointer_move(Point::new(520.0, 520.0), true);
        assert!(!outcome.region_changed);
        assert_eq!(controller.pointer_up(), None);
    }

    #[test]
    fn test_idle_cursor_feedback() {
        let mut controller = controller();
        drag(&mut controller, Point::new(100.0, 100.0), Point::new(200.0, 200.0));

        let cursor = |c: &mut SelectionController, x, y| c.pointer_move(Point::new(x, y), true).cursor;
        assert_eq!(cursor(&mut controller, 150.0, 150.0), Some(Cursor::Move));
        assert_eq!(
            cursor(&mut controller, 150.0, 100.0),
            Some(Cursor::Resize(CursorHint::NsResize))
        );
        assert_eq!(cursor(&mut controller, 10.0, 10.0), Some(Cursor::Default));
    }

    #[test]
    fn test_hit_test_without_region_is_invalid_state() {
        let controller = controller();
        assert!(matches!(
            controller.hit_test(Point::new(0.0, 0.0), true),
            Err(Error::InvalidState(_))
        ));
    }

    #[test]
    fn test_reset_clears_region() {
        let mut controller = controller();
        drag(&mut controller, Point::new(10.0, 10.0), Point::new(20.0, 20.0));
        controller.reset();
        assert!(controller.region().is_none());
        assert!(controller.handles().is_none());
    }
}
