//! Mouse-driven panning.

use rfb_common::{FPoint, Point};
use tracing::debug;

/// State captured when a pan starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub start_origin: FPoint,
    pub start_mouse: Point,
}

/// Idle/dragging state machine for panning the view with the mouse.
///
/// While a session is active, mouse motion moves the origin instead of being
/// forwarded to the remote side.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<DragSession> {
        self.session
    }

    /// Begin a pan at `local`. Ignored (returns false) if already dragging.
    pub fn start(&mut self, local: Point, origin: FPoint) -> bool {
        if self.session.is_some() {
            return false;
        }
        debug!("Drag started at ({}, {})", local.x, local.y);
        self.session = Some(DragSession {
            start_origin: origin,
            start_mouse: local,
        });
        true
    }

    /// Origin to apply for the mouse now at `local`, or `None` when idle.
    pub fn move_to(&self, local: Point, scale: f64) -> Option<FPoint> {
        let session = self.session?;
        let dx = (local.x - session.start_mouse.x) as f64 / scale;
        let dy = (local.y - session.start_mouse.y) as f64 / scale;
        Some(FPoint::new(
            session.start_origin.x - dx,
            session.start_origin.y - dy,
        ))
    }

    /// End the pan. Safe to call when idle; returns whether a session ended.
    pub fn stop(&mut self) -> bool {
        let was_dragging = self.session.take().is_some();
        if was_dragging {
            debug!("Drag stopped");
        }
        was_dragging
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_shifts_origin_against_mouse() {
        let mut drag = DragController::new();
        assert!(drag.start(Point::new(10, 10), FPoint::new(100.0, 100.0)));
        assert_eq!(drag.move_to(Point::new(30, 10), 1.0), Some(FPoint::new(80.0, 100.0)));
    }

    #[test]
    fn test_delta_is_divided_by_scale() {
        let mut drag = DragController::new();
        drag.start(Point::new(0, 0), FPoint::new(50.0, 50.0));
        assert_eq!(drag.move_to(Point::new(20, -10), 2.0), Some(FPoint::new(40.0, 55.0)));
    }

    #[test]
    fn test_second_start_is_ignored() {
        let mut drag = DragController::new();
        drag.start(Point::new(1, 1), FPoint::new(0.0, 0.0));
        assert!(!drag.start(Point::new(50, 50), FPoint::new(9.0, 9.0)));
        assert_eq!(drag.session().unwrap().start_mouse, Point::new(1, 1));
    }

    #[test]
    fn test_move_after_stop_is_noop() {
        let mut drag = DragController::new();
        drag.start(Point::new(10, 10), FPoint::default());
        assert!(drag.stop());
        assert!(!drag.stop());
        assert!(!drag.is_dragging());
        assert_eq!(drag.move_to(Point::new(30, 10), 1.0), None);
    }
}
