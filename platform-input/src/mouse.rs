use bitflags::bitflags;
use rfb_common::{Dimension, Point};
use tracing::trace;

use crate::event::MouseButton;

bitflags! {
    /// VNC pointer button mask (bits).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ButtonMask: u8 {
        const LEFT  = 1 << 0; // Button 1
        const MIDDLE= 1 << 1; // Button 2
        const RIGHT = 1 << 2; // Button 3
        const WHEEL_UP   = 1 << 3; // Button 4 (scroll up)
        const WHEEL_DOWN = 1 << 4; // Button 5 (scroll down)
        const WHEEL_LEFT = 1 << 5; // Button 6 (horizontal scroll left)
        const WHEEL_RIGHT = 1 << 6; // Button 7 (horizontal scroll right)
    }
}

impl From<MouseButton> for ButtonMask {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Self::LEFT,
            MouseButton::Middle => Self::MIDDLE,
            MouseButton::Right => Self::RIGHT,
        }
    }
}

/// Tracks mouse state for building pointer events.
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    pub buttons: ButtonMask,
    /// Last position, clamped to the viewport.
    position: Point,
    /// Last position as reported by the host.
    unclamped: Point,
    /// Last pointer event actually forwarded.
    last_sent: Option<(ButtonMask, Point)>,
}

impl Default for ButtonMask {
    fn default() -> Self {
        Self::empty()
    }
}

impl MouseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new local position.
    pub fn set_position(&mut self, local: Point, viewport: Dimension) {
        self.unclamped = local;
        let max_x = viewport.width.saturating_sub(1) as i32;
        let max_y = viewport.height.saturating_sub(1) as i32;
        self.position = Point::new(local.x.clamp(0, max_x), local.y.clamp(0, max_y));
    }

    /// Position clamped to the viewport.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Position as last reported, possibly outside the viewport. Used as the
    /// zoom anchor.
    pub fn unclamped_position(&self) -> Point {
        self.unclamped
    }

    /// Press or release a button.
    pub fn set_button(&mut self, button: MouseButton, pressed: bool) {
        self.buttons.set(button.into(), pressed);
    }

    /// Decide whether a pointer event with `mask` at framebuffer `point`
    /// should go out, and record it as sent if so.
    ///
    /// Repeats of the last forwarded event are suppressed.
    pub fn should_send(&mut self, mask: ButtonMask, point: Point) -> bool {
        if self.last_sent == Some((mask, point)) {
            trace!("Suppressing duplicate pointer event at ({}, {})", point.x, point.y);
            return false;
        }
        self.last_sent = Some((mask, point));
        true
    }

    /// Forget the last forwarded event so the next one always goes out.
    pub fn reset_last_sent(&mut self) {
        self.last_sent = None;
    }

    /// Button masks for `notches` wheel clicks: press/release pairs on top of
    /// the held buttons.
    ///
    /// Positive `vertical` scrolls up, positive `horizontal` scrolls right.
    pub fn wheel_masks(&self, horizontal: i32, vertical: i32, speed: u32) -> Vec<ButtonMask> {
        let mut masks = Vec::new();
        let mut push = |notches: i32, positive: ButtonMask, negative: ButtonMask| {
            let wheel = if notches > 0 { positive } else { negative };
            for _ in 0..notches.unsigned_abs() * speed {
                masks.push(self.buttons | wheel);
                masks.push(self.buttons);
            }
        };
        push(vertical, ButtonMask::WHEEL_UP, ButtonMask::WHEEL_DOWN);
        push(horizontal, ButtonMask::WHEEL_RIGHT, ButtonMask::WHEEL_LEFT);
        masks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_clamped_to_viewport() {
        let mut mouse = MouseState::new();
        mouse.set_position(Point::new(-5, 900), Dimension::new(800, 600));
        assert_eq!(mouse.position(), Point::new(0, 599));
        assert_eq!(mouse.unclamped_position(), Point::new(-5, 900));
    }

    #[test]
    fn test_buttons() {
        let mut mouse = MouseState::new();
        mouse.set_button(MouseButton::Left, true);
        mouse.set_button(MouseButton::Right, true);
        assert_eq!(mouse.buttons.bits(), 0b101);
        mouse.set_button(MouseButton::Left, false);
        assert_eq!(mouse.buttons, ButtonMask::RIGHT);
    }

    #[test]
    fn test_duplicate_suppression() {
        let mut mouse = MouseState::new();
        let p = Point::new(3, 4);
        assert!(mouse.should_send(ButtonMask::empty(), p));
        assert!(!mouse.should_send(ButtonMask::empty(), p));
        assert!(mouse.should_send(ButtonMask::LEFT, p));
        mouse.reset_last_sent();
        assert!(mouse.should_send(ButtonMask::LEFT, p));
    }

    #[test]
    fn test_wheel_masks() {
        let mut mouse = MouseState::new();
        mouse.set_button(MouseButton::Left, true);
        let masks = mouse.wheel_masks(0, -2, 1);
        let down = ButtonMask::LEFT | ButtonMask::WHEEL_DOWN;
        assert_eq!(masks, vec![down, ButtonMask::LEFT, down, ButtonMask::LEFT]);

        let masks = MouseState::new().wheel_masks(1, 0, 3);
        assert_eq!(masks.len(), 6);
        assert_eq!(masks[0], ButtonMask::WHEEL_RIGHT);
    }
}
