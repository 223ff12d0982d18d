//! Window events understood by the [`InputRouter`](crate::InputRouter).

use rfb_common::{Dimension, Point, Rect};
use rfb_display::{Axis, ScrollAction};

/// Pointer buttons forwarded to the remote side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Host window events, already translated out of the host's own types.
///
/// Mouse positions are local (client area) pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowEvent {
    /// New client area size.
    Resize(Dimension),
    /// Local rectangle to repaint.
    Paint(Rect),
    MouseMove(Point),
    MouseButton { button: MouseButton, pressed: bool },
    /// Wheel notches; positive `vertical` is away from the user.
    MouseWheel { horizontal: i32, vertical: i32 },
    /// Key press or release, already translated to a keysym.
    Key { keysym: u32, down: bool },
    /// Typed character.
    Char(char),
    /// Scrollbar interaction.
    Scroll { axis: Axis, action: ScrollAction },
    /// The host clipboard contents changed.
    ClipboardChanged,
    Destroy,
}

/// What the router should do with a mouse event after the hook saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseDisposition {
    /// Handle normally.
    Forward,
    /// Drop the event.
    Consume,
    /// Start panning at the current mouse position and drop the event.
    StartPan,
    /// Stop panning and drop the event.
    StopPan,
}

/// Callback that sees every mouse event before the router, with the local
/// mouse position.
pub type MouseHook = Box<dyn FnMut(&WindowEvent, Point) -> MouseDisposition + Send>;
