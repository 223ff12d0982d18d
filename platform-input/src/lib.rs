//! platform-input: route window events to the desktop view and the remote side
//!
//! [`InputRouter`] dispatches the tagged [`WindowEvent`] enum: layout and
//! paint events drive the [`rfb_display::DesktopView`], mouse, keyboard and
//! clipboard events become pointer, key and cut-text messages on a
//! [`rfb_client::RemoteSink`]. [`Viewer`] bundles the pieces together and also
//! consumes the engine's [`rfb_client::ServerEvent`]s.
//!
//! Host windowing systems translate their own events first; a winit adapter
//! is provided in [`winit_adapter`].

mod clipboard;
mod event;
mod keyboard;
mod mouse;
mod router;
mod viewer;
pub mod winit_adapter;

pub use clipboard::{ClipboardError, ClipboardGuard, HostClipboard, MemoryClipboard};
#[cfg(feature = "system-clipboard")]
pub use clipboard::SystemClipboard;
pub use event::{MouseButton, MouseDisposition, MouseHook, WindowEvent};
pub use keyboard::{char_to_keysym, is_win_key, keysyms, ModifierState, CTRL_ALT_DEL};
pub use mouse::{ButtonMask, MouseState};
pub use router::{InputOptions, InputRouter};
pub use viewer::{viewport_config, Viewer};
pub use winit_adapter::WinitTranslator;
