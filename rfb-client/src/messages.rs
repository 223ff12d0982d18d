//! Message types exchanged between the viewer and the protocol engine.

use bytes::Bytes;
use rfb_common::{Dimension, Rect};

/// Events sent from the protocol engine to the viewer.
#[derive(Debug, Clone)]
pub enum ServerEvent {
    /// Handshake finished; the remote screen can be shown.
    Connected {
        /// Framebuffer width in pixels.
        width: u16,
        /// Framebuffer height in pixels.
        height: u16,
        /// Server name/description.
        name: String,
    },

    /// The remote screen changed size.
    FramebufferResized {
        /// New width in pixels.
        width: u16,
        /// New height in pixels.
        height: u16,
    },

    /// Decoded pixels for one rectangle, tightly packed in the store's
    /// pixel format.
    RegionUpdated {
        /// Updated framebuffer rectangle.
        rect: Rect,
        /// Pixel data for `rect`.
        pixels: Bytes,
    },

    /// Server sent clipboard/cut text data.
    CutText {
        /// Clipboard data (typically UTF-8 text).
        text: Bytes,
    },

    /// Connection has been closed (gracefully or due to error).
    ConnectionClosed,
}

impl ServerEvent {
    /// Remote screen size carried by `Connected` and `FramebufferResized`.
    #[must_use]
    pub fn dimension(&self) -> Option<Dimension> {
        match self {
            Self::Connected { width, height, .. } | Self::FramebufferResized { width, height } => {
                Some(Dimension::new(u32::from(*width), u32::from(*height)))
            }
            _ => None,
        }
    }
}

/// Commands sent from the viewer to the protocol engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// Send pointer (mouse) event.
    Pointer {
        /// X coordinate in framebuffer pixels.
        x: u16,
        /// Y coordinate in framebuffer pixels.
        y: u16,
        /// Button mask (bit 0 = left, bit 1 = middle, bit 2 = right,
        /// bits 3-6 = wheel).
        buttons: u8,
    },

    /// Send keyboard event.
    Key {
        /// X11 keysym value.
        key: u32,
        /// True if key was pressed, false if released.
        down: bool,
    },

    /// Send clipboard/cut text to server.
    ClientCutText {
        /// Text data to send (UTF-8).
        text: Bytes,
    },
}
