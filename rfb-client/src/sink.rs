//! Outbound path from the viewer to the protocol engine.

use crate::errors::ClientError;
use crate::messages::ClientCommand;
use bytes::Bytes;
use flume::{Receiver, Sender, TrySendError};
use rfb_common::Point;
use tracing::trace;

/// Destination for input the viewer forwards to the remote side.
///
/// Every call reports failure; callers check the result and never roll back
/// local state because a send failed.
pub trait RemoteSink {
    /// Send the button mask and framebuffer position of the pointer.
    fn send_pointer_event(&self, buttons: u8, position: Point) -> Result<(), ClientError>;

    /// Send a key press or release.
    fn send_key_event(&self, keysym: u32, down: bool) -> Result<(), ClientError>;

    /// Send local clipboard text to the remote side.
    fn send_clipboard_text(&self, text: &str) -> Result<(), ClientError>;
}

/// [`RemoteSink`] that queues [`ClientCommand`]s on a flume channel read by
/// the engine's write loop.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<ClientCommand>,
}

impl ChannelSink {
    /// Wrap an existing sender.
    #[must_use]
    pub fn new(tx: Sender<ClientCommand>) -> Self {
        Self { tx }
    }

    /// Create a sink on a new bounded channel and return the engine's end.
    #[must_use]
    pub fn bounded(capacity: usize) -> (Self, Receiver<ClientCommand>) {
        let (tx, rx) = flume::bounded(capacity);
        (Self::new(tx), rx)
    }

    fn send(&self, command: ClientCommand) -> Result<(), ClientError> {
        trace!("Queueing {:?}", command);
        self.tx.try_send(command).map_err(|e| match e {
            TrySendError::Full(_) => ClientError::ChannelFull,
            TrySendError::Disconnected(_) => ClientError::NotConnected,
        })
    }
}

/// Clamp a framebuffer coordinate into the wire range.
fn wire_coordinate(v: i32) -> u16 {
    v.clamp(0, i32::from(u16::MAX)) as u16
}

impl RemoteSink for ChannelSink {
    fn send_pointer_event(&self, buttons: u8, position: Point) -> Result<(), ClientError> {
        self.send(ClientCommand::Pointer {
            x: wire_coordinate(position.x),
            y: wire_coordinate(position.y),
            buttons,
        })
    }

    fn send_key_event(&self, keysym: u32, down: bool) -> Result<(), ClientError> {
        self.send(ClientCommand::Key { key: keysym, down })
    }

    fn send_clipboard_text(&self, text: &str) -> Result<(), ClientError> {
        self.send(ClientCommand::ClientCutText {
            text: Bytes::copy_from_slice(text.as_bytes()),
        })
    }
}
