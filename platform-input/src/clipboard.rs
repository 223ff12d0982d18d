//! Host clipboard access and the remote-to-local feedback guard.
//!
//! Text received from the remote side is written to the host clipboard,
//! which makes the host report a clipboard change. Without a guard that
//! change would be forwarded straight back to the remote side.

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),
}

/// Text clipboard of the host system.
pub trait HostClipboard {
    /// Current clipboard text, `None` if empty or not text.
    fn get_text(&mut self) -> Option<String>;

    /// Replace the clipboard contents.
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// In-process clipboard for headless use and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put text on the clipboard as another local application would.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

impl HostClipboard for MemoryClipboard {
    fn get_text(&mut self) -> Option<String> {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.text = Some(text.to_string());
        Ok(())
    }
}

/// System clipboard backed by `arboard`.
#[cfg(feature = "system-clipboard")]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        let inner = arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        Ok(Self { inner })
    }
}

#[cfg(feature = "system-clipboard")]
impl HostClipboard for SystemClipboard {
    fn get_text(&mut self) -> Option<String> {
        self.inner.get_text().ok()
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.inner
            .set_text(text.to_string())
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))
    }
}

/// Remembers the last text received from the remote side.
#[derive(Debug, Clone, Default)]
pub struct ClipboardGuard {
    last_remote: Option<String>,
}

impl ClipboardGuard {
    /// Record text that came from the remote side.
    pub fn remember_remote(&mut self, text: &str) {
        self.last_remote = Some(text.to_string());
    }

    /// True if local clipboard `text` should be sent to the remote side.
    ///
    /// Empty text and text equal to what the remote side last sent are not
    /// forwarded.
    pub fn should_forward(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        if self.last_remote.as_deref() == Some(text) {
            debug!("Clipboard change matches remote text, not forwarding");
            return false;
        }
        true
    }
}
