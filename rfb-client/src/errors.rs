//! Error types for the engine boundary.

use std::io;
use thiserror::Error;

/// Errors returned when talking to the protocol engine or loading settings.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The engine side of the command channel has gone away.
    #[error("Not connected to the remote engine")]
    NotConnected,

    /// The command channel is full; the command was dropped.
    #[error("Command channel full")]
    ChannelFull,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading a configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A configuration file is not valid TOML or does not match the schema.
    #[error("Invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ClientError {
    /// Returns true if sending again later may succeed.
    ///
    /// A full channel drains as the engine catches up. Everything else needs
    /// outside intervention.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ChannelFull)
    }

    /// Returns true if this is a fatal error that should not be retried.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !self.is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categorization() {
        assert!(ClientError::ChannelFull.is_retryable());
        assert!(ClientError::NotConnected.is_fatal());
        assert!(ClientError::Config("bad scale".to_string()).is_fatal());
        assert!(ClientError::Io(io::Error::from(io::ErrorKind::NotFound)).is_fatal());
    }

    #[test]
    fn test_error_display() {
        let err = ClientError::Config("min scale above max".to_string());
        assert_eq!(err.to_string(), "Configuration error: min scale above max");
        assert_eq!(
            ClientError::NotConnected.to_string(),
            "Not connected to the remote engine"
        );
    }
}
