//! Boundary between the viewer and the remote protocol engine.
//!
//! The engine decodes remote updates on its own thread and reports them as
//! [`ServerEvent`]s. The viewer forwards local input back through a
//! [`RemoteSink`]; [`ChannelSink`] is the flume-backed implementation whose
//! receiving end the engine's write loop drains.
//!
//! # Quick Start
//!
//! ```
//! use rfb_client::{ChannelSink, ClientCommand, Config, RemoteSink};
//! use rfb_common::Point;
//!
//! let config = Config::from_toml_str("[input]\ncommand_queue = 16\n")?;
//! let (sink, commands) = ChannelSink::bounded(config.input.command_queue);
//!
//! sink.send_pointer_event(0b001, Point::new(10, 20))?;
//! assert!(matches!(
//!     commands.try_recv(),
//!     Ok(ClientCommand::Pointer { x: 10, y: 20, buttons: 1 })
//! ));
//! # Ok::<(), rfb_client::ClientError>(())
//! ```
//!
//! # Error Handling
//!
//! Send failures are returned, never swallowed. A full channel is
//! retryable; a dropped engine is not.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod errors;
pub mod messages;
pub mod sink;

// Re-exports
pub use config::{Config, ConfigBuilder, ScaleSetting};
pub use errors::ClientError;
pub use messages::{ClientCommand, ServerEvent};
pub use sink::{ChannelSink, RemoteSink};
