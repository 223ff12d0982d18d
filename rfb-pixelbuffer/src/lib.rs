//! Pixel storage for the remote screen image.
//!
//! This crate holds the locally cached copy of the remote framebuffer. The
//! [`PixelStore`] is shared between the decode producer, which writes updated
//! rectangles, and the paint path, which copies regions out for blitting.
//!
//! # Stride is in Pixels, Not Bytes!
//!
//! Every stride in this API counts **pixels**. Byte offsets are always
//! `(y * stride + x) * bytes_per_pixel`.

pub mod error;
pub mod format;
pub mod store;

pub use error::PixelStoreError;
pub use format::PixelFormat;
pub use store::{PixelStore, RegionSnapshot, SharedPixelStore};
