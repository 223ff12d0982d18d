//! Error types for pixel storage.

use rfb_common::{Dimension, Rect};
use thiserror::Error;

/// Errors returned by [`PixelStore`](crate::PixelStore) operations.
///
/// None of these are fatal: the store is left unchanged and the caller is
/// expected to log and drop the offending update.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PixelStoreError {
    /// The rectangle does not lie within the current valid dimension.
    ///
    /// Usually a write that raced a resize; the producer retries once it has
    /// seen the new size.
    #[error("rectangle {rect} outside framebuffer {dimension}")]
    OutOfBounds { rect: Rect, dimension: Dimension },

    /// The source pixel data is shorter than the rectangle requires.
    #[error("insufficient pixel data: got {actual} bytes, need {expected}")]
    DataLength { expected: usize, actual: usize },
}
