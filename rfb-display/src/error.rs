use rfb_pixelbuffer::PixelStoreError;
use thiserror::Error;

/// Errors returned by [`DesktopView`](crate::DesktopView) operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DisplayError {
    #[error("pixel store update failed: {0}")]
    Store(#[from] PixelStoreError),
}

/// Common result type for display operations
pub type DisplayResult<T> = Result<T, DisplayError>;
