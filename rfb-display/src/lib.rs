//! # rfb-display: Viewport and repaint logic for a remote desktop view
//!
//! This crate maps between the local window and the remote framebuffer under
//! an adjustable scale and scroll origin, and decides what to repaint when
//! either side changes. Drawing itself is left to the host through the
//! [`WindowHost`] trait.
//!
//! ## Features
//!
//! - **Scaling**: explicit percentages or auto-fit, clamped to configured limits
//! - **Scrolling**: scrollbar visibility, ranges and line/page actions
//! - **Panning**: mouse drag moves the origin
//! - **Repaint planning**: remote updates invalidate only visible local pixels;
//!   letterbox areas get the background colour
//!
//! ## Example
//!
//! ```rust
//! use rfb_common::{Dimension, Rect};
//! use rfb_display::{DesktopView, RecordingHost, ScaleMode, ViewportConfig};
//! use rfb_pixelbuffer::{PixelFormat, PixelStore};
//!
//! let store = PixelStore::shared(PixelFormat::rgb888());
//! let mut view = DesktopView::new(ViewportConfig::default(), store);
//! let mut host = RecordingHost::new(Dimension::new(800, 600));
//!
//! view.on_resize(Dimension::new(800, 600), &mut host);
//! view.on_framebuffer_resized(Dimension::new(1024, 768), &mut host);
//! view.set_scale(ScaleMode::Auto, &mut host);
//! assert_eq!(view.scale_percent(), 78);
//!
//! view.on_connected(&mut host);
//! view.paint(Rect::new(0, 0, 800, 600), &mut host);
//! ```

mod desktop;
mod drag;
mod error;
mod host;
mod repaint;
mod scaling;
mod scroll;
mod viewport;

pub use desktop::DesktopView;
pub use drag::{DragController, DragSession};
pub use error::{DisplayError, DisplayResult};
pub use host::{HostOp, RecordingHost, Rgb, WindowHost};
pub use repaint::{LayoutChange, RepaintPlanner};
pub use scaling::{
    auto_scale_percent, percent_to_ratio, scale_to_percent_string, scaled_exceeds, ScaleLimits,
    ScaleMode,
};
pub use scroll::{Axis, ScrollAction, ScrollState, ScrollbarInfo};
pub use viewport::{ViewportConfig, ViewportTransform};
