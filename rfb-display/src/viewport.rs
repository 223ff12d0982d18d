//! Coordinate mapping between the local window and the remote framebuffer.
//!
//! The viewport has three coordinate spaces:
//!
//! - **local**: window client pixels, `(0, 0)` at the top-left of the viewport
//! - **scaled**: framebuffer pixels multiplied by the scale ratio
//! - **framebuffer**: remote screen pixels
//!
//! [`ViewportTransform`] holds the scale and the *origin*, the framebuffer
//! coordinate shown at the viewport's top-left corner. Every mapping goes
//! through [`ViewportTransform::local_to_framebuffer_f`] or its inverse
//! [`ViewportTransform::framebuffer_to_local_f`]:
//!
//! ```text
//! framebuffer = origin + local / scale
//! local       = (framebuffer - origin) * scale
//! ```
//!
//! When the scaled image is smaller than the viewport on an axis the origin is
//! negative on that axis, which centres the image and leaves letterbox bands.

use crate::host::Rgb;
use crate::scaling::{percent_to_ratio, scale_to_percent_string, scaled_exceeds, ScaleLimits, ScaleMode};
use rfb_common::{Dimension, FPoint, Point, Rect};
use std::fmt;
use tracing::{debug, trace, warn};

/// Configuration for viewport behavior
#[derive(Debug, Clone)]
pub struct ViewportConfig {
    /// Scale applied before the first explicit request
    pub initial_scale: ScaleMode,
    /// Bounds for explicit scale requests
    pub limits: ScaleLimits,
    /// Thickness of a scrollbar in local pixels
    pub scrollbar_size: u32,
    /// Framebuffer pixels moved by a scrollbar line step
    pub scroll_line_step: u32,
    /// Letterbox fill colour
    pub background: Rgb,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            initial_scale: ScaleMode::default(),
            limits: ScaleLimits::default(),
            scrollbar_size: 16,
            scroll_line_step: 16,
            background: [0, 0, 0],
        }
    }
}

/// Scale and scroll origin of the view.
#[derive(Debug, Clone)]
pub struct ViewportTransform {
    limits: ScaleLimits,
    mode: ScaleMode,
    scale_percent: u32,
    origin: FPoint,
    framebuffer: Dimension,
    viewport: Dimension,
}

impl ViewportTransform {
    /// Create a transform at 100%. Degenerate limits are normalized first.
    pub fn new(limits: ScaleLimits) -> Self {
        let normalized = limits.normalized();
        if normalized != limits {
            warn!(
                "Scale limits {}..={} adjusted to {}..={}",
                limits.min_percent, limits.max_percent, normalized.min_percent, normalized.max_percent
            );
        }
        Self {
            limits: normalized,
            mode: ScaleMode::Percent(100),
            scale_percent: 100,
            origin: FPoint::default(),
            framebuffer: Dimension::default(),
            viewport: Dimension::default(),
        }
    }

    /// Limits in effect, after normalization.
    pub fn limits(&self) -> ScaleLimits {
        self.limits
    }

    /// Requested scale mode (may be `Auto`).
    pub fn scale_mode(&self) -> ScaleMode {
        self.mode
    }

    /// Effective scale in whole percent.
    pub fn scale_percent(&self) -> u32 {
        self.scale_percent
    }

    /// Effective scale ratio (1.0 = 100%).
    pub fn scale(&self) -> f64 {
        percent_to_ratio(self.scale_percent)
    }

    pub fn origin(&self) -> FPoint {
        self.origin
    }

    pub fn framebuffer_size(&self) -> Dimension {
        self.framebuffer
    }

    /// Local area available to the image.
    pub fn viewport_size(&self) -> Dimension {
        self.viewport
    }

    pub fn set_framebuffer_size(&mut self, dimension: Dimension) {
        if self.framebuffer != dimension {
            debug!("Viewport framebuffer size changed to {}", dimension);
            self.framebuffer = dimension;
            self.set_origin(self.origin);
        }
    }

    /// Set the area available to the image and re-clamp the origin.
    pub fn set_viewport_size(&mut self, dimension: Dimension) {
        if self.viewport != dimension {
            debug!("Viewport size changed to {}", dimension);
        }
        self.viewport = dimension;
        self.set_origin(self.origin);
    }

    /// Apply a scale mode.
    ///
    /// `Auto` is resolved against `client_area`, the full client area with
    /// no scrollbars. Returns true when the effective scale changed. The
    /// origin is re-clamped only once the caller sets the new viewport size.
    pub fn set_scale(&mut self, mode: ScaleMode, client_area: Dimension) -> bool {
        let percent = self.limits.resolve(mode, self.framebuffer, client_area);
        self.mode = mode;
        if percent == self.scale_percent {
            return false;
        }
        debug!(
            "Scale changed from {}% to {}% ({})",
            self.scale_percent, percent, mode
        );
        self.scale_percent = percent;
        true
    }

    /// Apply a scale mode keeping the framebuffer point under `local` fixed.
    ///
    /// The anchor is computed unclamped so that zooming near or beyond the
    /// image edge does not shift the zoom centre.
    pub fn set_scale_centered_on_point(
        &mut self,
        mode: ScaleMode,
        local: Point,
        client_area: Dimension,
    ) -> bool {
        let local = FPoint::from(local);
        let anchor = self.local_to_framebuffer_f(local);
        let changed = self.set_scale(mode, client_area);
        let scale = self.scale();
        self.origin = FPoint::new(anchor.x - local.x / scale, anchor.y - local.y / scale);
        trace!(
            "Zoom anchored at fb ({:.1}, {:.1}), origin now ({:.1}, {:.1})",
            anchor.x,
            anchor.y,
            self.origin.x,
            self.origin.y
        );
        changed
    }

    /// True when the scaled image is wider than the viewport.
    pub fn scrolls_horizontally(&self) -> bool {
        scaled_exceeds(self.framebuffer.width, self.scale_percent, self.viewport.width)
    }

    /// True when the scaled image is taller than the viewport.
    pub fn scrolls_vertically(&self) -> bool {
        scaled_exceeds(self.framebuffer.height, self.scale_percent, self.viewport.height)
    }

    /// Largest origin on each axis, 0 for axes without a scroll range.
    pub fn max_origin(&self) -> FPoint {
        let scale = self.scale();
        let max_x = if self.scrolls_horizontally() {
            self.framebuffer.width as f64 - self.viewport.width as f64 / scale
        } else {
            0.0
        };
        let max_y = if self.scrolls_vertically() {
            self.framebuffer.height as f64 - self.viewport.height as f64 / scale
        } else {
            0.0
        };
        FPoint::new(max_x, max_y)
    }

    /// Move the view.
    ///
    /// Axes with a scroll range are clamped to `[0, fb - viewport / scale]`.
    /// Axes where the scaled image fits get the origin that centres it.
    pub fn set_origin(&mut self, origin: FPoint) {
        let max = self.max_origin();
        let x = if self.scrolls_horizontally() {
            origin.x.clamp(0.0, max.x)
        } else {
            self.centering_origin(self.framebuffer.width, self.viewport.width)
        };
        let y = if self.scrolls_vertically() {
            origin.y.clamp(0.0, max.y)
        } else {
            self.centering_origin(self.framebuffer.height, self.viewport.height)
        };
        let clamped = FPoint::new(x, y);
        if clamped != self.origin {
            trace!("Origin changed to ({:.1}, {:.1})", x, y);
        }
        self.origin = clamped;
    }

    /// Origin placing the image in the middle of the viewport, on whole
    /// local pixels.
    fn centering_origin(&self, length: u32, available: u32) -> f64 {
        let scale = self.scale();
        let slack = available as f64 - length as f64 * scale;
        let offset = (slack / 2.0).floor().max(0.0);
        -offset / scale
    }

    /// Exact local -> framebuffer mapping.
    pub fn local_to_framebuffer_f(&self, local: FPoint) -> FPoint {
        let scale = self.scale();
        FPoint::new(self.origin.x + local.x / scale, self.origin.y + local.y / scale)
    }

    /// Exact framebuffer -> local mapping.
    pub fn framebuffer_to_local_f(&self, fb: FPoint) -> FPoint {
        let scale = self.scale();
        FPoint::new((fb.x - self.origin.x) * scale, (fb.y - self.origin.y) * scale)
    }

    /// Map a local point to the framebuffer pixel under it.
    ///
    /// With `clamp` the result lies in `[0, dimension)`; without it the point
    /// may be negative or beyond the remote screen.
    pub fn local_to_framebuffer(&self, local: Point, clamp: bool) -> Point {
        let fb = self.local_to_framebuffer_f(local.into()).floor();
        if !clamp {
            return fb;
        }
        let max_x = self.framebuffer.width.saturating_sub(1) as i32;
        let max_y = self.framebuffer.height.saturating_sub(1) as i32;
        Point::new(fb.x.clamp(0, max_x), fb.y.clamp(0, max_y))
    }

    /// Map a framebuffer rectangle to the local rectangle covering it.
    ///
    /// Edges are rounded outwards. No clamping; intersect with the viewport
    /// as needed.
    pub fn framebuffer_to_local(&self, fb: Rect) -> Rect {
        let top_left = self.framebuffer_to_local_f(FPoint::new(fb.x as f64, fb.y as f64));
        let bottom_right =
            self.framebuffer_to_local_f(FPoint::new(fb.right() as f64, fb.bottom() as f64));
        Rect::from_edges(
            top_left.x.floor() as i32,
            top_left.y.floor() as i32,
            bottom_right.x.ceil() as i32,
            bottom_right.y.ceil() as i32,
        )
    }

    /// Map a local rectangle to the framebuffer rectangle feeding it,
    /// clamped to the remote screen.
    pub fn local_to_framebuffer_rect(&self, local: Rect) -> Option<Rect> {
        let top_left = self.local_to_framebuffer_f(FPoint::new(local.x as f64, local.y as f64));
        let bottom_right =
            self.local_to_framebuffer_f(FPoint::new(local.right() as f64, local.bottom() as f64));
        Rect::from_edges(
            top_left.x.floor() as i32,
            top_left.y.floor() as i32,
            bottom_right.x.ceil() as i32,
            bottom_right.y.ceil() as i32,
        )
        .intersection(&self.framebuffer.to_rect())
    }

    /// Local rectangle occupied by the whole scaled image.
    pub fn image_local_rect(&self) -> Rect {
        self.framebuffer_to_local(self.framebuffer.to_rect())
    }

    /// Framebuffer rectangle currently visible in the viewport.
    pub fn visible_framebuffer_rect(&self) -> Rect {
        self.local_to_framebuffer_rect(self.viewport.to_rect())
            .unwrap_or_default()
    }

    /// Image size after scaling (the viewer geometry).
    pub fn viewer_geometry(&self) -> Dimension {
        self.image_local_rect().dimension()
    }

    /// True when the image covers the whole viewport (no letterbox).
    pub fn fills_viewport(&self) -> bool {
        self.image_local_rect()
            .contains_rect(&self.viewport.to_rect())
    }
}

impl fmt::Display for ViewportTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Viewport(fb={}, view={}, scale={} ({}), origin={:.1},{:.1})",
            self.framebuffer,
            self.viewport,
            scale_to_percent_string(self.scale()),
            self.mode,
            self.origin.x,
            self.origin.y
        )
    }
}
