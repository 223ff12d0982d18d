//! Repaint planning and paint execution.
//!
//! Two things make part of the window stale: a remote update landing in the
//! pixel store, and a local layout change (resize, scale, scroll). The first
//! invalidates only the local pixels covering the updated rectangle; the
//! second invalidates the whole client area.
//!
//! Painting a dirty rectangle copies the covered framebuffer region out of the
//! store and hands it to the host for a stretched blit. Whatever part of the
//! rectangle the image does not cover is letterbox and gets the background
//! colour.

use crate::host::{Rgb, WindowHost};
use crate::viewport::ViewportTransform;
use rfb_common::{Dimension, Rect};
use rfb_pixelbuffer::PixelStore;
use std::fmt;
use tracing::trace;

/// Why the layout changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutChange {
    Resize,
    Scale,
    Scroll,
    FramebufferResized,
}

impl fmt::Display for LayoutChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Resize => "resize",
            Self::Scale => "scale",
            Self::Scroll => "scroll",
            Self::FramebufferResized => "framebuffer resize",
        };
        f.write_str(name)
    }
}

/// Decides which local rectangles to invalidate and paints them.
#[derive(Debug, Clone)]
pub struct RepaintPlanner {
    background: Rgb,
    background_dirty: bool,
}

impl RepaintPlanner {
    pub fn new(background: Rgb) -> Self {
        Self {
            background,
            background_dirty: true,
        }
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    /// True while letterbox areas still need a background fill.
    pub fn background_dirty(&self) -> bool {
        self.background_dirty
    }

    /// Local rectangle to invalidate after `fb_rect` was updated, or `None`
    /// when the update is not visible.
    pub fn plan_from_update(&self, fb_rect: Rect, transform: &ViewportTransform) -> Option<Rect> {
        let viewport = transform.viewport_size().to_rect();
        transform.framebuffer_to_local(fb_rect).intersection(&viewport)
    }

    /// Local rectangle to invalidate after a layout change.
    pub fn plan_from_layout_change(
        &mut self,
        reason: LayoutChange,
        transform: &ViewportTransform,
        client_area: Dimension,
    ) -> Rect {
        self.background_dirty = !transform.fills_viewport();
        trace!(
            "Layout change ({}): repaint {}, background dirty: {}",
            reason,
            client_area,
            self.background_dirty
        );
        client_area.to_rect()
    }

    /// Paint `dirty` (local pixels) onto `host`.
    ///
    /// Before the connection is up nothing is read from the store and the
    /// whole rectangle is background. While the background is dirty the
    /// entire letterbox is filled once, whatever `dirty` covers; afterwards
    /// only the letterbox inside `dirty` is refilled.
    pub fn paint<H: WindowHost + ?Sized>(
        &mut self,
        dirty: Rect,
        transform: &ViewportTransform,
        store: &PixelStore,
        connected: bool,
        host: &mut H,
    ) {
        let viewport = transform.viewport_size().to_rect();
        let Some(area) = dirty.intersection(&viewport) else {
            return;
        };

        if !connected {
            host.fill(area, self.background);
            if area.contains_rect(&viewport) {
                self.background_dirty = false;
            }
            return;
        }

        let image = transform.image_local_rect();
        if self.background_dirty {
            let letterbox = match image.intersection(&viewport) {
                Some(visible) => viewport.subtract(&visible),
                None => vec![viewport],
            };
            trace!("Background dirty, filling {} letterbox bands", letterbox.len());
            for band in letterbox {
                host.fill(band, self.background);
            }
            self.background_dirty = false;
        } else {
            for band in area.subtract(&image) {
                host.fill(band, self.background);
            }
        }

        if let Some(fb_rect) = transform.local_to_framebuffer_rect(area) {
            // The store lock is released once the snapshot is taken.
            let snapshot = store.read_region(fb_rect);
            if !snapshot.is_empty() {
                let dst = transform.framebuffer_to_local(snapshot.rect());
                if let Some(clip) = dst.intersection(&area) {
                    trace!("Blit fb {} -> local {} (clip {})", snapshot.rect(), dst, clip);
                    host.blit(dst, clip, &snapshot);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostOp, RecordingHost};
    use crate::scaling::{ScaleLimits, ScaleMode};
    use rfb_common::FPoint;
    use rfb_pixelbuffer::PixelFormat;

    fn transform(fb: Dimension, view: Dimension, percent: u32) -> ViewportTransform {
        let mut t = ViewportTransform::new(ScaleLimits::default());
        t.set_framebuffer_size(fb);
        t.set_scale(ScaleMode::Percent(percent), view);
        t.set_viewport_size(view);
        t
    }

    #[test]
    fn test_update_maps_to_local_rect() {
        let planner = RepaintPlanner::new([0, 0, 0]);
        let mut t = transform(Dimension::new(1000, 1000), Dimension::new(200, 200), 200);
        t.set_origin(FPoint::new(100.0, 100.0));

        assert_eq!(
            planner.plan_from_update(Rect::new(110, 120, 10, 10), &t),
            Some(Rect::new(20, 40, 20, 20))
        );
        // Partially visible updates are clipped to the viewport
        assert_eq!(
            planner.plan_from_update(Rect::new(90, 90, 20, 20), &t),
            Some(Rect::new(0, 0, 20, 20))
        );
    }

    #[test]
    fn test_offscreen_update_is_dropped() {
        let planner = RepaintPlanner::new([0, 0, 0]);
        let t = transform(Dimension::new(1000, 1000), Dimension::new(200, 200), 100);
        assert_eq!(planner.plan_from_update(Rect::new(500, 500, 10, 10), &t), None);
    }

    #[test]
    fn test_layout_change_flags_letterbox() {
        let mut planner = RepaintPlanner::new([0, 0, 0]);
        let small = transform(Dimension::new(100, 100), Dimension::new(400, 300), 100);
        let rect = planner.plan_from_layout_change(LayoutChange::Resize, &small, Dimension::new(400, 300));
        assert_eq!(rect, Rect::new(0, 0, 400, 300));
        assert!(planner.background_dirty());

        let large = transform(Dimension::new(1000, 1000), Dimension::new(400, 300), 100);
        planner.plan_from_layout_change(LayoutChange::Scale, &large, Dimension::new(400, 300));
        assert!(!planner.background_dirty());
    }

    #[test]
    fn test_paint_blits_image_and_fills_letterbox() {
        let view = Dimension::new(400, 300);
        let t = transform(Dimension::new(100, 100), view, 100);
        let store = PixelStore::with_dimension(PixelFormat::rgb888(), Dimension::new(100, 100));
        let mut planner = RepaintPlanner::new([1, 2, 3]);
        let mut host = RecordingHost::new(view);

        planner.paint(view.to_rect(), &t, &store, true, &mut host);

        let image = Rect::new(150, 100, 100, 100);
        assert_eq!(host.blits(), vec![(image, image, Rect::new(0, 0, 100, 100))]);
        let fills = host.fills();
        assert_eq!(fills.len(), 4);
        let filled: u64 = fills.iter().map(Rect::area).sum();
        assert_eq!(filled + image.area(), view.to_rect().area());
        assert!(host
            .ops()
            .iter()
            .all(|op| !matches!(op, HostOp::Fill(_, colour) if *colour != [1, 2, 3])));
        assert!(!planner.background_dirty());
    }

    #[test]
    fn test_dirty_background_is_filled_on_partial_paint() {
        let view = Dimension::new(400, 300);
        let t = transform(Dimension::new(100, 100), view, 100);
        let store = PixelStore::with_dimension(PixelFormat::rgb888(), Dimension::new(100, 100));
        let mut planner = RepaintPlanner::new([0, 0, 0]);
        let mut host = RecordingHost::new(view);

        // Inside the image: the pending letterbox is still painted.
        planner.paint(Rect::new(160, 110, 10, 10), &t, &store, true, &mut host);
        let filled: u64 = host.fills().iter().map(Rect::area).sum();
        assert_eq!(filled, view.to_rect().area() - 100 * 100);
        assert!(!planner.background_dirty());

        // Clean background: only the letterbox inside the dirty rect.
        host.take_ops();
        planner.paint(Rect::new(160, 110, 10, 10), &t, &store, true, &mut host);
        assert!(host.fills().is_empty());
        planner.paint(Rect::new(0, 0, 20, 20), &t, &store, true, &mut host);
        assert_eq!(host.fills(), vec![Rect::new(0, 0, 20, 20)]);
    }

    #[test]
    fn test_paint_before_connect_is_background_only() {
        let view = Dimension::new(200, 200);
        let t = transform(Dimension::new(400, 400), view, 100);
        let store = PixelStore::with_dimension(PixelFormat::rgb888(), Dimension::new(400, 400));
        let mut planner = RepaintPlanner::new([0, 0, 0]);
        let mut host = RecordingHost::new(view);

        planner.paint(Rect::new(10, 10, 50, 50), &t, &store, false, &mut host);
        assert!(host.blits().is_empty());
        assert_eq!(host.fills(), vec![Rect::new(10, 10, 50, 50)]);
    }

    #[test]
    fn test_paint_partial_dirty_rect_at_scale() {
        let view = Dimension::new(200, 200);
        let mut t = transform(Dimension::new(400, 400), view, 200);
        t.set_origin(FPoint::new(50.0, 50.0));
        let store = PixelStore::with_dimension(PixelFormat::rgb888(), Dimension::new(400, 400));
        let mut planner = RepaintPlanner::new([0, 0, 0]);
        let mut host = RecordingHost::new(view);

        planner.paint(Rect::new(20, 20, 40, 40), &t, &store, true, &mut host);
        assert_eq!(
            host.blits(),
            vec![(
                Rect::new(20, 20, 40, 40),
                Rect::new(20, 20, 40, 40),
                Rect::new(60, 60, 20, 20)
            )]
        );
        assert!(host.fills().is_empty());
    }
}
