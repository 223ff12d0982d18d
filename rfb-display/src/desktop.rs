//! The desktop view: viewport, scrollbars, panning and painting in one place.
//!
//! [`DesktopView`] is owned by the UI thread. The only state it shares with
//! the decode producer is the [`SharedPixelStore`]; everything else is plain
//! owned data, so no method here takes a lock other than the store's.

use crate::drag::DragController;
use crate::error::DisplayResult;
use crate::host::WindowHost;
use crate::repaint::{LayoutChange, RepaintPlanner};
use crate::scaling::ScaleMode;
use crate::scroll::{Axis, ScrollAction, ScrollState};
use crate::viewport::{ViewportConfig, ViewportTransform};
use rfb_common::{Dimension, FPoint, Point, Rect};
use rfb_pixelbuffer::SharedPixelStore;
use tracing::{debug, info};

pub struct DesktopView {
    config: ViewportConfig,
    store: SharedPixelStore,
    transform: ViewportTransform,
    scroll: ScrollState,
    drag: DragController,
    planner: RepaintPlanner,
    client_area: Dimension,
    connected: bool,
}

impl DesktopView {
    pub fn new(config: ViewportConfig, store: SharedPixelStore) -> Self {
        let mut transform = ViewportTransform::new(config.limits);
        transform.set_framebuffer_size(store.dimension());
        transform.set_scale(config.initial_scale, Dimension::default());

        Self {
            scroll: ScrollState::new(config.scrollbar_size, config.scroll_line_step),
            planner: RepaintPlanner::new(config.background),
            drag: DragController::new(),
            client_area: Dimension::default(),
            connected: false,
            transform,
            store,
            config,
        }
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Pixel store shared with the decode producer.
    pub fn store(&self) -> &SharedPixelStore {
        &self.store
    }

    pub fn transform(&self) -> &ViewportTransform {
        &self.transform
    }

    pub fn scroll_state(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn background_dirty(&self) -> bool {
        self.planner.background_dirty()
    }

    pub fn client_area(&self) -> Dimension {
        self.client_area
    }

    pub fn scale_mode(&self) -> ScaleMode {
        self.transform.scale_mode()
    }

    pub fn scale_percent(&self) -> u32 {
        self.transform.scale_percent()
    }

    pub fn origin(&self) -> FPoint {
        self.transform.origin()
    }

    /// Size of the scaled image in local pixels.
    pub fn viewer_geometry(&self) -> Dimension {
        self.transform.viewer_geometry()
    }

    /// Size of the remote screen.
    pub fn framebuffer_geometry(&self) -> Dimension {
        self.transform.framebuffer_size()
    }

    /// Client area minus visible scrollbars.
    pub fn viewport_size(&self) -> Dimension {
        self.transform.viewport_size()
    }

    pub fn local_to_framebuffer(&self, local: Point, clamp: bool) -> Point {
        self.transform.local_to_framebuffer(local, clamp)
    }

    /// The connection is up: from now on paints show the remote image.
    ///
    /// The client area is taken from the host, so a window whose resize was
    /// never reported is laid out correctly before the first paint.
    pub fn on_connected<H: WindowHost + ?Sized>(&mut self, host: &mut H) {
        info!("Desktop view connected ({})", self.transform.framebuffer_size());
        let client_area = host.client_area();
        if client_area != self.client_area {
            debug!("Client area {} reported by host, was {}", client_area, self.client_area);
            self.on_resize(client_area, host);
        }
        self.connected = true;
        host.invalidate(self.client_area.to_rect());
    }

    /// The connection went away. The last image stays in the store but is
    /// no longer shown.
    pub fn on_disconnected<H: WindowHost + ?Sized>(&mut self, host: &mut H) {
        if !self.connected {
            return;
        }
        info!("Desktop view disconnected");
        self.connected = false;
        self.drag.stop();
        host.invalidate(self.client_area.to_rect());
    }

    /// The remote screen changed size.
    ///
    /// The store is resized unless the producer already did it, then the
    /// layout is recomputed from scratch.
    pub fn on_framebuffer_resized<H: WindowHost + ?Sized>(&mut self, dimension: Dimension, host: &mut H) {
        info!("Remote framebuffer resized to {}", dimension);
        if self.store.dimension() != dimension {
            self.store.resize(dimension);
        }
        self.transform.set_framebuffer_size(dimension);
        if self.transform.scale_mode() == ScaleMode::Auto {
            self.transform.set_scale(ScaleMode::Auto, self.client_area);
        }
        self.relayout(LayoutChange::FramebufferResized, host);
    }

    /// Store decoded pixels for `rect` and invalidate what is visible of it.
    ///
    /// On error the store is unchanged and nothing is invalidated.
    pub fn on_region_updated<H: WindowHost + ?Sized>(
        &mut self,
        rect: Rect,
        pixels: &[u8],
        host: &mut H,
    ) -> DisplayResult<()> {
        self.store.write(rect, pixels, 0)?;
        self.invalidate_framebuffer_rect(rect, host);
        Ok(())
    }

    /// Invalidate the local pixels showing `fb_rect`. Returns false when the
    /// rectangle is off screen.
    ///
    /// Used directly when the producer writes into the store itself.
    pub fn invalidate_framebuffer_rect<H: WindowHost + ?Sized>(&self, fb_rect: Rect, host: &mut H) -> bool {
        match self.planner.plan_from_update(fb_rect, &self.transform) {
            Some(local) => {
                host.invalidate(local);
                true
            }
            None => false,
        }
    }

    /// The window client area changed.
    pub fn on_resize<H: WindowHost + ?Sized>(&mut self, client_area: Dimension, host: &mut H) {
        self.client_area = client_area;
        if self.transform.scale_mode() == ScaleMode::Auto {
            self.transform.set_scale(ScaleMode::Auto, client_area);
        }
        self.relayout(LayoutChange::Resize, host);
    }

    /// Change the scale, keeping the origin. Returns true when the effective
    /// scale changed.
    pub fn set_scale<H: WindowHost + ?Sized>(&mut self, mode: ScaleMode, host: &mut H) -> bool {
        let changed = self.transform.set_scale(mode, self.client_area);
        self.relayout(LayoutChange::Scale, host);
        changed
    }

    /// Change the scale keeping the framebuffer point under `local` in place.
    pub fn set_scale_centered_on_point<H: WindowHost + ?Sized>(
        &mut self,
        mode: ScaleMode,
        local: Point,
        host: &mut H,
    ) -> bool {
        let changed = self
            .transform
            .set_scale_centered_on_point(mode, local, self.client_area);
        self.relayout(LayoutChange::Scale, host);
        changed
    }

    /// Move the view. Returns true when the origin actually moved.
    pub fn set_origin<H: WindowHost + ?Sized>(&mut self, origin: FPoint, host: &mut H) -> bool {
        let before = self.transform.origin();
        self.transform.set_origin(origin);
        if self.transform.origin() == before {
            return false;
        }
        self.update_scrollbars(host);
        let dirty = self
            .planner
            .plan_from_layout_change(LayoutChange::Scroll, &self.transform, self.client_area);
        host.invalidate(dirty);
        true
    }

    /// Apply a scrollbar action from the host.
    pub fn on_scroll<H: WindowHost + ?Sized>(&mut self, axis: Axis, action: ScrollAction, host: &mut H) -> bool {
        let position = self.scroll.position_after(axis, action, &self.transform);
        let current = self.transform.origin();
        let origin = match axis {
            Axis::Horizontal => FPoint::new(position, current.y),
            Axis::Vertical => FPoint::new(current.x, position),
        };
        self.set_origin(origin, host)
    }

    /// Begin panning with the mouse at `local`.
    pub fn start_drag(&mut self, local: Point) -> bool {
        self.drag.start(local, self.transform.origin())
    }

    /// Pan to follow the mouse. Returns false when no drag is active.
    pub fn drag_move<H: WindowHost + ?Sized>(&mut self, local: Point, host: &mut H) -> bool {
        match self.drag.move_to(local, self.transform.scale()) {
            Some(origin) => {
                self.set_origin(origin, host);
                true
            }
            None => false,
        }
    }

    pub fn stop_drag(&mut self) -> bool {
        self.drag.stop()
    }

    /// Paint the dirty local rectangle.
    pub fn paint<H: WindowHost + ?Sized>(&mut self, dirty: Rect, host: &mut H) {
        self.planner
            .paint(dirty, &self.transform, &self.store, self.connected, host);
    }

    fn update_scrollbars<H: WindowHost + ?Sized>(&self, host: &mut H) {
        for axis in [Axis::Horizontal, Axis::Vertical] {
            host.set_scrollbar(axis, self.scroll.info(axis, &self.transform));
        }
    }

    fn relayout<H: WindowHost + ?Sized>(&mut self, reason: LayoutChange, host: &mut H) {
        let viewport = self.scroll.recompute(
            self.transform.framebuffer_size(),
            self.transform.scale_percent(),
            self.client_area,
        );
        self.transform.set_viewport_size(viewport);
        self.update_scrollbars(host);
        debug!("Relayout after {}: {}", reason, self.transform);

        let dirty = self
            .planner
            .plan_from_layout_change(reason, &self.transform, self.client_area);
        host.invalidate(dirty);
    }
}
