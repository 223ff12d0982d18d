//! The viewer: a desktop view, an input router, a remote sink and a host
//! clipboard wired together.
//!
//! Window events come in through [`Viewer::handle_window_event`], engine
//! events through [`Viewer::handle_server_event`] or, when the engine runs on
//! another thread, [`Viewer::pump_events`].

use crate::clipboard::HostClipboard;
use crate::event::WindowEvent;
use crate::router::{InputOptions, InputRouter};
use flume::Receiver;
use rfb_client::{ClientError, Config, RemoteSink, ScaleSetting, ServerEvent};
use rfb_common::{Dimension, Point};
use rfb_display::{DesktopView, ScaleLimits, ScaleMode, ViewportConfig, WindowHost};
use rfb_pixelbuffer::SharedPixelStore;
use tracing::{debug, info, warn};

/// Build the view configuration from the viewer settings.
pub fn viewport_config(config: &Config) -> ViewportConfig {
    let display = &config.display;
    ViewportConfig {
        initial_scale: match display.scale {
            ScaleSetting::Auto => ScaleMode::Auto,
            ScaleSetting::Percent(p) => ScaleMode::Percent(p),
        },
        limits: ScaleLimits {
            min_percent: display.min_scale_percent,
            max_percent: display.max_scale_percent,
        },
        scrollbar_size: display.scrollbar_size,
        scroll_line_step: display.scroll_line_step,
        background: display.background,
    }
}

pub struct Viewer<S, C> {
    view: DesktopView,
    router: InputRouter,
    sink: S,
    clipboard: C,
}

impl<S: RemoteSink, C: HostClipboard> Viewer<S, C> {
    pub fn new(config: &Config, store: SharedPixelStore, sink: S, clipboard: C) -> Self {
        Self {
            view: DesktopView::new(viewport_config(config), store),
            router: InputRouter::new(InputOptions::from(config)),
            sink,
            clipboard,
        }
    }

    pub fn view(&self) -> &DesktopView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut DesktopView {
        &mut self.view
    }

    pub fn router(&self) -> &InputRouter {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut InputRouter {
        &mut self.router
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn clipboard_mut(&mut self) -> &mut C {
        &mut self.clipboard
    }

    pub fn handle_window_event<H: WindowHost + ?Sized>(&mut self, event: WindowEvent, host: &mut H) {
        self.router
            .dispatch(event, &mut self.view, &self.sink, &mut self.clipboard, host);
    }

    pub fn handle_server_event<H: WindowHost + ?Sized>(&mut self, event: ServerEvent, host: &mut H) {
        match event {
            ServerEvent::Connected {
                width,
                height,
                name,
            } => {
                info!("Connected to '{}' ({}x{})", name, width, height);
                let dimension = Dimension::new(u32::from(width), u32::from(height));
                if self.view.framebuffer_geometry() != dimension {
                    self.view.on_framebuffer_resized(dimension, host);
                }
                self.router.on_connection_changed();
                self.view.on_connected(host);
            }
            ServerEvent::FramebufferResized { width, height } => {
                let dimension = Dimension::new(u32::from(width), u32::from(height));
                self.view.on_framebuffer_resized(dimension, host);
            }
            ServerEvent::RegionUpdated { rect, pixels } => {
                if let Err(e) = self.view.on_region_updated(rect, &pixels, host) {
                    warn!("Dropping update for {}: {}", rect, e);
                }
            }
            ServerEvent::CutText { text } => {
                let text = String::from_utf8_lossy(&text);
                if let Err(e) = self.router.set_clipboard_data(&text, &mut self.clipboard) {
                    warn!("Failed to set clipboard: {}", e);
                }
            }
            ServerEvent::ConnectionClosed => {
                info!("Connection closed");
                self.router.on_connection_changed();
                self.view.on_disconnected(host);
            }
        }
    }

    /// Handle every event already queued by the engine. Returns how many
    /// were handled.
    pub fn pump_events<H: WindowHost + ?Sized>(&mut self, events: &Receiver<ServerEvent>, host: &mut H) -> usize {
        let mut handled = 0;
        while let Ok(event) = events.try_recv() {
            self.handle_server_event(event, host);
            handled += 1;
        }
        if handled > 0 {
            debug!("Handled {} engine events", handled);
        }
        handled
    }

    pub fn set_scale<H: WindowHost + ?Sized>(&mut self, mode: ScaleMode, host: &mut H) -> bool {
        self.view.set_scale(mode, host)
    }

    pub fn set_scale_centered_on_point<H: WindowHost + ?Sized>(
        &mut self,
        mode: ScaleMode,
        local: Point,
        host: &mut H,
    ) -> bool {
        self.view.set_scale_centered_on_point(mode, local, host)
    }

    /// Zoom keeping the pixel under the last known mouse position in place.
    pub fn set_scale_centered_on_cursor<H: WindowHost + ?Sized>(&mut self, mode: ScaleMode, host: &mut H) -> bool {
        let cursor = self.router.mouse().unclamped_position();
        self.view.set_scale_centered_on_point(mode, cursor, host)
    }

    pub fn send_key(&mut self, keysym: u32, down: bool) -> Result<(), ClientError> {
        self.router.send_key(keysym, down, &self.view, &self.sink)
    }

    pub fn send_ctrl_alt_del(&self) -> Result<(), ClientError> {
        self.router.send_ctrl_alt_del(&self.view, &self.sink)
    }

    pub fn set_win_key_ignore(&mut self, ignore: bool) {
        self.router.set_win_key_ignore(ignore);
    }
}
