//! Single dispatch point for window events.
//!
//! [`InputRouter::dispatch`] takes one [`WindowEvent`] and drives the desktop
//! view, the remote sink and the host clipboard from it. Layout and paint
//! events go to the view; input goes to the remote side once the view is
//! connected. Send failures are logged at the call site and never undo local
//! state.

use crate::clipboard::{ClipboardError, ClipboardGuard, HostClipboard};
use crate::event::{MouseDisposition, MouseHook, WindowEvent};
use crate::keyboard::{char_to_keysym, is_win_key, ModifierState, CTRL_ALT_DEL};
use crate::mouse::{ButtonMask, MouseState};
use rfb_client::{ClientError, Config, RemoteSink};
use rfb_display::{DesktopView, WindowHost};
use tracing::{debug, info, trace, warn};

/// Input behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputOptions {
    pub win_key_ignore: bool,
    pub view_only: bool,
    pub wheel_speed: u32,
    pub clipboard_enabled: bool,
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            win_key_ignore: false,
            view_only: false,
            wheel_speed: 1,
            clipboard_enabled: true,
        }
    }
}

impl From<&Config> for InputOptions {
    fn from(config: &Config) -> Self {
        Self {
            win_key_ignore: config.input.win_key_ignore,
            view_only: config.input.view_only,
            wheel_speed: config.input.wheel_speed.max(1),
            clipboard_enabled: config.clipboard.enabled,
        }
    }
}

/// Routes window events to the view and the remote side.
pub struct InputRouter {
    options: InputOptions,
    mouse: MouseState,
    modifiers: ModifierState,
    clipboard_guard: ClipboardGuard,
    hook: Option<MouseHook>,
    attached: bool,
}

impl Default for InputRouter {
    fn default() -> Self {
        Self::new(InputOptions::default())
    }
}

impl InputRouter {
    pub fn new(options: InputOptions) -> Self {
        Self {
            options,
            mouse: MouseState::new(),
            modifiers: ModifierState::default(),
            clipboard_guard: ClipboardGuard::default(),
            hook: None,
            attached: true,
        }
    }

    pub fn options(&self) -> InputOptions {
        self.options
    }

    pub fn mouse(&self) -> &MouseState {
        &self.mouse
    }

    pub fn modifiers(&self) -> ModifierState {
        self.modifiers
    }

    /// False once the window has been destroyed.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Install a hook that sees every mouse event first.
    pub fn set_mouse_hook(&mut self, hook: MouseHook) {
        self.hook = Some(hook);
    }

    pub fn clear_mouse_hook(&mut self) {
        self.hook = None;
    }

    pub fn set_win_key_ignore(&mut self, ignore: bool) {
        debug!("Windows key ignore: {}", ignore);
        self.options.win_key_ignore = ignore;
    }

    pub fn set_view_only(&mut self, view_only: bool) {
        self.options.view_only = view_only;
    }

    /// Set the local Ctrl state without sending anything.
    pub fn set_ctrl_state(&mut self, down: bool) {
        self.modifiers.ctrl_down = down;
    }

    /// Set the local Alt state without sending anything.
    pub fn set_alt_state(&mut self, down: bool) {
        self.modifiers.alt_down = down;
    }

    fn can_forward(&self, view: &DesktopView) -> bool {
        self.attached && view.is_connected() && !self.options.view_only
    }

    /// Handle one window event.
    pub fn dispatch<S, C, H>(
        &mut self,
        event: WindowEvent,
        view: &mut DesktopView,
        sink: &S,
        clipboard: &mut C,
        host: &mut H,
    ) where
        S: RemoteSink + ?Sized,
        C: HostClipboard + ?Sized,
        H: WindowHost + ?Sized,
    {
        if !self.attached {
            trace!("Ignoring {:?} after destroy", event);
            return;
        }

        match event {
            WindowEvent::Resize(client_area) => view.on_resize(client_area, host),
            WindowEvent::Paint(dirty) => view.paint(dirty, host),
            WindowEvent::MouseMove(_)
            | WindowEvent::MouseButton { .. }
            | WindowEvent::MouseWheel { .. } => self.on_mouse(&event, view, sink, host),
            WindowEvent::Key { keysym, down } => {
                self.modifiers.update(keysym, down);
                if self.options.win_key_ignore && is_win_key(keysym) {
                    trace!("Ignoring Windows key {:#x}", keysym);
                    return;
                }
                self.forward_key(keysym, down, view, sink);
            }
            WindowEvent::Char(ch) => {
                if let Some(keysym) = char_to_keysym(ch) {
                    self.forward_key(keysym, true, view, sink);
                    self.forward_key(keysym, false, view, sink);
                }
            }
            WindowEvent::Scroll { axis, action } => {
                view.on_scroll(axis, action, host);
            }
            WindowEvent::ClipboardChanged => self.on_clipboard_changed(view, sink, clipboard),
            WindowEvent::Destroy => {
                info!("Window destroyed, detaching input router");
                view.stop_drag();
                self.attached = false;
            }
        }
    }

    /// The connection came up or went away. The next pointer event is sent
    /// even if it repeats the last one, so the new session learns the
    /// pointer state.
    pub fn on_connection_changed(&mut self) {
        self.mouse.reset_last_sent();
    }

    fn on_mouse<S, H>(&mut self, event: &WindowEvent, view: &mut DesktopView, sink: &S, host: &mut H)
    where
        S: RemoteSink + ?Sized,
        H: WindowHost + ?Sized,
    {
        if let WindowEvent::MouseMove(local) = event {
            self.mouse.set_position(*local, view.viewport_size());
        }
        let local = self.mouse.unclamped_position();

        if let Some(hook) = self.hook.as_mut() {
            match hook(event, local) {
                MouseDisposition::Forward => {}
                MouseDisposition::Consume => return,
                MouseDisposition::StartPan => {
                    view.start_drag(local);
                    return;
                }
                MouseDisposition::StopPan => {
                    view.stop_drag();
                    return;
                }
            }
        }

        if view.is_dragging() {
            if let WindowEvent::MouseMove(local) = event {
                view.drag_move(*local, host);
            }
            return;
        }

        match *event {
            WindowEvent::MouseMove(_) => self.forward_pointer(self.mouse.buttons, view, sink),
            WindowEvent::MouseButton { button, pressed } => {
                self.mouse.set_button(button, pressed);
                self.forward_pointer(self.mouse.buttons, view, sink);
            }
            WindowEvent::MouseWheel {
                horizontal,
                vertical,
            } => {
                for mask in self
                    .mouse
                    .wheel_masks(horizontal, vertical, self.options.wheel_speed)
                {
                    self.forward_pointer(mask, view, sink);
                }
            }
            _ => {}
        }
    }

    fn forward_pointer<S: RemoteSink + ?Sized>(&mut self, mask: ButtonMask, view: &DesktopView, sink: &S) {
        if !self.can_forward(view) {
            return;
        }
        let fb = view.local_to_framebuffer(self.mouse.position(), true);
        if !self.mouse.should_send(mask, fb) {
            return;
        }
        if let Err(e) = sink.send_pointer_event(mask.bits(), fb) {
            warn!("Failed to send pointer event: {}", e);
        }
    }

    fn forward_key<S: RemoteSink + ?Sized>(&self, keysym: u32, down: bool, view: &DesktopView, sink: &S) {
        if !self.can_forward(view) {
            return;
        }
        if let Err(e) = sink.send_key_event(keysym, down) {
            warn!("Failed to send key {:#x}: {}", keysym, e);
        }
    }

    fn on_clipboard_changed<S, C>(&mut self, view: &DesktopView, sink: &S, clipboard: &mut C)
    where
        S: RemoteSink + ?Sized,
        C: HostClipboard + ?Sized,
    {
        if !self.options.clipboard_enabled || !self.can_forward(view) {
            return;
        }
        let Some(text) = clipboard.get_text() else {
            return;
        };
        if !self.clipboard_guard.should_forward(&text) {
            return;
        }
        if let Err(e) = sink.send_clipboard_text(&text) {
            warn!("Failed to send clipboard text: {}", e);
        }
    }

    /// Send one key event, updating the local modifier state.
    ///
    /// Nothing is sent before the view is connected or in view-only mode.
    pub fn send_key<S: RemoteSink + ?Sized>(
        &mut self,
        keysym: u32,
        down: bool,
        view: &DesktopView,
        sink: &S,
    ) -> Result<(), ClientError> {
        self.modifiers.update(keysym, down);
        if !self.can_forward(view) {
            return Ok(());
        }
        sink.send_key_event(keysym, down)
    }

    /// Send Ctrl+Alt+Del. The local modifier state is left alone.
    ///
    /// Every event of the sequence is attempted; the first failure is
    /// returned.
    pub fn send_ctrl_alt_del<S: RemoteSink + ?Sized>(&self, view: &DesktopView, sink: &S) -> Result<(), ClientError> {
        if !self.can_forward(view) {
            return Ok(());
        }
        debug!("Sending Ctrl+Alt+Del");
        let mut result = Ok(());
        for (keysym, down) in CTRL_ALT_DEL {
            if let Err(e) = sink.send_key_event(keysym, down) {
                warn!("Failed to send key {:#x}: {}", keysym, e);
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }

    /// Put text received from the remote side on the host clipboard.
    ///
    /// The text is remembered so the resulting clipboard change is not sent
    /// back.
    pub fn set_clipboard_data<C: HostClipboard + ?Sized>(
        &mut self,
        text: &str,
        clipboard: &mut C,
    ) -> Result<(), ClipboardError> {
        if !self.options.clipboard_enabled {
            return Ok(());
        }
        self.clipboard_guard.remember_remote(text);
        clipboard.set_text(text)
    }
}
