//! Translation of winit window events into [`WindowEvent`]s.
//!
//! winit reports a typed letter twice: once as `KeyboardInput` and once as
//! `ReceivedCharacter`. Printable keys are taken from the character event so
//! layouts and dead keys work; the key event is used for everything else and
//! for printable keys chorded with Ctrl, Alt or the logo key.

use crate::event::{MouseButton, WindowEvent};
use crate::keyboard::keysyms::*;
use rfb_common::{Dimension, Point};
use tracing::trace;
use winit::event::{
    ElementState, KeyboardInput, ModifiersState, MouseScrollDelta, VirtualKeyCode,
    WindowEvent as WinitEvent,
};

/// Stateful winit translator; tracks modifiers to pick between key and
/// character events.
#[derive(Debug, Default)]
pub struct WinitTranslator {
    modifiers: ModifiersState,
}

impl WinitTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    fn chorded(&self) -> bool {
        self.modifiers.ctrl() || self.modifiers.alt() || self.modifiers.logo()
    }

    /// Translate one winit event, `None` if it has no counterpart.
    pub fn translate(&mut self, event: &WinitEvent<'_>) -> Option<WindowEvent> {
        match event {
            WinitEvent::Resized(size) => Some(WindowEvent::Resize(Dimension::new(size.width, size.height))),
            WinitEvent::CursorMoved { position, .. } => Some(WindowEvent::MouseMove(Point::new(
                position.x.floor() as i32,
                position.y.floor() as i32,
            ))),
            WinitEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    winit::event::MouseButton::Left => MouseButton::Left,
                    winit::event::MouseButton::Middle => MouseButton::Middle,
                    winit::event::MouseButton::Right => MouseButton::Right,
                    winit::event::MouseButton::Other(_) => return None,
                };
                Some(WindowEvent::MouseButton {
                    button,
                    pressed: *state == ElementState::Pressed,
                })
            }
            WinitEvent::MouseWheel { delta, .. } => {
                let (horizontal, vertical) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (notches(f64::from(*x)), notches(f64::from(*y))),
                    MouseScrollDelta::PixelDelta(pos) => (direction(pos.x), direction(pos.y)),
                };
                if horizontal == 0 && vertical == 0 {
                    return None;
                }
                Some(WindowEvent::MouseWheel {
                    horizontal,
                    vertical,
                })
            }
            WinitEvent::ModifiersChanged(modifiers) => {
                self.modifiers = *modifiers;
                None
            }
            WinitEvent::KeyboardInput { input, .. } => self.translate_key(input),
            WinitEvent::ReceivedCharacter(ch) => {
                if self.chorded() || ch.is_control() {
                    return None;
                }
                Some(WindowEvent::Char(*ch))
            }
            WinitEvent::Destroyed => Some(WindowEvent::Destroy),
            _ => None,
        }
    }

    fn translate_key(&self, input: &KeyboardInput) -> Option<WindowEvent> {
        let keysym = map_virtual_keycode_to_keysym(input.virtual_keycode?)?;
        let printable = (0x20..0x7f).contains(&keysym);
        if printable && !self.chorded() {
            trace!("Leaving {:#x} to the character event", keysym);
            return None;
        }
        Some(WindowEvent::Key {
            keysym,
            down: input.state == ElementState::Pressed,
        })
    }
}

/// Whole wheel notches from a line delta; any movement counts as at least one.
fn notches(delta: f64) -> i32 {
    if delta == 0.0 {
        return 0;
    }
    let rounded = delta.round() as i32;
    if rounded == 0 {
        delta.signum() as i32
    } else {
        rounded
    }
}

/// One notch per pixel-delta event, in the direction of travel.
fn direction(delta: f64) -> i32 {
    if delta > 0.0 {
        1
    } else if delta < 0.0 {
        -1
    } else {
        0
    }
}

/// Map a winit VirtualKeyCode to X11 keysym.
pub fn map_virtual_keycode_to_keysym(vk: VirtualKeyCode) -> Option<u32> {
    use VirtualKeyCode as VK;
    let keysym = match vk {
        VK::A => 'a',
        VK::B => 'b',
        VK::C => 'c',
        VK::D => 'd',
        VK::E => 'e',
        VK::F => 'f',
        VK::G => 'g',
        VK::H => 'h',
        VK::I => 'i',
        VK::J => 'j',
        VK::K => 'k',
        VK::L => 'l',
        VK::M => 'm',
        VK::N => 'n',
        VK::O => 'o',
        VK::P => 'p',
        VK::Q => 'q',
        VK::R => 'r',
        VK::S => 's',
        VK::T => 't',
        VK::U => 'u',
        VK::V => 'v',
        VK::W => 'w',
        VK::X => 'x',
        VK::Y => 'y',
        VK::Z => 'z',
        VK::Key0 => '0',
        VK::Key1 => '1',
        VK::Key2 => '2',
        VK::Key3 => '3',
        VK::Key4 => '4',
        VK::Key5 => '5',
        VK::Key6 => '6',
        VK::Key7 => '7',
        VK::Key8 => '8',
        VK::Key9 => '9',
        VK::Space => ' ',
        VK::Minus => '-',
        VK::Equals => '=',
        VK::Grave => '`',
        VK::LBracket => '[',
        VK::RBracket => ']',
        VK::Backslash => '\\',
        VK::Semicolon => ';',
        VK::Apostrophe => '\'',
        VK::Comma => ',',
        VK::Period => '.',
        VK::Slash => '/',
        _ => return special_keysym(vk),
    };
    Some(keysym as u32)
}

fn special_keysym(vk: VirtualKeyCode) -> Option<u32> {
    use VirtualKeyCode as VK;
    let keysym = match vk {
        VK::Return => XK_Return,
        VK::Escape => XK_Escape,
        VK::Back => XK_BackSpace,
        VK::Tab => XK_Tab,
        VK::Delete => XK_Delete,
        VK::Insert => XK_Insert,
        VK::Home => XK_Home,
        VK::End => XK_End,
        VK::PageUp => XK_Page_Up,
        VK::PageDown => XK_Page_Down,
        VK::Left => XK_Left,
        VK::Up => XK_Up,
        VK::Right => XK_Right,
        VK::Down => XK_Down,
        VK::F1 => XK_F1,
        VK::F2 => XK_F2,
        VK::F3 => XK_F3,
        VK::F4 => XK_F4,
        VK::F5 => XK_F5,
        VK::F6 => XK_F6,
        VK::F7 => XK_F7,
        VK::F8 => XK_F8,
        VK::F9 => XK_F9,
        VK::F10 => XK_F10,
        VK::F11 => XK_F11,
        VK::F12 => XK_F12,
        VK::LShift => XK_Shift_L,
        VK::RShift => XK_Shift_R,
        VK::LControl => XK_Control_L,
        VK::RControl => XK_Control_R,
        VK::LAlt => XK_Alt_L,
        VK::RAlt => XK_Alt_R,
        VK::LWin => XK_Super_L,
        VK::RWin => XK_Super_R,
        VK::Capital => XK_Caps_Lock,
        VK::Numlock => XK_Num_Lock,
        VK::Scroll => XK_Scroll_Lock,
        VK::Snapshot => XK_Print,
        VK::Apps => XK_Menu,
        _ => return None,
    };
    Some(keysym)
}
