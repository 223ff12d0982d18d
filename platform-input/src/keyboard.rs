//! Keysym helpers and local modifier tracking.
//!
//! The router consumes X11 keysyms; translating host key codes into keysyms
//! is the host adapter's job (see [`crate::winit_adapter`]).

use tracing::trace;

/// X11 keysym values
#[allow(non_upper_case_globals)]
pub mod keysyms {
    pub const XK_BackSpace: u32 = 0xff08;
    pub const XK_Tab: u32 = 0xff09;
    pub const XK_Return: u32 = 0xff0d;
    pub const XK_Escape: u32 = 0xff1b;
    pub const XK_Insert: u32 = 0xff63;
    pub const XK_Delete: u32 = 0xffff;
    pub const XK_Home: u32 = 0xff50;
    pub const XK_End: u32 = 0xff57;
    pub const XK_Page_Up: u32 = 0xff55;
    pub const XK_Page_Down: u32 = 0xff56;
    pub const XK_Left: u32 = 0xff51;
    pub const XK_Up: u32 = 0xff52;
    pub const XK_Right: u32 = 0xff53;
    pub const XK_Down: u32 = 0xff54;
    pub const XK_F1: u32 = 0xffbe;
    pub const XK_F2: u32 = 0xffbf;
    pub const XK_F3: u32 = 0xffc0;
    pub const XK_F4: u32 = 0xffc1;
    pub const XK_F5: u32 = 0xffc2;
    pub const XK_F6: u32 = 0xffc3;
    pub const XK_F7: u32 = 0xffc4;
    pub const XK_F8: u32 = 0xffc5;
    pub const XK_F9: u32 = 0xffc6;
    pub const XK_F10: u32 = 0xffc7;
    pub const XK_F11: u32 = 0xffc8;
    pub const XK_F12: u32 = 0xffc9;
    pub const XK_Shift_L: u32 = 0xffe1;
    pub const XK_Shift_R: u32 = 0xffe2;
    pub const XK_Control_L: u32 = 0xffe3;
    pub const XK_Control_R: u32 = 0xffe4;
    pub const XK_Caps_Lock: u32 = 0xffe5;
    pub const XK_Meta_L: u32 = 0xffe7;
    pub const XK_Meta_R: u32 = 0xffe8;
    pub const XK_Alt_L: u32 = 0xffe9;
    pub const XK_Alt_R: u32 = 0xffea;
    pub const XK_Super_L: u32 = 0xffeb; // Left Windows/Command key
    pub const XK_Super_R: u32 = 0xffec; // Right Windows/Command key
    pub const XK_Menu: u32 = 0xff67;
    pub const XK_Num_Lock: u32 = 0xff7f;
    pub const XK_Scroll_Lock: u32 = 0xff14;
    pub const XK_Print: u32 = 0xff61;
}
use keysyms::*;

/// Keysym for a typed character.
///
/// Latin-1 characters map to themselves; everything else uses the Unicode
/// keysym range (`0x0100_0000 | codepoint`). Control characters have no
/// keysym.
pub fn char_to_keysym(ch: char) -> Option<u32> {
    if ch.is_control() {
        return None;
    }
    let cp = ch as u32;
    if (0x20..=0x7e).contains(&cp) || (0xa0..=0xff).contains(&cp) {
        Some(cp)
    } else {
        Some(0x0100_0000 | cp)
    }
}

/// True for the Windows/Super keys.
pub fn is_win_key(keysym: u32) -> bool {
    matches!(keysym, XK_Super_L | XK_Super_R)
}

/// Presses and releases sent for Ctrl+Alt+Del, in order.
pub const CTRL_ALT_DEL: [(u32, bool); 6] = [
    (XK_Control_L, true),
    (XK_Alt_L, true),
    (XK_Delete, true),
    (XK_Delete, false),
    (XK_Alt_L, false),
    (XK_Control_L, false),
];

/// Local Ctrl/Alt state, tracked from key events regardless of whether they
/// reach the remote side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    pub ctrl_down: bool,
    pub alt_down: bool,
}

impl ModifierState {
    /// Update from a key event. Returns true if a tracked modifier changed.
    pub fn update(&mut self, keysym: u32, down: bool) -> bool {
        let slot = match keysym {
            XK_Control_L | XK_Control_R => &mut self.ctrl_down,
            XK_Alt_L | XK_Alt_R => &mut self.alt_down,
            _ => return false,
        };
        let changed = *slot != down;
        *slot = down;
        if changed {
            trace!("Modifiers now ctrl={} alt={}", self.ctrl_down, self.alt_down);
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_keysyms() {
        assert_eq!(char_to_keysym('a'), Some(0x61));
        assert_eq!(char_to_keysym('é'), Some(0xe9));
        assert_eq!(char_to_keysym('€'), Some(0x0100_20ac));
        assert_eq!(char_to_keysym('\r'), None);
    }

    #[test]
    fn test_modifier_tracking() {
        let mut mods = ModifierState::default();
        assert!(mods.update(XK_Control_R, true));
        assert!(!mods.update(XK_Control_L, true));
        assert!(mods.update(XK_Alt_L, true));
        assert!(!mods.update('x' as u32, true));
        assert_eq!(
            mods,
            ModifierState {
                ctrl_down: true,
                alt_down: true
            }
        );
        mods.update(XK_Control_L, false);
        assert!(!mods.ctrl_down);
    }

    #[test]
    fn test_win_keys() {
        assert!(is_win_key(XK_Super_L));
        assert!(is_win_key(XK_Super_R));
        assert!(!is_win_key(XK_Alt_L));
    }
}
