//! Core types for the keymap system: KeyCode and Action

use std::fmt;

use super::layer::Layer;

/// A key symbol the keyboard can report to the host
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyCode {
    /// A character key: letters (normalized to lowercase), digits and punctuation
    Char(char),

    // Named keys
    Enter,
    Escape,
    Tab,
    Backspace,
    Space,
    CapsLock,
    /// Locking caps lock (for hosts that expect a latching switch)
    LockingCapsLock,

    // Modifiers
    LeftShift,
    RightShift,

    // Media
    Mute,
    VolumeUp,
    VolumeDown,
}

impl KeyCode {
    /// Create a character key code (normalized to lowercase)
    pub const fn char(c: char) -> Self {
        KeyCode::Char(c.to_ascii_lowercase())
    }

    /// Check if this key is a modifier (reported in the modifier byte)
    #[inline]
    pub const fn is_modifier(self) -> bool {
        matches!(self, KeyCode::LeftShift | KeyCode::RightShift)
    }

    /// Bit in the boot-protocol modifier byte, if this is a modifier
    pub const fn modifier_bit(self) -> Option<u8> {
        match self {
            KeyCode::LeftShift => Some(0b0000_0010),
            KeyCode::RightShift => Some(0b0010_0000),
            _ => None,
        }
    }

    /// HID keyboard/keypad page usage id
    ///
    /// Returns None for characters with no key on a US layout.
    pub const fn hid_usage(self) -> Option<u8> {
        let usage = match self {
            KeyCode::Char(c) => match c {
                'a'..='z' => 0x04 + (c as u8 - b'a'),
                '1'..='9' => 0x1E + (c as u8 - b'1'),
                '0' => 0x27,
                '-' => 0x2D,
                '=' => 0x2E,
                '[' => 0x2F,
                ']' => 0x30,
                '\\' => 0x31,
                ';' => 0x33,
                '\'' => 0x34,
                '`' => 0x35,
                ',' => 0x36,
                '.' => 0x37,
                '/' => 0x38,
                _ => return None,
            },
            KeyCode::Enter => 0x28,
            KeyCode::Escape => 0x29,
            KeyCode::Backspace => 0x2A,
            KeyCode::Tab => 0x2B,
            KeyCode::Space => 0x2C,
            KeyCode::CapsLock => 0x39,
            KeyCode::Mute => 0x7F,
            KeyCode::VolumeUp => 0x80,
            KeyCode::VolumeDown => 0x81,
            KeyCode::LockingCapsLock => 0x82,
            KeyCode::LeftShift => 0xE1,
            KeyCode::RightShift => 0xE5,
        };
        Some(usage)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Char(c) => write!(f, "{}", c.to_uppercase()),
            KeyCode::Enter => write!(f, "Enter"),
            KeyCode::Escape => write!(f, "Escape"),
            KeyCode::Tab => write!(f, "Tab"),
            KeyCode::Backspace => write!(f, "Backspace"),
            KeyCode::Space => write!(f, "Space"),
            KeyCode::CapsLock => write!(f, "CapsLock"),
            KeyCode::LockingCapsLock => write!(f, "LockingCapsLock"),
            KeyCode::LeftShift => write!(f, "LeftShift"),
            KeyCode::RightShift => write!(f, "RightShift"),
            KeyCode::Mute => write!(f, "Mute"),
            KeyCode::VolumeUp => write!(f, "VolumeUp"),
            KeyCode::VolumeDown => write!(f, "VolumeDown"),
        }
    }
}

/// What a single layout cell does when its switch changes state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Defer to the next active layer below
    Transparent,
    /// Do nothing (blocks lower layers)
    No,
    /// Press/release a key
    Key(KeyCode),
    /// Turn a layer on while held
    Momentary(Layer),
    /// Switch to a layer, turning off every other one
    To(Layer),
    /// Reboot into the bootloader
    Bootloader,
}

impl Action {
    /// Check if this cell falls through to the layer below
    #[inline]
    pub const fn is_transparent(self) -> bool {
        matches!(self, Action::Transparent)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Transparent => write!(f, "_______"),
            Action::No => write!(f, "NO"),
            Action::Key(key) => write!(f, "{}", key),
            Action::Momentary(layer) => write!(f, "MO({})", layer),
            Action::To(layer) => write!(f, "TO({})", layer),
            Action::Bootloader => write!(f, "BOOT"),
        }
    }
}
