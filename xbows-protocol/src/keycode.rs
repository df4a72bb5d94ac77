//! Logical key identifiers and their lighting bitmap positions
//!
//! Every key gets a packed bitmap code: the low nibble is the bit within a
//! byte, everything above it is the byte index into the 22-byte frame bitmap.
//! Keys the X-Bows layout cannot light carry [`UNASSIGNED`].

use std::fmt;
use std::str::FromStr;

use crate::error::ProtocolError;
use crate::protocol::BITMAP_SIZE;

/// Bitmap code for keys with no LED position
pub const UNASSIGNED: u8 = 0xFF;

/// Logical keys known to the custom layer programmer.
///
/// Discriminants index [`TABLE`]; keep both in the same order.
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Keycode {
    None,
    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    // Numbers
    Num1, Num2, Num3, Num4, Num5, Num6, Num7, Num8, Num9, Num0,
    // Other printing keys
    Minus, Equal, LeftBracket, RightBracket, Backslash,
    Semicolon, Quote, Comma,
    Period, Slash, Grave,
    // Non-printing keys
    Escape, Tab, CapsLock,
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    RightEnter, MiddleEnter,
    LeftShift, MiddleShift, RightShift,
    LeftControl, MiddleControl, RightControl,
    LeftAlt, RightAlt,
    MiddleBackspace, RightBackspace,
    LeftSpace, RightSpace,
    Windows,
    PageUp, PageDown,
    Left, Right, Up, Down,
    PrintScreen, Delete,
    XBows,
    // Numpad
    NumLock, NumpadSlash, NumpadStar, NumpadEnter,
    Numpad1, Numpad2, Numpad3, Numpad4, Numpad5,
    Numpad6, Numpad7, Numpad8, Numpad9, Numpad0,
    NumpadPeriod, NumpadMinus, NumpadPlus,
    // Media
    Play, Pause, Stop, PreviousTrack, NextTrack, VolumeUp, VolumeDown, Mute,
    // Mouse
    LeftClick, MiddleClick, RightClick, MouseBack, MouseForward,
    // System / browser
    NetBack, NetForward, NetRefresh, NetFavorites, NetHome,
    Email, Computer, Calculator, Copy, Paste, NetPrintScreen,
    // Not present on the X-Bows board
    Home, End, Insert,
    Fn,
}

/// `(key, display name, bitmap code)` in discriminant order.
#[rustfmt::skip]
const TABLE: &[(Keycode, &str, u8)] = &[
    (Keycode::None, "None", UNASSIGNED),
    (Keycode::A, "A", 0x83), (Keycode::B, "B", 0xB6), (Keycode::C, "C", 0xB4),
    (Keycode::D, "D", 0x86), (Keycode::E, "E", 0x60), (Keycode::F, "F", 0x87),
    (Keycode::G, "G", 0x90), (Keycode::H, "H", 0x92), (Keycode::I, "I", 0x66),
    (Keycode::J, "J", 0x93), (Keycode::K, "K", 0x94), (Keycode::L, "L", 0x96),
    (Keycode::M, "M", 0xC1), (Keycode::N, "N", 0xC0), (Keycode::O, "O", 0x70),
    (Keycode::P, "P", 0x71), (Keycode::Q, "Q", 0x55), (Keycode::R, "R", 0x61),
    (Keycode::S, "S", 0x84), (Keycode::T, "T", 0x62), (Keycode::U, "U", 0x65),
    (Keycode::V, "V", 0xB5), (Keycode::W, "W", 0x56), (Keycode::X, "X", 0xB2),
    (Keycode::Y, "Y", 0x64), (Keycode::Z, "Z", 0xB1),
    (Keycode::Num1, "1", 0x27), (Keycode::Num2, "2", 0x30), (Keycode::Num3, "3", 0x32),
    (Keycode::Num4, "4", 0x33), (Keycode::Num5, "5", 0x34), (Keycode::Num6, "6", 0x36),
    (Keycode::Num7, "7", 0x37), (Keycode::Num8, "8", 0x40), (Keycode::Num9, "9", 0x42),
    (Keycode::Num0, "0", 0x43),
    (Keycode::Minus, "-", 0x44), (Keycode::Equal, "=", 0x45),
    (Keycode::LeftBracket, "[", 0x72), (Keycode::RightBracket, "]", 0x73),
    (Keycode::Backslash, "\\", 0x74),
    (Keycode::Semicolon, ";", 0x97), (Keycode::Quote, "'", 0xA0), (Keycode::Comma, ",", 0xC2),
    (Keycode::Period, ".", 0xC4), (Keycode::Slash, "/", 0xC5), (Keycode::Grave, "`", 0x26),
    (Keycode::Escape, "Esc", 0x00), (Keycode::Tab, "Tab", 0x54), (Keycode::CapsLock, "Caps", 0x82),
    (Keycode::F1, "F1", 0x01), (Keycode::F2, "F2", 0x02), (Keycode::F3, "F3", 0x03),
    (Keycode::F4, "F4", 0x04), (Keycode::F5, "F5", 0x05), (Keycode::F6, "F6", 0x06),
    (Keycode::F7, "F7", 0x10), (Keycode::F8, "F8", 0x11), (Keycode::F9, "F9", 0x12),
    (Keycode::F10, "F10", 0x13), (Keycode::F11, "F11", 0x14), (Keycode::F12, "F12", 0x15),
    (Keycode::RightEnter, "REnter", 0xA1), (Keycode::MiddleEnter, "MEnter", 0xB7),
    (Keycode::LeftShift, "LShift", 0xB0), (Keycode::MiddleShift, "MShift", 0xE6),
    (Keycode::RightShift, "RShift", 0xC6),
    (Keycode::LeftControl, "LCtrl", 0xD6), (Keycode::MiddleControl, "MCtrl", 0xE4),
    (Keycode::RightControl, "RCtrl", 0xF4),
    (Keycode::LeftAlt, "LAlt", 0xE0), (Keycode::RightAlt, "RAlt", 0xF0),
    (Keycode::MiddleBackspace, "MBksp", 0x91), (Keycode::RightBackspace, "RBksp", 0x46),
    (Keycode::LeftSpace, "LSpace", 0xE3), (Keycode::RightSpace, "RSpace", 0xE7),
    (Keycode::Windows, "Win", 0xD7),
    (Keycode::PageUp, "PgUp", 0x75), (Keycode::PageDown, "PgDn", 0xA3),
    // Down shares Left's code in the firmware table.
    (Keycode::Left, "Left", 0xF6), (Keycode::Right, "Right", 0xF7),
    (Keycode::Up, "Up", 0xD0), (Keycode::Down, "Down", 0xF6),
    (Keycode::PrintScreen, "PrtSc", 0x20), (Keycode::Delete, "Del", 0x16),
    (Keycode::XBows, "XBows", 0x63),
    (Keycode::NumLock, "NumLock", UNASSIGNED), (Keycode::NumpadSlash, "NP/", UNASSIGNED),
    (Keycode::NumpadStar, "NP*", UNASSIGNED), (Keycode::NumpadEnter, "NPEnter", UNASSIGNED),
    (Keycode::Numpad1, "NP1", UNASSIGNED), (Keycode::Numpad2, "NP2", UNASSIGNED),
    (Keycode::Numpad3, "NP3", UNASSIGNED), (Keycode::Numpad4, "NP4", UNASSIGNED),
    (Keycode::Numpad5, "NP5", UNASSIGNED), (Keycode::Numpad6, "NP6", UNASSIGNED),
    (Keycode::Numpad7, "NP7", UNASSIGNED), (Keycode::Numpad8, "NP8", UNASSIGNED),
    (Keycode::Numpad9, "NP9", UNASSIGNED), (Keycode::Numpad0, "NP0", UNASSIGNED),
    (Keycode::NumpadPeriod, "NP.", UNASSIGNED), (Keycode::NumpadMinus, "NP-", UNASSIGNED),
    (Keycode::NumpadPlus, "NP+", UNASSIGNED),
    (Keycode::Play, "Play", UNASSIGNED), (Keycode::Pause, "Pause", UNASSIGNED),
    (Keycode::Stop, "Stop", UNASSIGNED), (Keycode::PreviousTrack, "Prev", UNASSIGNED),
    (Keycode::NextTrack, "Next", UNASSIGNED), (Keycode::VolumeUp, "VolUp", UNASSIGNED),
    (Keycode::VolumeDown, "VolDown", UNASSIGNED), (Keycode::Mute, "Mute", UNASSIGNED),
    (Keycode::LeftClick, "LClick", UNASSIGNED), (Keycode::MiddleClick, "MClick", UNASSIGNED),
    (Keycode::RightClick, "RClick", UNASSIGNED), (Keycode::MouseBack, "MouseBack", UNASSIGNED),
    (Keycode::MouseForward, "MouseFwd", UNASSIGNED),
    (Keycode::NetBack, "NetBack", UNASSIGNED), (Keycode::NetForward, "NetFwd", UNASSIGNED),
    (Keycode::NetRefresh, "NetRefresh", UNASSIGNED),
    (Keycode::NetFavorites, "NetFavorites", UNASSIGNED),
    (Keycode::NetHome, "NetHome", UNASSIGNED), (Keycode::Email, "Email", UNASSIGNED),
    (Keycode::Computer, "Computer", UNASSIGNED), (Keycode::Calculator, "Calc", UNASSIGNED),
    (Keycode::Copy, "Copy", UNASSIGNED), (Keycode::Paste, "Paste", UNASSIGNED),
    (Keycode::NetPrintScreen, "NetPrtSc", UNASSIGNED),
    (Keycode::Home, "Home", UNASSIGNED), (Keycode::End, "End", UNASSIGNED),
    (Keycode::Insert, "Insert", UNASSIGNED),
    (Keycode::Fn, "Fn", 0xF3),
];

/// A key's byte and bit within the frame bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitPosition {
    pub byte: usize,
    pub bit: u8,
}

impl BitPosition {
    /// Decode a packed bitmap code. `None` for the sentinel or any code whose
    /// byte lies outside the bitmap.
    pub fn from_code(code: u8) -> Option<Self> {
        if code == UNASSIGNED {
            return None;
        }
        let byte = usize::from(code >> 4);
        let bit = code & 0x0F;
        (byte < BITMAP_SIZE && bit < 8).then_some(Self { byte, bit })
    }

    pub fn mask(self) -> u8 {
        1 << self.bit
    }
}

impl Keycode {
    /// Every keycode in table order.
    pub fn all() -> impl Iterator<Item = Keycode> {
        TABLE.iter().map(|&(key, _, _)| key)
    }

    fn entry(self) -> (Keycode, &'static str, u8) {
        TABLE[self as usize]
    }

    /// Display name, also accepted by [`FromStr`]
    pub fn name(self) -> &'static str {
        self.entry().1
    }

    /// Raw packed bitmap code (may be [`UNASSIGNED`])
    pub fn bitmap_code(self) -> u8 {
        self.entry().2
    }

    /// Bitmap position, or `None` if the key cannot be lit
    pub fn bit_position(self) -> Option<BitPosition> {
        BitPosition::from_code(self.bitmap_code())
    }

    pub fn is_assigned(self) -> bool {
        self.bit_position().is_some()
    }
}

impl fmt::Display for Keycode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Keycode {
    type Err = ProtocolError;

    /// Case-insensitive lookup by display name (`"A"`, `"Esc"`, `"LShift"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        TABLE
            .iter()
            .find(|(_, name, _)| name.eq_ignore_ascii_case(s))
            .map(|&(key, _, _)| key)
            .ok_or_else(|| ProtocolError::UnknownKey(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_discriminants() {
        for (i, &(key, _, _)) in TABLE.iter().enumerate() {
            assert_eq!(key as usize, i, "{key:?} out of order");
        }
        assert_eq!(TABLE.last().map(|e| e.0), Some(Keycode::Fn));
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<String> = TABLE.iter().map(|e| e.1.to_ascii_lowercase()).collect();
        names.sort();
        let before = names.len();
        names.dedup();
        assert_eq!(names.len(), before);
    }

    #[test]
    fn positions_decode_code() {
        assert_eq!(
            Keycode::A.bit_position(),
            Some(BitPosition { byte: 8, bit: 3 })
        );
        assert_eq!(
            Keycode::Escape.bit_position(),
            Some(BitPosition { byte: 0, bit: 0 })
        );
        assert_eq!(
            Keycode::Right.bit_position(),
            Some(BitPosition { byte: 15, bit: 7 })
        );
    }

    #[test]
    fn unassigned_keys_have_no_position() {
        assert_eq!(Keycode::None.bit_position(), None);
        assert_eq!(Keycode::Numpad5.bit_position(), None);
        assert_eq!(Keycode::Home.bit_position(), None);
        assert!(!Keycode::Mute.is_assigned());
    }

    #[test]
    fn every_assigned_code_fits_bitmap() {
        for key in Keycode::all() {
            if key.bitmap_code() != UNASSIGNED {
                let pos = key.bit_position().unwrap();
                assert!(pos.byte < BITMAP_SIZE);
                assert!(pos.bit < 8, "{key} bit {}", pos.bit);
            }
        }
    }

    #[test]
    fn parse_names() {
        assert_eq!("a".parse::<Keycode>().unwrap(), Keycode::A);
        assert_eq!("ESC".parse::<Keycode>().unwrap(), Keycode::Escape);
        assert_eq!(" lshift ".parse::<Keycode>().unwrap(), Keycode::LeftShift);
        assert_eq!("np5".parse::<Keycode>().unwrap(), Keycode::Numpad5);
        assert_eq!("1".parse::<Keycode>().unwrap(), Keycode::Num1);
        assert_eq!(
            "Hyper".parse::<Keycode>(),
            Err(ProtocolError::UnknownKey("Hyper".into()))
        );
    }

    #[test]
    fn display_roundtrips_through_parse() {
        for key in Keycode::all() {
            assert_eq!(key.to_string().parse::<Keycode>().unwrap(), key);
        }
    }
}
