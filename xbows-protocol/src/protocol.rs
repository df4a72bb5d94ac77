//! Protocol constants for X-Bows custom layer programming

/// Command bytes (packet byte 0)
pub mod cmd {
    /// Attention/wake packet sent before any programming
    pub const ATTENTION: u8 = 0x01;
    /// Ends a programming session
    pub const TERMINATE: u8 = 0x0B;
    /// Announces which sub-program follows
    pub const SECTION_INTRO: u8 = 0x21;
    /// Custom layer key remap data
    pub const KEYMAP: u8 = 0x22;
    /// Flashlight key bitmap data
    pub const FLASHLIGHT: u8 = 0x26;
    /// Light program data (frame index + frames)
    pub const LIGHT_PROGRAM: u8 = 0x27;

    /// Get human-readable name for command byte
    pub fn name(cmd: u8) -> &'static str {
        match cmd {
            ATTENTION => "ATTENTION",
            TERMINATE => "TERMINATE",
            SECTION_INTRO => "SECTION_INTRO",
            KEYMAP => "KEYMAP",
            FLASHLIGHT => "FLASHLIGHT",
            LIGHT_PROGRAM => "LIGHT_PROGRAM",
            _ => "UNKNOWN",
        }
    }
}

/// Section selectors carried by `SECTION_INTRO` packets
pub mod section {
    pub const KEYMAP: u8 = 0x01;
    pub const MACRO: u8 = 0x04;
    pub const FLASHLIGHT: u8 = 0x05;
    pub const LIGHTS: u8 = 0x06;

    /// Get human-readable name for a section selector
    pub fn name(section: u8) -> &'static str {
        match section {
            KEYMAP => "keymap",
            MACRO => "macro",
            FLASHLIGHT => "flashlight",
            LIGHTS => "lights",
            _ => "unknown",
        }
    }
}

/// Total bytes in a packet on the wire
pub const PACKET_SIZE: usize = 64;
/// Header bytes preceding the payload
pub const HEADER_SIZE: usize = 8;
/// Payload bytes carried by a single packet
pub const PAYLOAD_SIZE: usize = PACKET_SIZE - HEADER_SIZE;

/// Key bitmap size used by animation and pattern frames
pub const BITMAP_SIZE: usize = 22;

/// Packets sent ahead of a custom layer program to get the keyboard's
/// attention, as `(command, sub)` pairs.
pub const WAKE_SEQUENCE: &[(u8, u8)] = &[(cmd::ATTENTION, 0x00)];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_fills_rest_of_packet() {
        assert_eq!(PAYLOAD_SIZE, 56);
        assert_eq!(HEADER_SIZE + PAYLOAD_SIZE, PACKET_SIZE);
    }

    #[test]
    fn command_names() {
        assert_eq!(cmd::name(cmd::KEYMAP), "KEYMAP");
        assert_eq!(cmd::name(0x99), "UNKNOWN");
        assert_eq!(section::name(section::LIGHTS), "lights");
    }
}
