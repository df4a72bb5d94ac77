//! Wire-level error types

use thiserror::Error;

use crate::keycode::Keycode;

/// Errors from packet encoding, decoding and key bitmap lookups
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Key has no position on the frame bitmap
    #[error("key {0} has no position on the lighting bitmap")]
    UnassignedKey(Keycode),

    /// Key name did not match any keycode
    #[error("unknown key: \"{0}\"")]
    UnknownKey(String),

    /// Buffer is not the size the record requires
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Sub-program stream would need a packet offset past 0xFFFF
    #[error("command 0x{command:02X} stream of {bytes} bytes overflows the offset field")]
    StreamTooLong { command: u8, bytes: usize },

    /// Stored checksum does not match the packet contents
    #[error("checksum mismatch: stored 0x{stored:04X}, computed 0x{computed:04X}")]
    ChecksumMismatch { stored: u16, computed: u16 },
}
