//! Program assembly error types

use thiserror::Error;
use xbows_protocol::ProtocolError;

/// Errors from building or decoding a custom layer program.
///
/// Assembly is all-or-nothing: any error aborts the whole program.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgramError {
    /// Layer outside the range a builder accepts
    #[error("invalid layer {layer} for {section} (expected {min}-{max})")]
    InvalidLayer {
        section: &'static str,
        layer: u8,
        min: u8,
        max: u8,
    },

    /// Frame index table would not fit in its fixed region
    #[error("{count} light programs specified, no more than {max} are supported")]
    TooManyLightPrograms { count: usize, max: usize },

    /// Wire-level error (bad key, bad packet)
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Packet sequence lacks a sub-program the decoder needs
    #[error("no {0} packets in sequence")]
    MissingSection(&'static str),

    /// Sub-program stream ends before the data it describes
    #[error("{section} stream truncated: need {needed} bytes, have {available}")]
    TruncatedStream {
        section: &'static str,
        needed: usize,
        available: usize,
    },

    /// Part of a sub-program stream was never sent
    #[error("{section} stream has no packet covering byte {offset}")]
    MissingPacket { section: &'static str, offset: usize },

    /// Stream length is not a whole number of records
    #[error("{section} stream length {len} is not a multiple of {unit}")]
    MisalignedStream {
        section: &'static str,
        len: usize,
        unit: usize,
    },

    /// Frame index entry is inconsistent
    #[error("malformed frame index entry {index}: {reason}")]
    MalformedIndex { index: usize, reason: String },

    /// Frame bytes do not carry the expected header
    #[error("malformed {kind} frame: header 0x{header:08X}")]
    MalformedFrame { kind: &'static str, header: u32 },

    /// Packets of one sub-program disagree on layer
    #[error("{section} packets span layers {first} and {other}")]
    MixedLayers {
        section: &'static str,
        first: u8,
        other: u8,
    },
}
