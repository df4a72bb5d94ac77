//! Flashlight sub-program: the flashlight key bitmap
//!
//! The device expects exactly three packets, even when no flashlight keys are
//! set. Only the first 120 bytes of the 176-byte bitmap are sent. The size
//! indicator values are fixed by the firmware and kept as captured.

use tracing::debug;
use xbows_protocol::{cmd, Packet};

use crate::error::ProgramError;
use crate::layer::{check_layer, CUSTOM_LAYERS};
use crate::model::FLASHLIGHT_KEYS_SIZE;

/// `(start, end, size indicator)` of each flashlight packet's slice
pub const FLASHLIGHT_PACKETS: [(usize, usize, u8); 3] =
    [(0, 56, 0x38), (56, 112, 0x38), (112, 120, 0x08)];

/// Flashlight bytes actually transmitted
pub const FLASHLIGHT_WIRE_SIZE: usize = 120;

/// Serialize the flashlight key bitmap for custom layer `layer` (1-3).
pub fn custom_flashlight_program(
    layer: u8,
    flashlight_keys: &[u8; FLASHLIGHT_KEYS_SIZE],
) -> Result<Vec<Packet>, ProgramError> {
    let layer = check_layer("flashlight", layer, CUSTOM_LAYERS)?;

    let packets: Vec<Packet> = FLASHLIGHT_PACKETS
        .iter()
        .map(|&(start, end, size)| {
            let mut pkt = Packet::new(cmd::FLASHLIGHT, layer);
            pkt.set_offset(start as u16);
            pkt.set_size_indicator(size);
            pkt.fill(&flashlight_keys[start..end]);
            pkt
        })
        .collect();

    debug!(layer, packets = packets.len(), "built flashlight program");
    Ok(packets)
}
