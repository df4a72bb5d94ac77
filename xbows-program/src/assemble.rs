//! Top-level program assembly
//!
//! Upload order:
//!
//! ```text
//! wake packets
//! intro(keymap)     keymap packets
//! intro(macro)      macro packets
//! intro(flashlight) flashlight packets
//! intro(lights)     light program packets
//! terminator
//! ```
//!
//! Checksums are computed last, once every offset and payload is final.

use tracing::{debug, info};
use xbows_protocol::protocol::WAKE_SEQUENCE;
use xbows_protocol::{cmd, section, Packet, SealedPacket};

use crate::error::ProgramError;
use crate::flashlight::custom_flashlight_program;
use crate::keymap::custom_keymap_program;
use crate::lights::custom_light_programs;
use crate::macros::custom_macro_program;
use crate::model::Program;

/// Packets that wake the keyboard before programming
pub fn wake_packets() -> Vec<Packet> {
    WAKE_SEQUENCE
        .iter()
        .map(|&(command, sub)| Packet::new(command, sub))
        .collect()
}

/// Build and seal the complete upload sequence for `layer`.
///
/// `layer` is handed unchanged to every sub-program builder, so it must be
/// valid both as a custom layer (1-3) and as a light layer (2-4).
pub fn custom_program(layer: u8, program: &Program) -> Result<Vec<SealedPacket>, ProgramError> {
    let mut packets = wake_packets();

    packets.push(Packet::section_intro(layer, section::KEYMAP));
    packets.extend(custom_keymap_program(layer, &program.keymap)?);

    packets.push(Packet::section_intro(layer, section::MACRO));
    packets.extend(custom_macro_program(layer)?);

    packets.push(Packet::section_intro(layer, section::FLASHLIGHT));
    packets.extend(custom_flashlight_program(layer, &program.flashlight_keys)?);

    packets.push(Packet::section_intro(layer, section::LIGHTS));
    packets.extend(custom_light_programs(layer, program)?);

    packets.push(Packet::new(cmd::TERMINATE, layer));

    debug!(layer, packets = packets.len(), "sealing program");
    let sealed: Vec<SealedPacket> = packets.into_iter().map(Packet::seal).collect();
    info!(layer, packets = sealed.len(), "custom layer program assembled");
    Ok(sealed)
}
