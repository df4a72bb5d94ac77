//! Keymap sub-program: per-key remap table
//!
//! 14 four-byte bindings per packet. Each packet's offset is the byte
//! position of its first binding; the size indicator is the number of
//! binding bytes it carries.

use tracing::{debug, warn};
use xbows_protocol::{cmd, Packet, ProtocolError, PAYLOAD_SIZE};

use crate::error::ProgramError;
use crate::layer::{check_layer, CUSTOM_LAYERS};
use crate::model::Keymap;

/// Bytes per key binding
pub const BINDING_SIZE: usize = 4;
/// Bindings per packet
pub const BINDINGS_PER_PACKET: usize = PAYLOAD_SIZE / BINDING_SIZE;

/// Serialize `keymap` for custom layer `layer` (1-3).
pub fn custom_keymap_program(layer: u8, keymap: &Keymap) -> Result<Vec<Packet>, ProgramError> {
    let layer = check_layer("keymap", layer, CUSTOM_LAYERS)?;
    if keymap.is_empty() {
        warn!(layer, "empty keymap, no keymap packets emitted");
    }

    let packets = keymap
        .keys()
        .chunks(BINDINGS_PER_PACKET)
        .enumerate()
        .map(|(i, chunk)| -> Result<Packet, ProgramError> {
            let offset = u16::try_from(i * PAYLOAD_SIZE).map_err(|_| {
                ProtocolError::StreamTooLong {
                    command: cmd::KEYMAP,
                    bytes: keymap.len() * BINDING_SIZE,
                }
            })?;
            let mut pkt = Packet::new(cmd::KEYMAP, layer);
            pkt.set_offset(offset);
            pkt.set_size_indicator((chunk.len() * BINDING_SIZE) as u8);
            for binding in chunk {
                pkt.fill(&binding.to_le_bytes());
            }
            Ok(pkt)
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(layer, keys = keymap.len(), packets = packets.len(), "built keymap program");
    Ok(packets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keymap(n: u32) -> Keymap {
        Keymap::new((0..n).map(|i| 0x0200_0000 | i).collect())
    }

    #[test]
    fn packet_count_is_ceil_of_fourteen() {
        for (n, expected) in [(0, 0), (1, 1), (14, 1), (15, 2), (28, 2), (100, 8)] {
            let packets = custom_keymap_program(1, &keymap(n)).unwrap();
            assert_eq!(packets.len(), expected, "{n} keys");
        }
    }

    #[test]
    fn offsets_and_sizes() {
        let packets = custom_keymap_program(2, &keymap(30)).unwrap();
        let offsets: Vec<u16> = packets.iter().map(Packet::offset).collect();
        let sizes: Vec<u8> = packets.iter().map(Packet::size_indicator).collect();
        assert_eq!(offsets, vec![0, 56, 112]);
        assert_eq!(sizes, vec![56, 56, 8]);
        for pkt in &packets {
            assert_eq!(pkt.command(), cmd::KEYMAP);
            assert_eq!(pkt.sub(), 2);
        }
    }

    #[test]
    fn bindings_reassemble_in_order() {
        let km = keymap(45);
        let packets = custom_keymap_program(3, &km).unwrap();
        let bytes: Vec<u8> = packets.iter().flat_map(|p| p.data().to_vec()).collect();
        let decoded: Vec<u32> = bytes
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(decoded, km.keys());
    }

    #[test]
    fn bindings_are_little_endian() {
        let packets = custom_keymap_program(1, &Keymap::new(vec![0x1122_3344])).unwrap();
        assert_eq!(packets[0].data(), &[0x44, 0x33, 0x22, 0x11]);
        assert_eq!(packets[0].size_indicator(), 4);
    }

    #[test]
    fn rejects_layers_outside_one_to_three() {
        for layer in [0, 4] {
            assert!(matches!(
                custom_keymap_program(layer, &keymap(3)),
                Err(ProgramError::InvalidLayer { layer: l, .. }) if l == layer
            ));
        }
    }

    #[test]
    fn offset_must_fit_header_field() {
        // 1171 packets: the last starts at 65520
        let fits = custom_keymap_program(2, &keymap(1171 * 14)).unwrap();
        assert_eq!(fits.last().map(Packet::offset), Some(65520));

        let over = keymap(1171 * 14 + 1);
        assert_eq!(
            custom_keymap_program(2, &over),
            Err(ProgramError::Protocol(ProtocolError::StreamTooLong {
                command: cmd::KEYMAP,
                bytes: (1171 * 14 + 1) * 4
            }))
        );
    }
}
