//! Reassemble a sealed packet sequence into the program it encodes
//!
//! Each sub-program's packets are gathered by command byte and their payloads
//! placed at the offsets their headers record, which rebuilds the sent
//! byte stream regardless of packet order. Stream lengths come from the size
//! indicators (keymap), the fixed flashlight shape, and the frame index
//! (light program).

use tracing::debug;
use zerocopy::FromBytes;

use xbows_protocol::{cmd, SealedPacket, PAYLOAD_SIZE};

use crate::error::ProgramError;
use crate::flashlight::FLASHLIGHT_WIRE_SIZE;
use crate::frame::{AnimationFrame, PatternFrame};
use crate::keymap::BINDING_SIZE;
use crate::lights::{FrameIndexEntry, INDEX_ENTRY_SIZE, INDEX_REGION_SIZE, MAX_LIGHT_PROGRAMS};
use crate::model::{Keymap, LightProgram, Program, FLASHLIGHT_KEYS_SIZE};

/// A decoded upload: the program plus the layer numbers it was sent for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedProgram {
    /// Sub-id of the keymap/flashlight sections
    pub layer: u8,
    /// Sub-id of the light program section
    pub light_layer: u8,
    pub program: Program,
}

/// Decode an upload sequence produced by [`custom_program`].
///
/// [`custom_program`]: crate::assemble::custom_program
pub fn decode_program(packets: &[SealedPacket]) -> Result<DecodedProgram, ProgramError> {
    let keymap_packets = section_packets(packets, cmd::KEYMAP, "keymap")?;
    let flash_packets = section_packets(packets, cmd::FLASHLIGHT, "flashlight")?;
    let light_packets = section_packets(packets, cmd::LIGHT_PROGRAM, "light program")?;

    let layer = flash_packets
        .first()
        .map(|p| p.sub())
        .ok_or(ProgramError::MissingSection("flashlight"))?;
    let light_layer = light_packets
        .first()
        .map(|p| p.sub())
        .ok_or(ProgramError::MissingSection("light program"))?;

    let keymap = decode_keymap(&keymap_packets)?;
    let flashlight_keys = decode_flashlight(&flash_packets)?;
    let mut lights = decode_lights(&light_packets)?.into_iter();
    let custom_lights = lights.next().ok_or_else(|| ProgramError::MalformedIndex {
        index: 0,
        reason: "no custom lights entry".to_string(),
    })?;

    let program = Program {
        keymap,
        custom_lights,
        flashlights: lights.collect(),
        flashlight_keys,
    };
    debug!(
        layer,
        keys = program.keymap.len(),
        flashlights = program.flashlights.len(),
        "decoded program"
    );
    Ok(DecodedProgram {
        layer,
        light_layer,
        program,
    })
}

fn section_packets<'a>(
    packets: &'a [SealedPacket],
    command: u8,
    section: &'static str,
) -> Result<Vec<&'a SealedPacket>, ProgramError> {
    let selected: Vec<&SealedPacket> = packets.iter().filter(|p| p.command() == command).collect();
    if let Some(first) = selected.first() {
        if let Some(other) = selected.iter().find(|p| p.sub() != first.sub()) {
            return Err(ProgramError::MixedLayers {
                section,
                first: first.sub(),
                other: other.sub(),
            });
        }
    }
    Ok(selected)
}

/// One sub-program's payloads placed at their recorded offsets, with a
/// record of which bytes some packet actually supplied.
struct SectionBytes {
    section: &'static str,
    bytes: Vec<u8>,
    covered: Vec<bool>,
}

impl SectionBytes {
    fn reassemble(section: &'static str, packets: &[&SealedPacket]) -> Self {
        let len = packets
            .iter()
            .map(|p| usize::from(p.offset()) + PAYLOAD_SIZE)
            .max()
            .unwrap_or(0);
        let mut bytes = vec![0u8; len];
        let mut covered = vec![false; len];
        for pkt in packets {
            let range = usize::from(pkt.offset())..usize::from(pkt.offset()) + PAYLOAD_SIZE;
            bytes[range.clone()].copy_from_slice(pkt.payload());
            covered[range].fill(true);
        }
        Self {
            section,
            bytes,
            covered,
        }
    }

    /// `bytes[start..start + len]`, provided every byte was sent.
    fn window(&self, start: usize, len: usize) -> Result<&[u8], ProgramError> {
        let end = start + len;
        if end > self.bytes.len() {
            return Err(ProgramError::TruncatedStream {
                section: self.section,
                needed: end,
                available: self.bytes.len(),
            });
        }
        if let Some(gap) = self.covered[start..end].iter().position(|&c| !c) {
            return Err(ProgramError::MissingPacket {
                section: self.section,
                offset: start + gap,
            });
        }
        Ok(&self.bytes[start..end])
    }
}

fn decode_keymap(packets: &[&SealedPacket]) -> Result<Keymap, ProgramError> {
    let len = packets
        .iter()
        .map(|p| usize::from(p.offset()) + usize::from(p.size_indicator()))
        .max()
        .unwrap_or(0);
    if len % BINDING_SIZE != 0 {
        return Err(ProgramError::MisalignedStream {
            section: "keymap",
            len,
            unit: BINDING_SIZE,
        });
    }
    let stream = SectionBytes::reassemble("keymap", packets);
    let keys = stream
        .window(0, len)?
        .chunks_exact(BINDING_SIZE)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    Ok(Keymap::new(keys))
}

fn decode_flashlight(
    packets: &[&SealedPacket],
) -> Result<[u8; FLASHLIGHT_KEYS_SIZE], ProgramError> {
    let stream = SectionBytes::reassemble("flashlight", packets);
    let sent = stream.window(0, FLASHLIGHT_WIRE_SIZE)?;
    let mut keys = [0u8; FLASHLIGHT_KEYS_SIZE];
    keys[..FLASHLIGHT_WIRE_SIZE].copy_from_slice(sent);
    Ok(keys)
}

fn decode_lights(packets: &[&SealedPacket]) -> Result<Vec<LightProgram>, ProgramError> {
    let stream = SectionBytes::reassemble("light program", packets);

    let index = stream.window(0, INDEX_REGION_SIZE)?;
    let mut programs = Vec::new();
    for (i, raw) in index
        .chunks_exact(INDEX_ENTRY_SIZE)
        .take(MAX_LIGHT_PROGRAMS)
        .enumerate()
    {
        let entry = FrameIndexEntry::read_from_bytes(raw).map_err(|_| {
            ProgramError::MalformedIndex {
                index: i,
                reason: "short entry".to_string(),
            }
        })?;
        if entry.is_filler() {
            break;
        }

        let anim_start = entry.animation_start() as usize;
        let anim_count = entry.animation_count() as usize;
        let pattern_start = entry.pattern_start() as usize;
        let pattern_count = entry.pattern_count() as usize;
        let anim_len = anim_count * AnimationFrame::WIRE_SIZE;
        if anim_start < INDEX_REGION_SIZE {
            return Err(ProgramError::MalformedIndex {
                index: i,
                reason: format!("animation start 0x{anim_start:X} inside index region"),
            });
        }
        if pattern_start != anim_start + anim_len {
            return Err(ProgramError::MalformedIndex {
                index: i,
                reason: format!(
                    "pattern start 0x{pattern_start:X} does not follow animation frames"
                ),
            });
        }

        let animation = stream.window(anim_start, anim_len)?
            .chunks_exact(AnimationFrame::WIRE_SIZE)
            .map(AnimationFrame::from_bytes)
            .collect::<Result<Vec<_>, _>>()?;
        let pattern_len = pattern_count * PatternFrame::WIRE_SIZE;
        let patterns = stream.window(pattern_start, pattern_len)?
            .chunks_exact(PatternFrame::WIRE_SIZE)
            .map(PatternFrame::from_bytes)
            .collect::<Result<Vec<_>, _>>()?;
        programs.push(LightProgram {
            animation,
            patterns,
        });
    }
    Ok(programs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::custom_program;
    use crate::flashlight::custom_flashlight_program;
    use crate::frame::Rgb;
    use crate::lights::INDEX_FILL;
    use xbows_protocol::{Keycode, Packet, PacketStream};
    use zerocopy::IntoBytes;

    fn rich_program() -> Program {
        let mut flashlight_keys = [0u8; FLASHLIGHT_KEYS_SIZE];
        flashlight_keys[0] = 0x81;
        flashlight_keys[119] = 0x42;

        let mut pattern = PatternFrame::new(Rgb::new(1, 2, 3), 4, 500);
        pattern.enable(Keycode::Escape).unwrap();
        pattern.enable(Keycode::Fn).unwrap();

        Program {
            keymap: Keymap::new((0..97).map(|i| 0x0001_0000 + i).collect()),
            custom_lights: LightProgram {
                animation: vec![
                    AnimationFrame::with_keys([Keycode::W, Keycode::A]).unwrap(),
                    AnimationFrame::with_keys([Keycode::S, Keycode::D]).unwrap(),
                ],
                patterns: vec![pattern; 3],
            },
            flashlights: vec![
                LightProgram {
                    animation: vec![AnimationFrame::with_keys([Keycode::F5]).unwrap()],
                    patterns: Vec::new(),
                },
                LightProgram::default(),
                LightProgram {
                    animation: Vec::new(),
                    patterns: vec![PatternFrame::new(Rgb::WHITE, 0, 10)],
                },
            ],
            flashlight_keys,
        }
    }

    #[test]
    fn roundtrip_recovers_program() {
        let program = rich_program();
        let packets = custom_program(3, &program).unwrap();
        let decoded = decode_program(&packets).unwrap();
        assert_eq!(decoded.layer, 3);
        assert_eq!(decoded.light_layer, 3);
        assert_eq!(decoded.program, program);
    }

    #[test]
    fn roundtrip_through_wire_bytes() {
        let program = rich_program();
        let packets = custom_program(2, &program).unwrap();
        let reparsed: Vec<SealedPacket> = packets
            .iter()
            .map(|p| SealedPacket::from_bytes(&p.to_bytes()).unwrap())
            .collect();
        assert_eq!(decode_program(&reparsed).unwrap().program, program);
    }

    #[test]
    fn order_of_packets_does_not_matter() {
        let program = rich_program();
        let mut packets = custom_program(2, &program).unwrap();
        packets.reverse();
        assert_eq!(decode_program(&packets).unwrap().program, program);
    }

    #[test]
    fn empty_keymap_decodes_empty() {
        let program = Program::default();
        let packets = custom_program(2, &program).unwrap();
        let decoded = decode_program(&packets).unwrap();
        assert!(decoded.program.keymap.is_empty());
        assert_eq!(decoded.program, program);
    }

    #[test]
    fn flashlight_tail_is_not_transmitted() {
        let mut program = Program::default();
        program.flashlight_keys[150] = 0xFF;
        let packets = custom_program(2, &program).unwrap();
        let decoded = decode_program(&packets).unwrap();
        assert_eq!(decoded.program.flashlight_keys[150], 0);
    }

    #[test]
    fn missing_light_section() {
        let packets: Vec<SealedPacket> = custom_program(2, &Program::default())
            .unwrap()
            .into_iter()
            .filter(|p| p.command() != cmd::LIGHT_PROGRAM)
            .collect();
        assert_eq!(
            decode_program(&packets),
            Err(ProgramError::MissingSection("light program"))
        );
    }

    #[test]
    fn truncated_light_stream() {
        let mut packets = custom_program(2, &rich_program()).unwrap();
        let last_light = packets
            .iter()
            .rposition(|p| p.command() == cmd::LIGHT_PROGRAM)
            .unwrap();
        packets.remove(last_light);
        assert!(matches!(
            decode_program(&packets),
            Err(ProgramError::TruncatedStream { .. })
        ));
    }

    #[test]
    fn mixed_layers_rejected() {
        let mut packets = custom_program(2, &Program::default()).unwrap();
        let mut stray = Packet::new(cmd::FLASHLIGHT, 3);
        stray.set_offset(112);
        packets.push(stray.seal());
        assert_eq!(
            decode_program(&packets),
            Err(ProgramError::MixedLayers {
                section: "flashlight",
                first: 2,
                other: 3
            })
        );
    }

    #[test]
    fn pattern_start_must_follow_animation() {
        let mut stream = PacketStream::with_command(cmd::LIGHT_PROGRAM, 2);
        let bad = FrameIndexEntry::new(0x200, 1, 0x200, 0);
        stream.pack_data(bad.as_bytes()).unwrap();
        stream.pad(INDEX_FILL, INDEX_REGION_SIZE - INDEX_ENTRY_SIZE).unwrap();
        stream.pad(0, AnimationFrame::WIRE_SIZE).unwrap();

        let mut packets: Vec<SealedPacket> =
            custom_flashlight_program(2, &[0; FLASHLIGHT_KEYS_SIZE])
                .unwrap()
                .into_iter()
                .map(Packet::seal)
                .collect();
        packets.extend(stream.into_packets().into_iter().map(Packet::seal));

        assert!(matches!(
            decode_program(&packets),
            Err(ProgramError::MalformedIndex { index: 0, .. })
        ));
    }

    fn without_packet(packets: &[SealedPacket], command: u8, offset: u16) -> Vec<SealedPacket> {
        packets
            .iter()
            .filter(|p| !(p.command() == command && p.offset() == offset))
            .cloned()
            .collect()
    }

    #[test]
    fn missing_middle_keymap_packet() {
        let program = Program {
            keymap: Keymap::new((1..=40).collect()),
            ..Program::default()
        };
        let packets = custom_program(2, &program).unwrap();
        assert_eq!(
            decode_program(&without_packet(&packets, cmd::KEYMAP, 56)),
            Err(ProgramError::MissingPacket {
                section: "keymap",
                offset: 56
            })
        );
    }

    #[test]
    fn missing_first_keymap_packet() {
        let program = Program {
            keymap: Keymap::new((1..=20).collect()),
            ..Program::default()
        };
        let packets = custom_program(2, &program).unwrap();
        assert_eq!(
            decode_program(&without_packet(&packets, cmd::KEYMAP, 0)),
            Err(ProgramError::MissingPacket {
                section: "keymap",
                offset: 0
            })
        );
    }

    #[test]
    fn missing_light_packet_inside_index() {
        let packets = custom_program(2, &rich_program()).unwrap();
        assert_eq!(
            decode_program(&without_packet(&packets, cmd::LIGHT_PROGRAM, 168)),
            Err(ProgramError::MissingPacket {
                section: "light program",
                offset: 168
            })
        );
    }

    #[test]
    fn keymap_length_must_be_whole_bindings() {
        let mut packets = custom_program(2, &Program::default()).unwrap();
        let mut partial = Packet::new(cmd::KEYMAP, 2);
        partial.fill(&[1, 2, 3, 4, 5, 6]);
        partial.set_size_indicator(6);
        packets.push(partial.seal());
        assert_eq!(
            decode_program(&packets),
            Err(ProgramError::MisalignedStream {
                section: "keymap",
                len: 6,
                unit: 4
            })
        );
    }

    #[test]
    fn roundtrip_at_offset_limit() {
        // 512 + 2033 * 32 = 65568 light bytes, last packet at offset 65520
        let program = Program {
            custom_lights: LightProgram {
                animation: Vec::new(),
                patterns: vec![PatternFrame::new(Rgb::WHITE, 1, 20); 2033],
            },
            ..Program::default()
        };
        let packets = custom_program(2, &program).unwrap();
        assert_eq!(decode_program(&packets).unwrap().program, program);
    }
}
