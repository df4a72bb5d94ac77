//! Light program assembler
//!
//! The light sub-program is one byte stream:
//!
//! ```text
//! 0x000  frame index: 16 bytes per light program, padded with 0xFF to 0x200
//! 0x200  custom lights: animation frames (26 B each), pattern frames (32 B each)
//! ....   each flashlight program, same layout, in order
//! ```
//!
//! Index entries hold four little-endian u32s: where the program's animation
//! frames start, how many there are, where its pattern frames start, and how
//! many there are. Start offsets are absolute within the stream.

use tracing::debug;
use zerocopy::byteorder::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use xbows_protocol::{cmd, Packet, PacketStream};

use crate::error::ProgramError;
use crate::frame::{AnimationFrame, PatternFrame};
use crate::layer::{check_layer, LIGHT_LAYERS};
use crate::model::{LightProgram, Program};

/// Fixed size of the frame index region; frame data starts here
pub const INDEX_REGION_SIZE: usize = 0x200;
/// Bytes per frame index entry
pub const INDEX_ENTRY_SIZE: usize = 16;
/// Most light programs (custom lights + flashlights) the index can describe
pub const MAX_LIGHT_PROGRAMS: usize = INDEX_REGION_SIZE / INDEX_ENTRY_SIZE;
/// Filler for unused index bytes
pub const INDEX_FILL: u8 = 0xFF;

/// One frame index entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, KnownLayout, Immutable, Unaligned,
)]
#[repr(C)]
pub struct FrameIndexEntry {
    animation_start: U32,
    animation_count: U32,
    pattern_start: U32,
    pattern_count: U32,
}

impl FrameIndexEntry {
    pub fn new(
        animation_start: u32,
        animation_count: u32,
        pattern_start: u32,
        pattern_count: u32,
    ) -> Self {
        Self {
            animation_start: U32::new(animation_start),
            animation_count: U32::new(animation_count),
            pattern_start: U32::new(pattern_start),
            pattern_count: U32::new(pattern_count),
        }
    }

    pub fn animation_start(&self) -> u32 {
        self.animation_start.get()
    }

    pub fn animation_count(&self) -> u32 {
        self.animation_count.get()
    }

    pub fn pattern_start(&self) -> u32 {
        self.pattern_start.get()
    }

    pub fn pattern_count(&self) -> u32 {
        self.pattern_count.get()
    }

    /// True for the 0xFF filler that follows the last real entry
    pub fn is_filler(&self) -> bool {
        self.as_bytes().iter().all(|&b| b == INDEX_FILL)
    }
}

/// Index entries for `programs`, laid out back to back from the end of the
/// index region.
pub fn frame_index<'a, I>(programs: I) -> Vec<FrameIndexEntry>
where
    I: IntoIterator<Item = &'a LightProgram>,
{
    let mut start = INDEX_REGION_SIZE as u32;
    programs
        .into_iter()
        .map(|prog| {
            let anim_count = prog.animation.len() as u32;
            let pattern_count = prog.patterns.len() as u32;
            let anim_start = start;
            let pattern_start = anim_start + anim_count * AnimationFrame::WIRE_SIZE as u32;
            start = pattern_start + pattern_count * PatternFrame::WIRE_SIZE as u32;
            FrameIndexEntry::new(anim_start, anim_count, pattern_start, pattern_count)
        })
        .collect()
}

/// Append one light program's frames: every animation frame, then every
/// pattern frame.
pub fn pack_light_program(
    stream: &mut PacketStream,
    program: &LightProgram,
) -> Result<(), ProgramError> {
    for frame in &program.animation {
        stream.pack_data(&frame.to_bytes())?;
    }
    for frame in &program.patterns {
        stream.pack_data(&frame.to_bytes())?;
    }
    Ok(())
}

/// Assemble the light sub-program for light layer `layer` (2-4).
pub fn custom_light_programs(layer: u8, program: &Program) -> Result<Vec<Packet>, ProgramError> {
    let layer = check_layer("lights", layer, LIGHT_LAYERS)?;

    let count = program.flashlights.len() + 1;
    if count * INDEX_ENTRY_SIZE > INDEX_REGION_SIZE {
        return Err(ProgramError::TooManyLightPrograms {
            count,
            max: MAX_LIGHT_PROGRAMS,
        });
    }

    let mut stream = PacketStream::with_command(cmd::LIGHT_PROGRAM, layer);

    let index = frame_index(program.light_programs());
    stream.pack_data(index.as_bytes())?;
    stream.pad(INDEX_FILL, INDEX_REGION_SIZE - index.len() * INDEX_ENTRY_SIZE)?;

    for light in program.light_programs() {
        pack_light_program(&mut stream, light)?;
    }

    debug!(
        layer,
        programs = count,
        bytes = stream.payload_len(),
        packets = stream.packets().len(),
        "built light program"
    );
    Ok(stream.into_packets())
}
