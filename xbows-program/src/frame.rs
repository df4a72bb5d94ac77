//! Animation and pattern frames
//!
//! Both frame kinds start with a 4-byte header and a 22-byte key bitmap.
//! Animation frames stop there (26 bytes); pattern frames add a color, an
//! effect mode and a duration (32 bytes).

use zerocopy::byteorder::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use xbows_protocol::{KeyBitmap, Keycode, ProtocolError, BITMAP_SIZE};

use crate::error::ProgramError;

/// RGB color value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, IntoBytes, FromBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
struct AnimationFrameWire {
    header: U32,
    keys: [u8; BITMAP_SIZE],
}

#[derive(Debug, Clone, Copy, IntoBytes, FromBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
struct PatternFrameWire {
    header: U32,
    keys: [u8; BITMAP_SIZE],
    red: u8,
    green: u8,
    blue: u8,
    mode: u8,
    duration_ms: U16,
}

/// One step of a key animation: which keys are lit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimationFrame {
    pub keys: KeyBitmap,
}

impl AnimationFrame {
    /// Bytes on the wire
    pub const WIRE_SIZE: usize = 26;
    /// Bitmap length (0x16) in the high half, frame kind in the low half
    pub const HEADER: u32 = 0x0016_0003;

    pub fn new() -> Self {
        Self::default()
    }

    /// Frame with every key in `keys` lit. Unassigned keys are an error.
    pub fn with_keys<I>(keys: I) -> Result<Self, ProtocolError>
    where
        I: IntoIterator<Item = Keycode>,
    {
        Ok(Self {
            keys: KeyBitmap::from_keys(keys)?,
        })
    }

    pub fn enable(&mut self, key: Keycode) -> Result<(), ProtocolError> {
        self.keys.enable(key)
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn to_bytes(&self) -> [u8; Self::WIRE_SIZE] {
        let wire = AnimationFrameWire {
            header: U32::new(Self::HEADER),
            keys: *self.keys.as_bytes(),
        };
        let mut out = [0u8; Self::WIRE_SIZE];
        out.copy_from_slice(wire.as_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProgramError> {
        let wire = AnimationFrameWire::read_from_bytes(bytes).map_err(|_| {
            ProtocolError::InvalidLength {
                expected: Self::WIRE_SIZE,
                actual: bytes.len(),
            }
        })?;
        if wire.header.get() != Self::HEADER {
            return Err(ProgramError::MalformedFrame {
                kind: "animation",
                header: wire.header.get(),
            });
        }
        Ok(Self {
            keys: KeyBitmap::from_bytes(wire.keys),
        })
    }
}

/// One step of a lighting pattern: which keys, in what color, for how long.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternFrame {
    pub keys: KeyBitmap,
    pub color: Rgb,
    pub mode: u8,
    pub duration_ms: u16,
}

impl PatternFrame {
    /// Bytes on the wire
    pub const WIRE_SIZE: usize = 32;
    pub const HEADER: u32 = 0x0016_0001;

    pub fn new(color: Rgb, mode: u8, duration_ms: u16) -> Self {
        Self {
            keys: KeyBitmap::new(),
            color,
            mode,
            duration_ms,
        }
    }

    pub fn enable(&mut self, key: Keycode) -> Result<(), ProtocolError> {
        self.keys.enable(key)
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn to_bytes(&self) -> [u8; Self::WIRE_SIZE] {
        let wire = PatternFrameWire {
            header: U32::new(Self::HEADER),
            keys: *self.keys.as_bytes(),
            red: self.color.r,
            green: self.color.g,
            blue: self.color.b,
            mode: self.mode,
            duration_ms: U16::new(self.duration_ms),
        };
        let mut out = [0u8; Self::WIRE_SIZE];
        out.copy_from_slice(wire.as_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProgramError> {
        let wire = PatternFrameWire::read_from_bytes(bytes).map_err(|_| {
            ProtocolError::InvalidLength {
                expected: Self::WIRE_SIZE,
                actual: bytes.len(),
            }
        })?;
        if wire.header.get() != Self::HEADER {
            return Err(ProgramError::MalformedFrame {
                kind: "pattern",
                header: wire.header.get(),
            });
        }
        Ok(Self {
            keys: KeyBitmap::from_bytes(wire.keys),
            color: Rgb::new(wire.red, wire.green, wire.blue),
            mode: wire.mode,
            duration_ms: wire.duration_ms.get(),
        })
    }
}
