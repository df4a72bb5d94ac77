//! Fixed-layout 64-byte command packets
//!
//! Wire layout:
//!
//! ```text
//! [0]     command
//! [1]     sub (layer)
//! [2..4]  offset, u16 LE (payload bytes already sent for this sub-program)
//! [4]     reserved
//! [5]     size indicator
//! [6..8]  checksum, u16 LE
//! [8..64] payload
//! ```
//!
//! A [`Packet`] is mutable while a builder fills it. [`Packet::seal`] computes
//! the checksum over the final bytes and yields a [`SealedPacket`], which
//! cannot be changed afterwards.

use std::fmt;

use zerocopy::byteorder::little_endian::U16;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::checksum::crc16_ccitt;
use crate::error::ProtocolError;
use crate::protocol::{cmd, HEADER_SIZE, PACKET_SIZE, PAYLOAD_SIZE};

/// Packet header, 8 bytes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, KnownLayout, Immutable, Unaligned,
)]
#[repr(C)]
struct PacketHeader {
    command: u8,
    sub: u8,
    offset: U16,
    _reserved: u8,
    size: u8,
    checksum: U16,
}

impl PacketHeader {
    fn new(command: u8, sub: u8) -> Self {
        Self {
            command,
            sub,
            offset: U16::new(0),
            _reserved: 0,
            size: 0,
            checksum: U16::new(0),
        }
    }
}

/// A packet under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    header: PacketHeader,
    payload: [u8; PAYLOAD_SIZE],
    /// Payload bytes filled so far. Not transmitted.
    used: usize,
}

impl Packet {
    /// Create an empty packet with offset 0 and nothing filled.
    pub fn new(command: u8, sub: u8) -> Self {
        Self {
            header: PacketHeader::new(command, sub),
            payload: [0; PAYLOAD_SIZE],
            used: 0,
        }
    }

    /// Intro packet announcing the sub-program that follows.
    ///
    /// The section selector travels in byte 2, i.e. the low byte of the
    /// offset field.
    pub fn section_intro(layer: u8, section: u8) -> Self {
        let mut pkt = Self::new(cmd::SECTION_INTRO, layer);
        pkt.set_offset(u16::from(section));
        pkt
    }

    pub fn command(&self) -> u8 {
        self.header.command
    }

    pub fn sub(&self) -> u8 {
        self.header.sub
    }

    pub fn offset(&self) -> u16 {
        self.header.offset.get()
    }

    pub fn set_offset(&mut self, offset: u16) {
        self.header.offset = U16::new(offset);
    }

    pub fn size_indicator(&self) -> u8 {
        self.header.size
    }

    pub fn set_size_indicator(&mut self, size: u8) {
        self.header.size = size;
    }

    /// Payload bytes filled so far
    pub fn used(&self) -> usize {
        self.used
    }

    /// Payload bytes still free
    pub fn remaining(&self) -> usize {
        PAYLOAD_SIZE - self.used
    }

    pub fn is_full(&self) -> bool {
        self.used == PAYLOAD_SIZE
    }

    /// The filled part of the payload
    pub fn data(&self) -> &[u8] {
        &self.payload[..self.used]
    }

    /// Append as much of `data` as fits. Returns the number of bytes taken.
    pub fn fill(&mut self, data: &[u8]) -> usize {
        let count = data.len().min(self.remaining());
        self.payload[self.used..self.used + count].copy_from_slice(&data[..count]);
        self.used += count;
        count
    }

    /// Compute the checksum over the final byte layout and freeze the packet.
    pub fn seal(mut self) -> SealedPacket {
        self.header.checksum = U16::new(0);
        let checksum = crc16_ccitt(&encode(&self.header, &self.payload));
        self.header.checksum = U16::new(checksum);
        SealedPacket {
            header: self.header,
            payload: self.payload,
        }
    }
}

fn encode(header: &PacketHeader, payload: &[u8; PAYLOAD_SIZE]) -> [u8; PACKET_SIZE] {
    let mut buf = [0u8; PACKET_SIZE];
    buf[..HEADER_SIZE].copy_from_slice(header.as_bytes());
    buf[HEADER_SIZE..].copy_from_slice(payload);
    buf
}

/// A packet whose checksum has been computed. Immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedPacket {
    header: PacketHeader,
    payload: [u8; PAYLOAD_SIZE],
}

impl SealedPacket {
    /// Parse a 64-byte packet and verify its checksum.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        if bytes.len() != PACKET_SIZE {
            return Err(ProtocolError::InvalidLength {
                expected: PACKET_SIZE,
                actual: bytes.len(),
            });
        }
        let (header, rest) =
            PacketHeader::read_from_prefix(bytes).map_err(|_| ProtocolError::InvalidLength {
                expected: HEADER_SIZE,
                actual: bytes.len(),
            })?;
        let payload: [u8; PAYLOAD_SIZE] =
            rest.try_into().map_err(|_| ProtocolError::InvalidLength {
                expected: PAYLOAD_SIZE,
                actual: rest.len(),
            })?;

        let stored = header.checksum.get();
        let mut unsealed = header;
        unsealed.checksum = U16::new(0);
        let computed = crc16_ccitt(&encode(&unsealed, &payload));
        if stored != computed {
            return Err(ProtocolError::ChecksumMismatch { stored, computed });
        }
        Ok(Self { header, payload })
    }

    pub fn command(&self) -> u8 {
        self.header.command
    }

    pub fn sub(&self) -> u8 {
        self.header.sub
    }

    pub fn offset(&self) -> u16 {
        self.header.offset.get()
    }

    pub fn size_indicator(&self) -> u8 {
        self.header.size
    }

    pub fn checksum(&self) -> u16 {
        self.header.checksum.get()
    }

    /// Full 56-byte payload as transmitted
    pub fn payload(&self) -> &[u8; PAYLOAD_SIZE] {
        &self.payload
    }

    /// Wire bytes
    pub fn to_bytes(&self) -> [u8; PACKET_SIZE] {
        encode(&self.header, &self.payload)
    }
}

impl fmt::Display for SealedPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.command() == cmd::SECTION_INTRO {
            write!(
                f,
                "{:<14} sub={} section={}",
                cmd::name(self.command()),
                self.sub(),
                crate::protocol::section::name(self.offset() as u8),
            )?;
        } else {
            write!(
                f,
                "{:<14} sub={} off=0x{:04X} size=0x{:02X}",
                cmd::name(self.command()),
                self.sub(),
                self.offset(),
                self.size_indicator(),
            )?;
        }
        write!(f, " crc=0x{:04X}", self.checksum())
    }
}

/// Format bytes as space-separated hex, 16 per line.
pub fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .chunks(16)
        .map(|line| {
            line.iter()
                .map(|b| format!("{b:02x}"))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
