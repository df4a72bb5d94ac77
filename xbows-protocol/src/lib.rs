//! Wire-level protocol for X-Bows keyboard custom layer programming
//!
//! This crate covers what a single command packet looks like and how payloads
//! are spread across packets:
//!
//! - [`Packet`] / [`SealedPacket`]: the fixed 64-byte record and its checksum
//! - [`PacketStream`]: splits byte buffers across 56-byte payloads with
//!   running offsets
//! - [`Keycode`] / [`KeyBitmap`]: key identifiers and the 22-byte lighting
//!   bitmap they map onto

pub mod bitmap;
pub mod checksum;
pub mod error;
pub mod keycode;
pub mod packet;
pub mod protocol;
pub mod stream;

pub use bitmap::KeyBitmap;
pub use checksum::crc16_ccitt;
pub use error::ProtocolError;
pub use keycode::{BitPosition, Keycode, UNASSIGNED};
pub use packet::{hex_dump, Packet, SealedPacket};
pub use protocol::{cmd, section, BITMAP_SIZE, PACKET_SIZE, PAYLOAD_SIZE};
pub use stream::PacketStream;
