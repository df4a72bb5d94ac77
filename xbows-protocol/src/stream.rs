//! Byte-stream chunker
//!
//! Splits arbitrary-length byte buffers across consecutive packets that share
//! a command and sub-id. Each packet carries up to [`PAYLOAD_SIZE`] bytes and
//! records, in its offset field, how many payload bytes of this sub-program
//! precede it.

use tracing::trace;

use crate::error::ProtocolError;
use crate::packet::Packet;
use crate::protocol::PAYLOAD_SIZE;

/// An in-progress packet run for one sub-program.
///
/// Always holds at least one packet. Successive [`pack_data`] calls continue
/// filling the last packet before starting a new one, so a buffer may span
/// packet boundaries and several buffers may share one packet.
///
/// [`pack_data`]: PacketStream::pack_data
#[derive(Debug, Clone)]
pub struct PacketStream {
    packets: Vec<Packet>,
}

impl PacketStream {
    /// Start a run seeded with `first`.
    pub fn new(first: Packet) -> Self {
        Self {
            packets: vec![first],
        }
    }

    /// Start a run with one empty packet.
    pub fn with_command(command: u8, sub: u8) -> Self {
        Self::new(Packet::new(command, sub))
    }

    /// Append `data`, creating packets as needed.
    ///
    /// A full last packet is followed by a fresh one that clones its
    /// command/sub and sits 56 bytes further along. Fails once a packet
    /// offset would not fit the 16-bit header field; the stream is then
    /// incomplete and must be discarded.
    pub fn pack_data(&mut self, mut data: &[u8]) -> Result<&mut Self, ProtocolError> {
        while !data.is_empty() {
            if self.last().is_full() {
                let prev = self.last();
                let next_offset = usize::from(prev.offset()) + PAYLOAD_SIZE;
                let offset =
                    u16::try_from(next_offset).map_err(|_| ProtocolError::StreamTooLong {
                        command: prev.command(),
                        bytes: next_offset + data.len(),
                    })?;
                let mut next = Packet::new(prev.command(), prev.sub());
                next.set_offset(offset);
                trace!(
                    cmd = next.command(),
                    sub = next.sub(),
                    offset = next.offset(),
                    "new packet"
                );
                self.packets.push(next);
            }
            let taken = self.last_mut().fill(data);
            data = &data[taken..];
        }
        Ok(self)
    }

    /// Append `count` copies of `byte`.
    pub fn pad(&mut self, byte: u8, count: usize) -> Result<&mut Self, ProtocolError> {
        self.pack_data(&vec![byte; count])
    }

    /// Payload bytes held across all packets
    pub fn payload_len(&self) -> usize {
        self.packets.iter().map(Packet::used).sum()
    }

    pub fn packets(&self) -> &[Packet] {
        &self.packets
    }

    pub fn into_packets(self) -> Vec<Packet> {
        self.packets
    }

    fn last(&self) -> &Packet {
        // Invariant: never empty.
        &self.packets[self.packets.len() - 1]
    }

    fn last_mut(&mut self) -> &mut Packet {
        let last = self.packets.len() - 1;
        &mut self.packets[last]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::cmd;

    fn concat(stream: &PacketStream) -> Vec<u8> {
        stream
            .packets()
            .iter()
            .flat_map(|p| p.data().to_vec())
            .collect()
    }

    #[test]
    fn small_buffer_stays_in_seed_packet() {
        let mut stream = PacketStream::with_command(cmd::LIGHT_PROGRAM, 2);
        stream.pack_data(&[1, 2, 3]).unwrap();
        assert_eq!(stream.packets().len(), 1);
        assert_eq!(stream.packets()[0].data(), &[1, 2, 3]);
    }

    #[test]
    fn payload_is_preserved_and_bounded() {
        for len in [1usize, 55, 56, 57, 112, 113, 500, 512] {
            let data: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let mut stream = PacketStream::with_command(cmd::LIGHT_PROGRAM, 3);
            stream.pack_data(&data).unwrap();
            assert_eq!(concat(&stream), data, "len {len}");
            assert!(stream.packets().iter().all(|p| p.used() <= PAYLOAD_SIZE));
            assert_eq!(stream.packets().len(), len.div_ceil(PAYLOAD_SIZE));
        }
    }

    #[test]
    fn offsets_step_by_payload_size() {
        let mut stream = PacketStream::with_command(cmd::LIGHT_PROGRAM, 2);
        stream.pack_data(&[0xAA; 200]).unwrap();
        let offsets: Vec<u16> = stream.packets().iter().map(Packet::offset).collect();
        assert_eq!(offsets, vec![0, 56, 112, 168]);
        assert_eq!(stream.packets()[3].used(), 200 - 168);
    }

    #[test]
    fn continues_partially_filled_packet() {
        let mut stream = PacketStream::with_command(cmd::LIGHT_PROGRAM, 2);
        stream.pack_data(&[1; 26]).unwrap();
        stream.pack_data(&[2; 26]).unwrap();
        stream.pack_data(&[3; 26]).unwrap();
        assert_eq!(stream.packets().len(), 2);
        assert_eq!(stream.packets()[0].used(), 56);
        assert_eq!(stream.packets()[1].used(), 22);
        assert_eq!(&stream.packets()[0].data()[50..], &[2, 2, 3, 3, 3, 3]);
        assert_eq!(stream.payload_len(), 78);
    }

    #[test]
    fn chunk_sizes_do_not_change_result() {
        let data: Vec<u8> = (0..300u16).map(|i| (i * 7) as u8).collect();
        let mut whole = PacketStream::with_command(cmd::LIGHT_PROGRAM, 4);
        whole.pack_data(&data).unwrap();
        for chunk in [1usize, 13, 32, 56] {
            let mut split = PacketStream::with_command(cmd::LIGHT_PROGRAM, 4);
            for part in data.chunks(chunk) {
                split.pack_data(part).unwrap();
            }
            assert_eq!(split.packets(), whole.packets(), "chunk {chunk}");
        }
    }

    #[test]
    fn continuation_keeps_offsets_of_seed() {
        let mut seed = Packet::new(cmd::LIGHT_PROGRAM, 2);
        seed.set_offset(0x70);
        seed.fill(&[0; 50]);
        let mut stream = PacketStream::new(seed);
        stream.pack_data(&[1; 10]).unwrap();
        let offsets: Vec<u16> = stream.packets().iter().map(Packet::offset).collect();
        assert_eq!(offsets, vec![0x70, 0x70 + 56]);
        assert_eq!(stream.packets()[1].data(), &[1, 1, 1, 1]);
    }

    #[test]
    fn new_packets_clone_command_and_sub() {
        let mut stream = PacketStream::with_command(cmd::LIGHT_PROGRAM, 4);
        stream.pad(0xFF, 120).unwrap();
        for pkt in stream.packets() {
            assert_eq!(pkt.command(), cmd::LIGHT_PROGRAM);
            assert_eq!(pkt.sub(), 4);
            assert_eq!(pkt.size_indicator(), 0);
        }
    }

    /// Largest stream whose last packet offset (65520) still fits in u16
    const MAX_STREAM: usize = (u16::MAX as usize / PAYLOAD_SIZE + 1) * PAYLOAD_SIZE;

    #[test]
    fn last_offset_that_fits() {
        let mut stream = PacketStream::with_command(cmd::LIGHT_PROGRAM, 2);
        stream.pad(0, MAX_STREAM).unwrap();
        let last = &stream.packets()[stream.packets().len() - 1];
        assert_eq!(last.offset(), 65520);
        assert!(last.is_full());
        assert_eq!(stream.payload_len(), 65576);
    }

    #[test]
    fn offset_past_u16_is_rejected() {
        let mut stream = PacketStream::with_command(cmd::LIGHT_PROGRAM, 2);
        assert_eq!(
            stream.pad(0, MAX_STREAM + 1).err(),
            Some(ProtocolError::StreamTooLong {
                command: cmd::LIGHT_PROGRAM,
                bytes: MAX_STREAM + 1
            })
        );

        let mut split = PacketStream::with_command(cmd::LIGHT_PROGRAM, 2);
        split.pad(0, MAX_STREAM).unwrap();
        assert!(split.pack_data(&[1]).is_err());
    }
}
