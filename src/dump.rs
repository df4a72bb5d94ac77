//! Packet dump files
//!
//! A dump is the sealed 64-byte packets of an upload, concatenated in upload
//! order with no framing. Reading re-verifies every checksum.

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use xbows_protocol::{ProtocolError, SealedPacket, PACKET_SIZE};

#[derive(Error, Debug)]
pub enum DumpError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dump length {len} is not a multiple of {PACKET_SIZE}")]
    Truncated { len: usize },

    #[error("packet {index}: {source}")]
    Packet {
        index: usize,
        #[source]
        source: ProtocolError,
    },
}

/// Concatenate packets into dump bytes.
pub fn encode(packets: &[SealedPacket]) -> Vec<u8> {
    packets.iter().flat_map(|p| p.to_bytes()).collect()
}

/// Split dump bytes back into verified packets.
pub fn decode(bytes: &[u8]) -> Result<Vec<SealedPacket>, DumpError> {
    if bytes.len() % PACKET_SIZE != 0 {
        return Err(DumpError::Truncated { len: bytes.len() });
    }
    bytes
        .chunks_exact(PACKET_SIZE)
        .enumerate()
        .map(|(index, chunk)| {
            SealedPacket::from_bytes(chunk).map_err(|source| DumpError::Packet { index, source })
        })
        .collect()
}

pub fn write_dump(path: &Path, packets: &[SealedPacket]) -> Result<(), DumpError> {
    std::fs::write(path, encode(packets))?;
    debug!(path = %path.display(), packets = packets.len(), "wrote packet dump");
    Ok(())
}

pub fn read_dump(path: &Path) -> Result<Vec<SealedPacket>, DumpError> {
    let bytes = std::fs::read(path)?;
    let packets = decode(&bytes)?;
    debug!(path = %path.display(), packets = packets.len(), "read packet dump");
    Ok(packets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xbows_protocol::{cmd, Packet};

    fn sample() -> Vec<SealedPacket> {
        let mut keymap = Packet::new(cmd::KEYMAP, 2);
        keymap.fill(&[1, 2, 3, 4]);
        keymap.set_size_indicator(4);
        vec![
            Packet::new(cmd::ATTENTION, 0).seal(),
            keymap.seal(),
            Packet::new(cmd::TERMINATE, 2).seal(),
        ]
    }

    #[test]
    fn encode_is_plain_concatenation() {
        let packets = sample();
        let bytes = encode(&packets);
        assert_eq!(bytes.len(), 3 * PACKET_SIZE);
        assert_eq!(&bytes[64..128], &packets[1].to_bytes());
        assert_eq!(decode(&bytes).unwrap(), packets);
    }

    #[test]
    fn partial_packet_rejected() {
        let mut bytes = encode(&sample());
        bytes.pop();
        assert!(matches!(
            decode(&bytes),
            Err(DumpError::Truncated { len: 191 })
        ));
    }

    #[test]
    fn corrupted_packet_is_located() {
        let mut bytes = encode(&sample());
        bytes[64 + 10] ^= 0xFF;
        match decode(&bytes) {
            Err(DumpError::Packet {
                index: 1,
                source: ProtocolError::ChecksumMismatch { .. },
            }) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn empty_dump() {
        assert!(decode(&[]).unwrap().is_empty());
    }

    #[test]
    fn file_roundtrip() {
        let path = std::env::temp_dir().join(format!("xbows-dump-{}.bin", std::process::id()));
        let packets = sample();
        write_dump(&path, &packets).unwrap();
        assert_eq!(read_dump(&path).unwrap(), packets);
        std::fs::remove_file(&path).unwrap();
    }
}
