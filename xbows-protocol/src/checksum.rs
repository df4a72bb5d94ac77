//! Packet checksum (CRC-16/CCITT-FALSE)

const POLY: u16 = 0x1021;
const INIT: u16 = 0xFFFF;

/// CRC-16/CCITT-FALSE over `data`: poly 0x1021, init 0xFFFF, MSB first,
/// no final xor.
pub fn crc16_ccitt(data: &[u8]) -> u16 {
    let mut crc = INIT;
    for &byte in data {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLY
            } else {
                crc << 1
            };
        }
    }
    crc
}
