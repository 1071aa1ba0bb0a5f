//! Checksums used on the wire
//!
//! - Header: CRC-16/CCITT-FALSE (poly 0x1021, init 0xFFFF, no reflection,
//!   xorout 0x0000)
//! - Payload: CRC-32/ISO-HDLC (reflected poly 0xEDB88320, init and xorout
//!   0xFFFFFFFF)
//!
//! Both are bitwise and table-free to keep flash usage small on the Spine.

/// CRC-16/CCITT-FALSE polynomial
const CRC16_POLY: u16 = 0x1021;
const CRC16_INIT: u16 = 0xFFFF;

/// CRC-32/ISO-HDLC polynomial, reflected form
const CRC32_POLY_REFLECTED: u32 = 0xEDB8_8320;
const CRC32_INIT: u32 = 0xFFFF_FFFF;
const CRC32_XOR_OUT: u32 = 0xFFFF_FFFF;

/// Compute the header checksum over `data`
///
/// Empty input returns the initial register value (0xFFFF). Callers always
/// pass the 14 header bytes with the CRC field zeroed.
pub const fn header_crc16(data: &[u8]) -> u16 {
    let mut crc = CRC16_INIT;
    let mut i = 0;
    while i < data.len() {
        crc ^= (data[i] as u16) << 8;
        let mut bit = 0;
        while bit < 8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ CRC16_POLY;
            } else {
                crc <<= 1;
            }
            bit += 1;
        }
        i += 1;
    }
    crc
}

/// Compute the payload checksum over `data`
///
/// A zero-length payload has checksum 0, not the algorithm's natural
/// empty-input value. This is a contract rule.
pub const fn payload_crc32(data: &[u8]) -> u32 {
    if data.is_empty() {
        return 0;
    }

    let mut crc = CRC32_INIT;
    let mut i = 0;
    while i < data.len() {
        crc ^= data[i] as u32;
        let mut bit = 0;
        while bit < 8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ CRC32_POLY_REFLECTED;
            } else {
                crc >>= 1;
            }
            bit += 1;
        }
        i += 1;
    }
    crc ^ CRC32_XOR_OUT
}
