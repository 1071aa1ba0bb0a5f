//! Whole-packet validation and encoding
//!
//! A packet is a contiguous header + payload + trailer. Validation assumes
//! the caller already isolated exactly one candidate frame (the framer's
//! job); nothing here buffers partial data.

use heapless::Vec;

use crate::contract::{HEADER_SIZE, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE, MIN_PACKET_SIZE, TRAILER_SIZE};
use crate::crc::payload_crc32;
use crate::header::{parse_and_validate_header_with, Header, HeaderError};
use crate::version::ProtocolConfig;

/// Reasons a packet is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketError {
    /// Shorter than header + trailer
    TooShort { len: usize },
    /// Header failed validation
    Header(HeaderError),
    /// Buffer length disagrees with the header's payload length
    LengthMismatch { expected: usize, actual: usize },
    /// Trailer checksum does not match the payload
    PayloadCrcMismatch { expected: u32, computed: u32 },
}

impl From<HeaderError> for PacketError {
    fn from(e: HeaderError) -> Self {
        PacketError::Header(e)
    }
}

/// Errors building a packet for transmission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Payload exceeds `MAX_PAYLOAD_SIZE`
    PayloadTooLarge,
    /// Output buffer too small for the encoded packet
    BufferTooSmall,
}

/// Validated packet borrowed from a receive buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet<'a> {
    header: Header,
    bytes: &'a [u8],
}

impl<'a> Packet<'a> {
    /// Validate `buf` with the default configuration
    pub fn parse(buf: &'a [u8]) -> Result<Self, PacketError> {
        Self::parse_with(buf, &ProtocolConfig::default())
    }

    /// Validate `buf` as exactly one complete packet
    ///
    /// Steps:
    /// 1. Minimum length
    /// 2. Header (magic, version, payload cap, CRC16)
    /// 3. Total length equals `14 + payload_len + 4`
    /// 4. Payload CRC32 matches the trailer
    pub fn parse_with(buf: &'a [u8], config: &ProtocolConfig) -> Result<Self, PacketError> {
        if buf.len() < MIN_PACKET_SIZE {
            return Err(PacketError::TooShort { len: buf.len() });
        }

        let header = parse_and_validate_header_with(buf, config)?;

        let expected = HEADER_SIZE
            .checked_add(header.payload_len as usize)
            .and_then(|n| n.checked_add(TRAILER_SIZE))
            .ok_or(PacketError::LengthMismatch {
                expected: usize::MAX,
                actual: buf.len(),
            })?;

        if buf.len() != expected {
            return Err(PacketError::LengthMismatch {
                expected,
                actual: buf.len(),
            });
        }

        let packet = Self { header, bytes: buf };
        let stored = packet.trailer_crc32();
        let computed = payload_crc32(packet.payload());
        if computed != stored {
            return Err(PacketError::PayloadCrcMismatch {
                expected: stored,
                computed,
            });
        }

        Ok(packet)
    }

    /// Decoded header
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Payload bytes
    pub fn payload(&self) -> &'a [u8] {
        &self.bytes[HEADER_SIZE..HEADER_SIZE + self.header.payload_len as usize]
    }

    /// Checksum stored in the trailer
    pub fn trailer_crc32(&self) -> u32 {
        let start = HEADER_SIZE + self.header.payload_len as usize;
        let t = &self.bytes[start..start + TRAILER_SIZE];
        u32::from_le_bytes([t[0], t[1], t[2], t[3]])
    }

    /// Entire packet as received
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

/// Validate a complete packet with the default configuration
pub fn validate_packet(buf: &[u8]) -> Result<(), PacketError> {
    Packet::parse(buf).map(|_| ())
}

/// Validate a complete packet against `config`
pub fn validate_packet_with(buf: &[u8], config: &ProtocolConfig) -> Result<(), PacketError> {
    Packet::parse_with(buf, config).map(|_| ())
}

/// Encode a packet into `out`
///
/// The header's `payload_len` and checksum are overwritten to match
/// `payload`. Returns the number of bytes written.
pub fn encode_packet(header: &Header, payload: &[u8], out: &mut [u8]) -> Result<usize, EncodeError> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(EncodeError::PayloadTooLarge);
    }

    let frame_len = HEADER_SIZE + payload.len() + TRAILER_SIZE;
    if out.len() < frame_len {
        return Err(EncodeError::BufferTooSmall);
    }

    let mut header = *header;
    header.payload_len = payload.len() as u16;

    let trailer_start = HEADER_SIZE + payload.len();
    out[..HEADER_SIZE].copy_from_slice(&header.encode());
    out[HEADER_SIZE..trailer_start].copy_from_slice(payload);
    out[trailer_start..frame_len].copy_from_slice(&payload_crc32(payload).to_le_bytes());

    Ok(frame_len)
}

/// Encode a packet into a heapless Vec
pub fn encode_packet_to_vec(
    header: &Header,
    payload: &[u8],
) -> Result<Vec<u8, MAX_FRAME_SIZE>, EncodeError> {
    let mut buffer = [0u8; MAX_FRAME_SIZE];
    let len = encode_packet(header, payload, &mut buffer)?;
    let mut vec = Vec::new();
    vec.extend_from_slice(&buffer[..len])
        .map_err(|_| EncodeError::BufferTooSmall)?;
    Ok(vec)
}
