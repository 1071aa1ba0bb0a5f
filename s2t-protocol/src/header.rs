//! Fixed 14-byte packet header
//!
//! Header format (all multi-byte fields little-endian):
//! ```text
//! ┌───────┬───────┬───────┬──────┬───────┬─────┬─────┬─────┬─────────────┬───────┐
//! │ MAGIC │ MAJOR │ MINOR │ TYPE │ FLAGS │ SRC │ DST │ SEQ │ PAYLOAD_LEN │ CRC16 │
//! │ 2B    │ 1B    │ 1B    │ 1B   │ 1B    │ 1B  │ 1B  │ 2B  │ 2B          │ 2B    │
//! └───────┴───────┴───────┴──────┴───────┴─────┴─────┴─────┴─────────────┴───────┘
//! ```
//!
//! CRC16 covers all 14 bytes with its own two bytes treated as zero.

use crate::contract::{
    HEADER_SIZE, MAX_PAYLOAD_SIZE, OFFSET_DST, OFFSET_FLAGS, OFFSET_HEADER_CRC16, OFFSET_MAGIC,
    OFFSET_MSG_TYPE, OFFSET_PAYLOAD_LEN, OFFSET_PROTO_MAJOR, OFFSET_PROTO_MINOR, OFFSET_SEQ,
    OFFSET_SRC, PROTO_MAGIC, TRAILER_SIZE,
};
use crate::crc::header_crc16;
use crate::version::{ProtocolConfig, ProtocolVersion};

/// Reasons a header is rejected
///
/// Checks run in declaration order and the first failure wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HeaderError {
    /// Fewer than 14 bytes available
    BufferTooSmall { len: usize },
    /// First two bytes are not the protocol magic
    MagicMismatch { found: u16 },
    /// Version rejected by the configured policy
    VersionMismatch { found: ProtocolVersion },
    /// Declared payload exceeds `MAX_PAYLOAD_SIZE`
    PayloadTooLarge { len: u16 },
    /// Header checksum does not match
    CrcMismatch { expected: u16, computed: u16 },
}

/// Decoded header fields
///
/// This is a host-side representation, not a wire struct: fields are always
/// decoded explicitly from little-endian bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Header {
    pub magic: u16,
    pub proto_major: u8,
    pub proto_minor: u8,
    pub msg_type: u8,
    pub flags: u8,
    pub src: u8,
    pub dst: u8,
    pub seq: u16,
    pub payload_len: u16,
    pub header_crc16: u16,
}

impl Header {
    /// Create a header at the current protocol version
    ///
    /// Flags start cleared and the checksum is left at zero until
    /// [`Header::encode`] or [`Header::sealed`] fills it in.
    pub fn new(msg_type: u8, src: u8, dst: u8, seq: u16, payload_len: u16) -> Self {
        let version = ProtocolVersion::CURRENT;
        Self {
            magic: PROTO_MAGIC,
            proto_major: version.major,
            proto_minor: version.minor,
            msg_type,
            flags: 0,
            src,
            dst,
            seq,
            payload_len,
            header_crc16: 0,
        }
    }

    /// Version carried by this header
    pub fn version(&self) -> ProtocolVersion {
        ProtocolVersion::new(self.proto_major, self.proto_minor)
    }

    /// Total on-wire size of the packet this header describes
    pub fn frame_len(&self) -> usize {
        HEADER_SIZE + self.payload_len as usize + TRAILER_SIZE
    }

    /// Decode fields without validating anything
    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Self {
        Self {
            magic: read_u16_le(bytes, OFFSET_MAGIC),
            proto_major: bytes[OFFSET_PROTO_MAJOR],
            proto_minor: bytes[OFFSET_PROTO_MINOR],
            msg_type: bytes[OFFSET_MSG_TYPE],
            flags: bytes[OFFSET_FLAGS],
            src: bytes[OFFSET_SRC],
            dst: bytes[OFFSET_DST],
            seq: read_u16_le(bytes, OFFSET_SEQ),
            payload_len: read_u16_le(bytes, OFFSET_PAYLOAD_LEN),
            header_crc16: read_u16_le(bytes, OFFSET_HEADER_CRC16),
        }
    }

    /// Write fields as they are, including the stored checksum
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        write_u16_le(&mut bytes, OFFSET_MAGIC, self.magic);
        bytes[OFFSET_PROTO_MAJOR] = self.proto_major;
        bytes[OFFSET_PROTO_MINOR] = self.proto_minor;
        bytes[OFFSET_MSG_TYPE] = self.msg_type;
        bytes[OFFSET_FLAGS] = self.flags;
        bytes[OFFSET_SRC] = self.src;
        bytes[OFFSET_DST] = self.dst;
        write_u16_le(&mut bytes, OFFSET_SEQ, self.seq);
        write_u16_le(&mut bytes, OFFSET_PAYLOAD_LEN, self.payload_len);
        write_u16_le(&mut bytes, OFFSET_HEADER_CRC16, self.header_crc16);
        bytes
    }

    /// Checksum these fields should carry
    pub fn compute_crc16(&self) -> u16 {
        crc_over_header(&self.to_bytes())
    }

    /// Copy of this header with the checksum filled in
    pub fn sealed(mut self) -> Self {
        self.header_crc16 = self.compute_crc16();
        self
    }

    /// Encode for transmission, computing the checksum
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        self.sealed().to_bytes()
    }
}

/// Parse and validate a header using the default configuration
pub fn parse_and_validate_header(buf: &[u8]) -> Result<Header, HeaderError> {
    parse_and_validate_header_with(buf, &ProtocolConfig::default())
}

/// Parse and validate the header at the start of `buf`
///
/// Only the first 14 bytes are examined; anything after them is ignored.
///
/// Validation order:
/// 1. Length
/// 2. Magic
/// 3. Version, per `config.policy`
/// 4. Payload length cap
/// 5. Header CRC16 (CRC field treated as zero)
pub fn parse_and_validate_header_with(
    buf: &[u8],
    config: &ProtocolConfig,
) -> Result<Header, HeaderError> {
    let bytes = header_bytes(buf).ok_or(HeaderError::BufferTooSmall { len: buf.len() })?;
    let header = Header::from_bytes(bytes);

    if header.magic != PROTO_MAGIC {
        return Err(HeaderError::MagicMismatch {
            found: header.magic,
        });
    }

    if !config.accepts(header.version()) {
        return Err(HeaderError::VersionMismatch {
            found: header.version(),
        });
    }

    if header.payload_len as usize > MAX_PAYLOAD_SIZE {
        return Err(HeaderError::PayloadTooLarge {
            len: header.payload_len,
        });
    }

    let computed = crc_over_header(bytes);
    if computed != header.header_crc16 {
        return Err(HeaderError::CrcMismatch {
            expected: header.header_crc16,
            computed,
        });
    }

    Ok(header)
}

/// First 14 bytes of `buf` as an array, if there are that many
fn header_bytes(buf: &[u8]) -> Option<&[u8; HEADER_SIZE]> {
    buf.get(..HEADER_SIZE)?.try_into().ok()
}

/// CRC16 over a scratch copy with the checksum field zeroed
fn crc_over_header(bytes: &[u8; HEADER_SIZE]) -> u16 {
    let mut scratch = *bytes;
    scratch[OFFSET_HEADER_CRC16] = 0;
    scratch[OFFSET_HEADER_CRC16 + 1] = 0;
    header_crc16(&scratch)
}

fn read_u16_le(bytes: &[u8; HEADER_SIZE], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn write_u16_le(bytes: &mut [u8; HEADER_SIZE], offset: usize, value: u16) {
    bytes[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}
