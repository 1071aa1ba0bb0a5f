//! Brain <-> Spine Communication Protocol
//!
//! This crate defines the wire format between the Brain (host controller)
//! and the Spine (RP2040 motion controller) of the S2T rover, and the codec
//! both ends use to frame and verify it.
//!
//! # Protocol Overview
//!
//! Every packet is a fixed header, a payload and a checksum trailer:
//! ```text
//! ┌────────────┬─────────────┬──────────────┐
//! │ HEADER     │ PAYLOAD     │ PAYLOAD_CRC32│
//! │ 14B        │ 0–256B      │ 4B           │
//! └────────────┴─────────────┴──────────────┘
//! ```
//!
//! Data flow on the receive side:
//! raw bytes → [`Framer`] → candidate frame → [`validate_packet`] → accept/reject.
//!
//! The codec never interprets payloads, retransmits or talks to a transport.
//! Everything is synchronous, allocation-free and bounded.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod contract;
pub mod crc;
pub mod framer;
pub mod header;
pub mod packet;
pub mod version;

pub use contract::{
    Direction, NodeId, SpineState, HEADER_SIZE, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE,
    MIN_PACKET_SIZE, PROTO_MAGIC, TRAILER_SIZE,
};
pub use crc::{header_crc16, payload_crc32};
pub use framer::{FrameSink, Framer, FramerState, FramerStats};
pub use header::{parse_and_validate_header, parse_and_validate_header_with, Header, HeaderError};
pub use packet::{
    encode_packet, encode_packet_to_vec, validate_packet, validate_packet_with, EncodeError,
    Packet, PacketError,
};
pub use version::{ProtocolConfig, ProtocolVersion, VersionPolicy};
