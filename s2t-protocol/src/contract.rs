//! Normative wire-format constants for the Brain <-> Spine contract.
//!
//! Layout only: sizes, byte offsets and identifier values. No behavior lives
//! here. All multi-byte fields are little-endian on the wire.

/// Protocol magic ("S2"), sent low byte first: `0x32 0x53`
pub const PROTO_MAGIC: u16 = 0x5332;

/// Protocol version carried in every header
pub const PROTO_VERSION_MAJOR: u8 = 0;
pub const PROTO_VERSION_MINOR: u8 = 2;

/// Fixed header size in bytes
pub const HEADER_SIZE: usize = 14;

/// Fixed trailer size in bytes (payload CRC32)
pub const TRAILER_SIZE: usize = 4;

/// Smallest valid packet (header + trailer, empty payload)
pub const MIN_PACKET_SIZE: usize = HEADER_SIZE + TRAILER_SIZE;

/// Maximum payload size
///
/// Implementation safety cap, not a protocol guarantee. Also sizes the
/// framer's receive buffer.
pub const MAX_PAYLOAD_SIZE: usize = 256;

/// Largest possible frame (HEADER + MAX_PAYLOAD + TRAILER)
pub const MAX_FRAME_SIZE: usize = HEADER_SIZE + MAX_PAYLOAD_SIZE + TRAILER_SIZE;

// Header field offsets
pub const OFFSET_MAGIC: usize = 0; // u16
pub const OFFSET_PROTO_MAJOR: usize = 2; // u8
pub const OFFSET_PROTO_MINOR: usize = 3; // u8
pub const OFFSET_MSG_TYPE: usize = 4; // u8
pub const OFFSET_FLAGS: usize = 5; // u8
pub const OFFSET_SRC: usize = 6; // u8
pub const OFFSET_DST: usize = 7; // u8
pub const OFFSET_SEQ: usize = 8; // u16
pub const OFFSET_PAYLOAD_LEN: usize = 10; // u16
pub const OFFSET_HEADER_CRC16: usize = 12; // u16

// Trailer field offsets (relative to start of trailer)
pub const TRAILER_OFFSET_CRC32: usize = 0; // u32

const _: () = assert!(HEADER_SIZE == 14);
const _: () = assert!(TRAILER_SIZE == 4);
const _: () = assert!(OFFSET_HEADER_CRC16 + 2 == HEADER_SIZE);
const _: () = assert!(MAX_PAYLOAD_SIZE <= u16::MAX as usize);

// Message type IDs: Brain → Spine (0x10..=0x2F)
pub const MSG_B2S_HELLO: u8 = 0x10;
pub const MSG_B2S_HEARTBEAT: u8 = 0x11;
pub const MSG_B2S_MOTION_ENABLE: u8 = 0x12;
pub const MSG_B2S_MOTION_SETPOINT: u8 = 0x13;

// Message type IDs: Spine → Brain (0x80..=0x9F)
pub const MSG_S2B_IDENTITY: u8 = 0x80;
pub const MSG_S2B_HEARTBEAT: u8 = 0x81;
pub const MSG_S2B_STATE_REPORT: u8 = 0x82;
pub const MSG_S2B_ACK: u8 = 0x83;
pub const MSG_S2B_FAULT: u8 = 0x84;

const B2S_RANGE_START: u8 = 0x10;
const B2S_RANGE_END: u8 = 0x2F;
const S2B_RANGE_START: u8 = 0x80;
const S2B_RANGE_END: u8 = 0x9F;

/// Direction a message type travels in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Host controller to motion controller
    BrainToSpine,
    /// Motion controller to host controller
    SpineToBrain,
}

impl Direction {
    /// Classify a message type by its numeric range
    ///
    /// Returns `None` for identifiers outside both reserved ranges.
    pub fn of_msg_type(msg_type: u8) -> Option<Self> {
        match msg_type {
            B2S_RANGE_START..=B2S_RANGE_END => Some(Direction::BrainToSpine),
            S2B_RANGE_START..=S2B_RANGE_END => Some(Direction::SpineToBrain),
            _ => None,
        }
    }

    /// Node that sends messages in this direction
    pub fn source(self) -> NodeId {
        match self {
            Direction::BrainToSpine => NodeId::Brain,
            Direction::SpineToBrain => NodeId::Spine,
        }
    }

    /// Node that receives messages in this direction
    pub fn destination(self) -> NodeId {
        match self {
            Direction::BrainToSpine => NodeId::Spine,
            Direction::SpineToBrain => NodeId::Brain,
        }
    }
}

/// Canonical node identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NodeId {
    /// Host controller
    Brain,
    /// Embedded motion controller
    Spine,
}

const NODE_ID_BRAIN: u8 = 0x00;
const NODE_ID_SPINE: u8 = 0x01;

impl NodeId {
    /// Parse a node id from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            NODE_ID_BRAIN => Some(NodeId::Brain),
            NODE_ID_SPINE => Some(NodeId::Spine),
            _ => None,
        }
    }

    /// Convert to wire byte
    pub fn to_byte(self) -> u8 {
        match self {
            NodeId::Brain => NODE_ID_BRAIN,
            NodeId::Spine => NODE_ID_SPINE,
        }
    }
}

/// Spine lifecycle state as carried in state-report payloads
///
/// The codec never interprets these; they are listed so both ends agree on
/// the encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpineState {
    Init,
    Safe,
    Enabled,
    Fault,
}

const SPINE_STATE_INIT: u8 = 0x00;
const SPINE_STATE_SAFE: u8 = 0x01;
const SPINE_STATE_ENABLED: u8 = 0x02;
const SPINE_STATE_FAULT: u8 = 0x03;

impl SpineState {
    /// Parse a state from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            SPINE_STATE_INIT => Some(SpineState::Init),
            SPINE_STATE_SAFE => Some(SpineState::Safe),
            SPINE_STATE_ENABLED => Some(SpineState::Enabled),
            SPINE_STATE_FAULT => Some(SpineState::Fault),
            _ => None,
        }
    }

    /// Convert to wire byte
    pub fn to_byte(self) -> u8 {
        match self {
            SpineState::Init => SPINE_STATE_INIT,
            SpineState::Safe => SPINE_STATE_SAFE,
            SpineState::Enabled => SPINE_STATE_ENABLED,
            SpineState::Fault => SPINE_STATE_FAULT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_wire_order() {
        assert_eq!(PROTO_MAGIC.to_le_bytes(), [0x32, 0x53]);
    }

    #[test]
    fn test_frame_size_bounds() {
        assert_eq!(MIN_PACKET_SIZE, 18);
        assert_eq!(MAX_FRAME_SIZE, 274);
    }

    #[test]
    fn test_direction_ranges() {
        assert_eq!(
            Direction::of_msg_type(MSG_B2S_HEARTBEAT),
            Some(Direction::BrainToSpine)
        );
        assert_eq!(
            Direction::of_msg_type(MSG_S2B_FAULT),
            Some(Direction::SpineToBrain)
        );
        assert_eq!(Direction::of_msg_type(0x2F), Some(Direction::BrainToSpine));
        assert_eq!(Direction::of_msg_type(0x9F), Some(Direction::SpineToBrain));
        assert_eq!(Direction::of_msg_type(0x00), None);
        assert_eq!(Direction::of_msg_type(0x30), None);
        assert_eq!(Direction::of_msg_type(0xA0), None);
    }

    #[test]
    fn test_direction_endpoints() {
        assert_eq!(Direction::BrainToSpine.source(), NodeId::Brain);
        assert_eq!(Direction::BrainToSpine.destination(), NodeId::Spine);
        assert_eq!(Direction::SpineToBrain.source(), NodeId::Spine);
    }

    #[test]
    fn test_node_id_roundtrip() {
        for node in [NodeId::Brain, NodeId::Spine] {
            assert_eq!(NodeId::from_byte(node.to_byte()), Some(node));
        }
        assert_eq!(NodeId::from_byte(0x02), None);
    }

    #[test]
    fn test_spine_state_roundtrip() {
        let states = [
            SpineState::Init,
            SpineState::Safe,
            SpineState::Enabled,
            SpineState::Fault,
        ];
        for state in states {
            assert_eq!(SpineState::from_byte(state.to_byte()), Some(state));
        }
        assert_eq!(SpineState::from_byte(0x04), None);
    }
}
