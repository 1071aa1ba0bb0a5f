//! Protocol version acceptance
//!
//! Two contract editions shipped with different rules for the minor
//! version. The rule is now an explicit, caller-supplied policy rather than
//! a property of whichever copy of the codec got linked in.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::contract::{PROTO_VERSION_MAJOR, PROTO_VERSION_MINOR};

/// Protocol version as carried in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProtocolVersion {
    pub major: u8,
    pub minor: u8,
}

impl ProtocolVersion {
    /// Version this crate encodes and, by default, accepts
    pub const CURRENT: Self = Self::new(PROTO_VERSION_MAJOR, PROTO_VERSION_MINOR);

    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

/// Rule for accepting a peer's header version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VersionPolicy {
    /// Major and minor must both equal the configured version
    #[default]
    Exact,
    /// Major must match; minor may be older than or equal to the configured one
    MinorAtMost,
}

impl VersionPolicy {
    /// Check a received version against the configured one
    pub fn accepts(self, configured: ProtocolVersion, received: ProtocolVersion) -> bool {
        if received.major != configured.major {
            return false;
        }
        match self {
            VersionPolicy::Exact => received.minor == configured.minor,
            VersionPolicy::MinorAtMost => received.minor <= configured.minor,
        }
    }
}

/// Codec configuration supplied by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProtocolConfig {
    /// Version we speak
    pub version: ProtocolVersion,
    /// How strictly to match the peer's version
    pub policy: VersionPolicy,
}

impl ProtocolConfig {
    pub const fn new(version: ProtocolVersion, policy: VersionPolicy) -> Self {
        Self { version, policy }
    }

    /// Whether a header carrying `received` is acceptable
    pub fn accepts(&self, received: ProtocolVersion) -> bool {
        self.policy.accepts(self.version, received)
    }
}
