//! Harness configuration
//!
//! Loaded from a small TOML file:
//! ```toml
//! chunk_size = 64
//!
//! [protocol]
//! version = { major = 0, minor = 2 }
//! policy = "exact"          # or "minor_at_most"
//! ```
//! Every key is optional and falls back to the codec defaults.

use serde::{Deserialize, Serialize};

use s2t_protocol::{ProtocolConfig, ProtocolVersion};

use crate::error::{HarnessError, Result};

/// Settings for one harness run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Version and acceptance policy handed to the codec
    pub protocol: ProtocolConfig,
    /// Bytes per framer push; 0 pushes the whole input at once
    pub chunk_size: usize,
}

impl HarnessConfig {
    /// Parse and validate a TOML configuration
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the codec cannot honor
    pub fn validate(&self) -> Result<()> {
        let version = self.protocol.version;
        if version > ProtocolVersion::CURRENT {
            return Err(HarnessError::UnsupportedVersion {
                major: version.major,
                minor: version.minor,
            });
        }
        Ok(())
    }

    /// Chunk size for splitting `input_len` bytes, never zero
    pub fn effective_chunk_size(&self, input_len: usize) -> usize {
        match self.chunk_size {
            0 => input_len.max(1),
            n => n,
        }
    }
}
