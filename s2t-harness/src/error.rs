//! Error types for the protocol harness

use thiserror::Error;

/// Errors raised while setting up a harness run
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Configuration file is not valid TOML or has the wrong shape
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configured version is newer than this codec can encode
    #[error("unsupported protocol version {major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },
}

/// Result type alias using HarnessError
pub type Result<T> = std::result::Result<T, HarnessError>;
