//! Outcome counters for a harness run

use core::fmt;

use s2t_protocol::PacketError;

/// Invalid packets broken down by rejection reason
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RejectionCounts {
    pub too_short: u32,
    pub header_invalid: u32,
    pub length_mismatch: u32,
    pub payload_crc_mismatch: u32,
}

impl RejectionCounts {
    /// Count one rejection
    pub fn record(&mut self, error: &PacketError) {
        let counter = match error {
            PacketError::TooShort { .. } => &mut self.too_short,
            PacketError::Header(_) => &mut self.header_invalid,
            PacketError::LengthMismatch { .. } => &mut self.length_mismatch,
            PacketError::PayloadCrcMismatch { .. } => &mut self.payload_crc_mismatch,
        };
        *counter = counter.saturating_add(1);
    }

    pub fn total(&self) -> u32 {
        self.too_short
            .saturating_add(self.header_invalid)
            .saturating_add(self.length_mismatch)
            .saturating_add(self.payload_crc_mismatch)
    }
}

/// Totals for everything the harness has seen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProtocolTestStats {
    /// Frames the framer isolated
    pub frames_extracted: u32,
    /// Frames that passed full packet validation
    pub packets_valid: u32,
    /// Frames rejected by packet validation
    pub packets_invalid: u32,
    /// Bytes the framer discarded while resynchronizing
    pub sync_losses: u32,
    /// Why invalid packets were rejected
    pub rejections: RejectionCounts,
}

impl ProtocolTestStats {
    /// Record the validation outcome of one extracted frame
    pub fn record(&mut self, outcome: Result<(), PacketError>) {
        self.frames_extracted = self.frames_extracted.saturating_add(1);
        match outcome {
            Ok(()) => self.packets_valid = self.packets_valid.saturating_add(1),
            Err(e) => {
                self.packets_invalid = self.packets_invalid.saturating_add(1);
                self.rejections.record(&e);
            }
        }
    }
}

impl fmt::Display for ProtocolTestStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frames={} valid={} invalid={} (short={} header={} length={} crc={}) sync_losses={}",
            self.frames_extracted,
            self.packets_valid,
            self.packets_invalid,
            self.rejections.too_short,
            self.rejections.header_invalid,
            self.rejections.length_mismatch,
            self.rejections.payload_crc_mismatch,
            self.sync_losses,
        )
    }
}
