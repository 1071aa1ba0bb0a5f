//! Protocol harness for the Brain <-> Spine codec
//!
//! Wires a [`Framer`] into packet validation and counts what comes out.
//! It is a consumer of the codec's public interface only; transports,
//! argument parsing and reporting belong to whoever drives it.

pub mod config;
pub mod error;
pub mod stats;

pub use config::HarnessConfig;
pub use error::{HarnessError, Result};
pub use stats::{ProtocolTestStats, RejectionCounts};

use s2t_protocol::{validate_packet_with, FrameSink, Framer, ProtocolConfig};

/// Validates each extracted frame and records the outcome
struct StatsSink<'a> {
    stats: &'a mut ProtocolTestStats,
    protocol: &'a ProtocolConfig,
}

impl FrameSink for StatsSink<'_> {
    fn on_frame(&mut self, frame: &[u8]) {
        let outcome = validate_packet_with(frame, self.protocol);

        #[cfg(feature = "defmt")]
        {
            if let Err(e) = &outcome {
                defmt::debug!("harness: rejected {} byte frame: {}", frame.len(), e);
            }
        }

        self.stats.record(outcome);
    }
}

/// Incremental harness over one byte stream
#[derive(Debug, Clone)]
pub struct Harness {
    framer: Framer,
    config: HarnessConfig,
    stats: ProtocolTestStats,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            framer: Framer::with_config(config.protocol),
            config,
            stats: ProtocolTestStats::default(),
        }
    }

    /// Feed stream bytes, split into pushes of the configured chunk size
    ///
    /// Returns the number of frames extracted by this call.
    pub fn feed(&mut self, bytes: &[u8]) -> usize {
        let chunk_size = self.config.effective_chunk_size(bytes.len());
        let mut extracted = 0;

        for chunk in bytes.chunks(chunk_size) {
            let mut sink = StatsSink {
                stats: &mut self.stats,
                protocol: &self.config.protocol,
            };
            extracted += self.framer.push(chunk, &mut sink);
        }

        self.stats.sync_losses = self.framer.sync_loss_count();
        extracted
    }

    /// Totals so far
    pub fn stats(&self) -> ProtocolTestStats {
        self.stats
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Bytes held by the framer waiting for more input
    pub fn pending_bytes(&self) -> usize {
        self.framer.buffered_len()
    }
}

/// Run a whole input through a fresh framer and validator
pub fn run_protocol_harness(input: &[u8], config: &HarnessConfig) -> ProtocolTestStats {
    let mut harness = Harness::new(*config);
    harness.feed(input);

    #[cfg(feature = "defmt")]
    defmt::info!("harness: {}", harness.stats());

    harness.stats()
}
