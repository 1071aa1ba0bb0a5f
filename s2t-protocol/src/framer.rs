//! Stream framer
//!
//! Turns an arbitrarily chunked byte stream into candidate frames. Bytes are
//! accumulated in a fixed-capacity buffer; whenever the front of the buffer
//! cannot start a valid header, exactly one byte is discarded and the search
//! restarts. A spurious magic inside garbage is therefore rejected one byte
//! at a time and can never swallow a real frame that follows it.
//!
//! Only header-valid, length-complete frames reach the sink. The payload
//! checksum is left to [`crate::packet::validate_packet`].

use heapless::Vec;

use crate::contract::{HEADER_SIZE, MAX_FRAME_SIZE, PROTO_MAGIC};
use crate::header::{parse_and_validate_header_with, HeaderError};
use crate::version::ProtocolConfig;

/// Magic as it appears on the wire
const MAGIC_BYTES: [u8; 2] = PROTO_MAGIC.to_le_bytes();

/// Receiver of complete candidate frames
///
/// Called synchronously from inside [`Framer::push`]. The slice is only valid
/// for the duration of the call; copy it out if it must outlive the push.
pub trait FrameSink {
    fn on_frame(&mut self, frame: &[u8]);
}

impl<F: FnMut(&[u8])> FrameSink for F {
    fn on_frame(&mut self, frame: &[u8]) {
        self(frame)
    }
}

/// Where the framer is in the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FramerState {
    /// Looking for the magic at the front of the buffer
    Seeking,
    /// Magic found, fewer than 14 bytes buffered
    AwaitingHeader,
    /// Header valid, waiting for the rest of the frame
    AwaitingFrame { frame_len: usize },
}

/// Snapshot of framer counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FramerStats {
    /// Bytes discarded while resynchronizing
    pub sync_loss_count: u32,
    /// Frames handed to the sink
    pub frames_found_count: u32,
}

/// Why a byte was dropped from the front of the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(not(feature = "defmt"), allow(dead_code))] // only read by trace logging
enum DiscardReason {
    /// Front bytes are not the magic
    NoMagic,
    /// Magic matched but the header is invalid
    InvalidHeader(HeaderError),
    /// Declared frame would not fit the buffer
    Oversize,
    /// Buffer full with input still pending
    Overflow,
}

/// Outcome of examining the buffer front once
enum Step {
    Discard(DiscardReason),
    Emit { frame_len: usize },
    NeedMore(FramerState),
}

/// Incremental frame extractor for one byte stream
///
/// One instance per stream; it holds no global state. The sink passed to
/// [`Framer::push`] must not push into the same framer (the `&mut self`
/// borrow already rules this out in safe code).
#[derive(Debug, Clone)]
pub struct Framer {
    buffer: Vec<u8, MAX_FRAME_SIZE>,
    state: FramerState,
    config: ProtocolConfig,
    sync_loss_count: u32,
    frames_found_count: u32,
}

impl Default for Framer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framer {
    /// Create a framer using the default protocol configuration
    pub fn new() -> Self {
        Self::with_config(ProtocolConfig::default())
    }

    /// Create a framer that validates headers against `config`
    pub fn with_config(config: ProtocolConfig) -> Self {
        Self {
            buffer: Vec::new(),
            state: FramerState::Seeking,
            config,
            sync_loss_count: 0,
            frames_found_count: 0,
        }
    }

    /// Drop buffered bytes and zero the counters
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.state = FramerState::Seeking;
        self.sync_loss_count = 0;
        self.frames_found_count = 0;
    }

    /// Feed bytes from the stream
    ///
    /// Calls `sink` once for every complete frame found, in stream order,
    /// and returns how many that was. Returns once all of `data` has been
    /// buffered and nothing more can be done without further input.
    pub fn push<S: FrameSink + ?Sized>(&mut self, data: &[u8], sink: &mut S) -> usize {
        let mut input = data;
        let mut emitted = 0;

        loop {
            emitted += self.drain(sink);

            if input.is_empty() {
                return emitted;
            }

            // Unreachable after a full drain, but never block on a full buffer
            if self.buffer.is_full() {
                self.discard_one(DiscardReason::Overflow);
                continue;
            }

            let room = self.buffer.capacity() - self.buffer.len();
            let (head, rest) = input.split_at(room.min(input.len()));
            // Fits: head is no longer than the free space
            let _ = self.buffer.extend_from_slice(head);
            input = rest;
        }
    }

    /// State reached at the end of the last push
    pub fn state(&self) -> FramerState {
        self.state
    }

    /// Protocol configuration used for header checks
    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// Bytes currently held waiting for more input
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Bytes discarded while resynchronizing
    pub fn sync_loss_count(&self) -> u32 {
        self.sync_loss_count
    }

    /// Frames handed to a sink since creation or the last reset
    pub fn frames_found_count(&self) -> u32 {
        self.frames_found_count
    }

    pub fn stats(&self) -> FramerStats {
        FramerStats {
            sync_loss_count: self.sync_loss_count,
            frames_found_count: self.frames_found_count,
        }
    }

    /// Process buffered bytes until more input is required
    fn drain<S: FrameSink + ?Sized>(&mut self, sink: &mut S) -> usize {
        let mut emitted = 0;
        loop {
            match self.step() {
                Step::Discard(reason) => {
                    self.state = FramerState::Seeking;
                    self.discard_one(reason);
                }
                Step::Emit { frame_len } => {
                    #[cfg(feature = "defmt")]
                    defmt::trace!("framer: frame of {} bytes", frame_len);

                    sink.on_frame(&self.buffer[..frame_len]);
                    self.frames_found_count = self.frames_found_count.saturating_add(1);
                    emitted += 1;
                    self.consume(frame_len);
                }
                Step::NeedMore(state) => {
                    self.state = state;
                    return emitted;
                }
            }
        }
    }

    /// Decide what to do with the front of the buffer
    fn step(&self) -> Step {
        let buffered = self.buffer.len();

        if buffered == 0 {
            return Step::NeedMore(FramerState::Seeking);
        }

        // A lone byte that cannot begin the magic will never be part of a frame
        if buffered < MAGIC_BYTES.len() {
            if self.buffer[0] != MAGIC_BYTES[0] {
                return Step::Discard(DiscardReason::NoMagic);
            }
            return Step::NeedMore(FramerState::Seeking);
        }

        if self.buffer[..MAGIC_BYTES.len()] != MAGIC_BYTES {
            return Step::Discard(DiscardReason::NoMagic);
        }

        if buffered < HEADER_SIZE {
            return Step::NeedMore(FramerState::AwaitingHeader);
        }

        let header = match parse_and_validate_header_with(&self.buffer, &self.config) {
            Ok(header) => header,
            Err(e) => return Step::Discard(DiscardReason::InvalidHeader(e)),
        };

        let frame_len = header.frame_len();
        if frame_len > self.buffer.capacity() {
            return Step::Discard(DiscardReason::Oversize);
        }

        if buffered < frame_len {
            return Step::NeedMore(FramerState::AwaitingFrame { frame_len });
        }

        Step::Emit { frame_len }
    }

    /// Drop the first buffered byte and count it as a sync loss
    fn discard_one(&mut self, reason: DiscardReason) {
        if self.buffer.is_empty() {
            return;
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("framer: discard 1 byte ({})", reason);
        #[cfg(not(feature = "defmt"))]
        let _ = reason;

        self.consume(1);
        self.sync_loss_count = self.sync_loss_count.saturating_add(1);
    }

    /// Remove `n` bytes from the front, keeping the remainder
    fn consume(&mut self, n: usize) {
        let remaining = self.buffer.len() - n;
        self.buffer.copy_within(n.., 0);
        self.buffer.truncate(remaining);
    }
}
