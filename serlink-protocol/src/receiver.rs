//! Byte-at-a-time frame receiver.
//!
//! The receiver is fed one byte at a time together with the current clock
//! reading. It hunts for [`FRAME_START`], then walks through the header,
//! payload and checksum. Three conditions silently drop the frame in
//! progress and send the receiver back to hunting for a start byte:
//!
//! - the declared length exceeds [`MAX_PAYLOAD_SIZE`]
//! - the checksum does not match
//! - more than the configured timeout has elapsed since the start byte
//!
//! None of these are reported to the caller; they look exactly like "no
//! frame yet". They are counted in [`RxStats`] for diagnostics.

use heapless::Vec;

use crate::config::LinkConfig;
use crate::frame::{frame_checksum, Frame, FRAME_START, MAX_PAYLOAD_SIZE};

/// Where the receiver is within a frame
///
/// Each phase holds only the header fields already received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Discarding bytes until a START byte
    AwaitingSync,
    /// Got START, waiting for COMMAND
    AwaitingCommand,
    /// Waiting for the high byte of LENGTH
    AwaitingLengthHigh { command_id: u8 },
    /// Waiting for the low byte of LENGTH
    AwaitingLengthLow { command_id: u8, length_high: u8 },
    /// Reading `length` payload bytes into the scratch buffer
    AwaitingPayload { command_id: u8, length: u16 },
    /// Waiting for the high byte of CRC
    AwaitingChecksumHigh { command_id: u8 },
    /// Waiting for the low byte of CRC
    AwaitingChecksumLow { command_id: u8, checksum_high: u8 },
}

/// Why a frame in progress was thrown away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Discard {
    /// Declared length above the maximum payload size
    Oversize,
    /// Checksum mismatch
    Checksum,
    /// Frame did not complete in time
    Timeout,
}

/// Receive counters
///
/// All counters wrap on overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxStats {
    /// Frames delivered
    pub frames: u32,
    /// Frames dropped for a bad checksum
    pub checksum_errors: u32,
    /// Frames dropped for an oversized length field
    pub oversize: u32,
    /// Partial frames dropped on timeout
    pub timeouts: u32,
}

impl RxStats {
    /// Total frames dropped for any reason
    pub fn discarded(&self) -> u32 {
        self.checksum_errors
            .wrapping_add(self.oversize)
            .wrapping_add(self.timeouts)
    }

    fn record(&mut self, reason: Discard) {
        let counter = match reason {
            Discard::Oversize => &mut self.oversize,
            Discard::Checksum => &mut self.checksum_errors,
            Discard::Timeout => &mut self.timeouts,
        };
        *counter = counter.wrapping_add(1);
    }
}

/// State machine assembling frames from a byte stream
///
/// One receiver belongs to one transport. It holds a scratch payload buffer
/// sized to the maximum payload, so its footprint is fixed.
#[derive(Debug, Clone)]
pub struct FrameReceiver {
    phase: Phase,
    scratch: Vec<u8, MAX_PAYLOAD_SIZE>,
    started_at_ms: u32,
    timeout_ms: u32,
    stats: RxStats,
}

impl Default for FrameReceiver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameReceiver {
    /// Create a receiver with the default timeout
    pub fn new() -> Self {
        Self::with_config(&LinkConfig::default())
    }

    /// Create a receiver from a link configuration
    pub fn with_config(config: &LinkConfig) -> Self {
        Self {
            phase: Phase::AwaitingSync,
            scratch: Vec::new(),
            started_at_ms: 0,
            timeout_ms: config.timeout_ms,
            stats: RxStats::default(),
        }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns true if no frame is in progress
    pub fn is_idle(&self) -> bool {
        self.phase == Phase::AwaitingSync
    }

    /// Number of payload bytes received for the frame in progress
    pub fn bytes_in_payload(&self) -> usize {
        self.scratch.len()
    }

    /// Receive counters
    pub fn stats(&self) -> RxStats {
        self.stats
    }

    /// Clear the receive counters
    pub fn reset_stats(&mut self) {
        self.stats = RxStats::default();
    }

    /// Abandon any frame in progress
    pub fn reset(&mut self) {
        self.phase = Phase::AwaitingSync;
        self.scratch.clear();
    }

    fn discard(&mut self, reason: Discard) {
        debug!("Frame discarded: {:?}", reason);
        self.stats.record(reason);
        self.reset();
    }

    /// Feed a single byte received at `now_ms`
    ///
    /// Returns `Some(frame)` when this byte completes a valid frame, `None`
    /// otherwise (including when a frame was silently discarded).
    pub fn feed(&mut self, byte: u8, now_ms: u32) -> Option<Frame> {
        // A stale partial frame is dropped and this byte is read afresh,
        // so it can still start the next frame
        if !self.is_idle() && now_ms.wrapping_sub(self.started_at_ms) > self.timeout_ms {
            self.discard(Discard::Timeout);
        }

        match self.phase {
            Phase::AwaitingSync => {
                if byte == FRAME_START {
                    self.scratch.clear();
                    self.started_at_ms = now_ms;
                    self.phase = Phase::AwaitingCommand;
                }
                // Everything else is line noise
                None
            }
            Phase::AwaitingCommand => {
                self.phase = Phase::AwaitingLengthHigh { command_id: byte };
                None
            }
            Phase::AwaitingLengthHigh { command_id } => {
                self.phase = Phase::AwaitingLengthLow {
                    command_id,
                    length_high: byte,
                };
                None
            }
            Phase::AwaitingLengthLow {
                command_id,
                length_high,
            } => {
                let length = u16::from_be_bytes([length_high, byte]);
                if length as usize > MAX_PAYLOAD_SIZE {
                    self.discard(Discard::Oversize);
                } else if length == 0 {
                    self.phase = Phase::AwaitingChecksumHigh { command_id };
                } else {
                    self.phase = Phase::AwaitingPayload { command_id, length };
                }
                None
            }
            Phase::AwaitingPayload { command_id, length } => {
                // Cannot overflow: length was bounded by MAX_PAYLOAD_SIZE
                let _ = self.scratch.push(byte);
                if self.scratch.len() >= length as usize {
                    self.phase = Phase::AwaitingChecksumHigh { command_id };
                }
                None
            }
            Phase::AwaitingChecksumHigh { command_id } => {
                self.phase = Phase::AwaitingChecksumLow {
                    command_id,
                    checksum_high: byte,
                };
                None
            }
            Phase::AwaitingChecksumLow {
                command_id,
                checksum_high,
            } => {
                let received = u16::from_be_bytes([checksum_high, byte]);
                if received != frame_checksum(command_id, &self.scratch) {
                    self.discard(Discard::Checksum);
                    return None;
                }

                let frame = Frame {
                    command_id,
                    payload: core::mem::take(&mut self.scratch),
                };
                self.phase = Phase::AwaitingSync;
                self.stats.frames = self.stats.frames.wrapping_add(1);
                Some(frame)
            }
        }
    }

    /// Feed bytes until one frame completes
    ///
    /// Returns the frame, if any, and how many bytes were consumed. Bytes
    /// after a completed frame are left for the next call.
    pub fn feed_bytes(&mut self, bytes: &[u8], now_ms: u32) -> (Option<Frame>, usize) {
        for (i, &byte) in bytes.iter().enumerate() {
            if let Some(frame) = self.feed(byte, now_ms) {
                return (Some(frame), i + 1);
            }
        }
        (None, bytes.len())
    }
}
