//! A framed link over one serial transport.
//!
//! [`Link`] owns the transport, the clock and the [`FrameReceiver`] for that
//! transport. The application calls the `send*` methods whenever it has
//! something to say and [`Link::poll`] once per iteration of its main loop:
//!
//! ```ignore
//! let mut link = Link::new(uart, clock);
//! loop {
//!     if let Some(frame) = link.poll() {
//!         match frame.command() {
//!             Some(CommandId::Ping) => link.send_command(CommandId::Pong)?,
//!             Some(_) => dispatch(&mut link, &frame)?,
//!             None => link.send_error(ErrorCode::InvalidCommand)?,
//!         }
//!     }
//!     // other cooperative work
//! }
//! ```
//!
//! Sending is fire-and-forget. There is no retransmission; a caller that
//! expects a reply and does not get one decides for itself what to do.

use serlink_hal::{Clock, SerialRx, SerialTx};

use crate::command::{CommandId, ErrorCode};
use crate::config::LinkConfig;
use crate::frame::{encode_parts, Frame, FrameError, MAX_FRAME_SIZE};
use crate::receiver::{FrameReceiver, RxStats};

/// Errors from sending a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError<E> {
    /// Payload exceeds the maximum; nothing was written
    PayloadTooLarge,
    /// Transport write or flush failed
    Transport(E),
}

/// Link counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStats {
    /// Frames written to the transport
    pub frames_sent: u32,
    /// Receive-side counters
    pub rx: RxStats,
}

/// Framed link over a serial transport
pub struct Link<T, C> {
    transport: T,
    clock: C,
    receiver: FrameReceiver,
    frames_sent: u32,
}

impl<T, C> Link<T, C> {
    /// Create a link with the default configuration
    pub fn new(transport: T, clock: C) -> Self {
        Self::with_config(transport, clock, &LinkConfig::default())
    }

    /// Create a link with an explicit configuration
    pub fn with_config(transport: T, clock: C, config: &LinkConfig) -> Self {
        Self {
            transport,
            clock,
            receiver: FrameReceiver::with_config(config),
            frames_sent: 0,
        }
    }

    /// The receive state machine
    pub fn receiver(&self) -> &FrameReceiver {
        &self.receiver
    }

    /// Access the transport
    pub fn transport(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Send and receive counters
    pub fn stats(&self) -> LinkStats {
        LinkStats {
            frames_sent: self.frames_sent,
            rx: self.receiver.stats(),
        }
    }

    /// Release the transport and clock
    pub fn into_parts(self) -> (T, C) {
        (self.transport, self.clock)
    }
}

impl<T: SerialTx, C> Link<T, C> {
    /// Send one frame
    ///
    /// Writes `START ‖ command ‖ length ‖ payload ‖ crc` in a single write
    /// followed by a flush. A payload over the maximum fails before anything
    /// is written, so a partial frame never reaches the wire.
    pub fn send(
        &mut self,
        command_id: impl Into<u8>,
        payload: &[u8],
    ) -> Result<(), LinkError<T::Error>> {
        let command_id = command_id.into();
        let mut buf = [0u8; MAX_FRAME_SIZE];
        let len = encode_parts(command_id, payload, &mut buf).map_err(|e| match e {
            FrameError::PayloadTooLarge | FrameError::BufferTooSmall => {
                LinkError::PayloadTooLarge
            }
        })?;

        self.transport
            .write_blocking(&buf[..len])
            .map_err(LinkError::Transport)?;
        self.transport.flush().map_err(LinkError::Transport)?;

        self.frames_sent = self.frames_sent.wrapping_add(1);
        trace!("TX: cmd={=u8:#x} len={}", command_id, payload.len());
        Ok(())
    }

    /// Send an already-built frame
    pub fn send_frame(&mut self, frame: &Frame) -> Result<(), LinkError<T::Error>> {
        self.send(frame.command_id, &frame.payload)
    }

    /// Send a command with no payload
    pub fn send_command(&mut self, command_id: impl Into<u8>) -> Result<(), LinkError<T::Error>> {
        self.send(command_id, &[])
    }

    /// Acknowledge the last command
    pub fn send_ack(&mut self) -> Result<(), LinkError<T::Error>> {
        self.send_command(CommandId::Ack)
    }

    /// Reject the last command with an error code
    pub fn send_error(&mut self, code: ErrorCode) -> Result<(), LinkError<T::Error>> {
        self.send(CommandId::Error, &[code.to_byte()])
    }
}

impl<T: SerialRx, C: Clock> Link<T, C> {
    /// Process the bytes the transport already holds
    ///
    /// Never blocks. Returns at most one frame; any bytes after it stay in
    /// the transport for the next call. `None` covers "not enough bytes
    /// yet" as well as frames that were dropped as corrupt or late.
    pub fn poll(&mut self) -> Option<Frame> {
        while self.transport.bytes_available() > 0 {
            let byte = match self.transport.read_byte() {
                Ok(byte) => byte,
                Err(_) => {
                    warn!("Serial read error");
                    return None;
                }
            };

            if let Some(frame) = self.receiver.feed(byte, self.clock.now_ms()) {
                trace!("RX: cmd={=u8:#x} len={}", frame.command_id, frame.payload.len());
                return Some(frame);
            }
        }
        None
    }

    /// Poll until a frame with `command_id` arrives or `window_ms` passes
    ///
    /// Spins on [`Link::poll`]. Frames with other commands that arrive in the
    /// meantime are dropped.
    pub fn wait_for(&mut self, command_id: impl Into<u8>, window_ms: u32) -> Option<Frame> {
        let command_id = command_id.into();
        let start = self.clock.now_ms();

        loop {
            if let Some(frame) = self.poll() {
                if frame.command_id == command_id {
                    return Some(frame);
                }
                debug!("Ignoring cmd={=u8:#x} while waiting", frame.command_id);
            }
            if self.clock.now_ms().wrapping_sub(start) >= window_ms {
                return None;
            }
        }
    }
}

impl<T: SerialTx + SerialRx, C: Clock> Link<T, C> {
    /// Send a PING and wait for the PONG
    ///
    /// Returns `Ok(true)` if the peer answered within `window_ms`.
    pub fn ping(&mut self, window_ms: u32) -> Result<bool, LinkError<<T as SerialTx>::Error>> {
        self.send_command(CommandId::Ping)?;
        Ok(self.wait_for(CommandId::Pong, window_ms).is_some())
    }
}
