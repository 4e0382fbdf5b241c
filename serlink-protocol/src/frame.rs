//! Frame model, encoding and one-shot decoding.
//!
//! Frame format:
//! - START (1 byte): 0xAA synchronization byte
//! - COMMAND (1 byte): command identifier
//! - LENGTH (2 bytes): payload length, big-endian (0-1024)
//! - PAYLOAD (0-1024 bytes): command-specific data
//! - CRC (2 bytes): CRC-16 of COMMAND, LENGTH and PAYLOAD, big-endian
//!
//! There is no byte stuffing. A 0xAA inside the payload is just data; the
//! length field, not a sentinel, marks where the payload ends.

use heapless::Vec;

use crate::command::{CommandId, ErrorCode};
use crate::crc::Crc16;
use crate::payload::PayloadParser;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0xAA;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 1024;

/// START + COMMAND + LENGTH
pub const HEADER_SIZE: usize = 4;

/// CRC
pub const FOOTER_SIZE: usize = 2;

/// Smallest possible frame (empty payload)
pub const MIN_FRAME_SIZE: usize = HEADER_SIZE + FOOTER_SIZE;

/// Maximum complete frame size
pub const MAX_FRAME_SIZE: usize = HEADER_SIZE + MAX_PAYLOAD_SIZE + FOOTER_SIZE;

/// Errors that can occur while building or encoding a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// A complete frame
///
/// Frames handed out by the receiver have always passed checksum
/// verification; corrupt input never becomes a `Frame`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Command identifier (see [`CommandId`] for the known values)
    pub command_id: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

/// Checksum over `command ‖ length_hi ‖ length_lo ‖ payload`
pub(crate) fn frame_checksum(command_id: u8, payload: &[u8]) -> u16 {
    let mut crc = Crc16::new();
    crc.update_byte(command_id);
    crc.update(&(payload.len() as u16).to_be_bytes());
    crc.update(payload);
    crc.finish()
}

impl Frame {
    /// Create a new frame with the given command and payload
    pub fn new(command_id: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self {
            command_id,
            payload: payload_vec,
        })
    }

    /// Create a frame with no payload
    pub fn empty(command_id: u8) -> Self {
        Self {
            command_id,
            payload: Vec::new(),
        }
    }

    /// The command as a known identifier, if it is one
    pub fn command(&self) -> Option<CommandId> {
        CommandId::from_byte(self.command_id)
    }

    /// Error code carried by an `Error` frame
    pub fn error_code(&self) -> Option<ErrorCode> {
        if self.command_id != CommandId::Error.to_byte() {
            return None;
        }
        self.payload.first().copied().and_then(ErrorCode::from_byte)
    }

    /// Checksum as it appears on the wire
    pub fn checksum(&self) -> u16 {
        frame_checksum(self.command_id, &self.payload)
    }

    /// Parser positioned at the start of the payload
    pub fn parser(&self) -> PayloadParser<'_> {
        PayloadParser::new(&self.payload)
    }

    /// Size of this frame on the wire
    pub fn encoded_len(&self) -> usize {
        MIN_FRAME_SIZE + self.payload.len()
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        encode_parts(self.command_id, &self.payload, buffer)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Vec<u8, MAX_FRAME_SIZE> {
        let mut vec = Vec::new();
        // Payload is bounded by MAX_PAYLOAD_SIZE so the frame always fits
        let _ = vec.resize_default(self.encoded_len());
        let _ = self.encode(&mut vec);
        vec
    }

    /// Decode a buffer that begins with one complete frame
    ///
    /// Returns `None` if the buffer is short, does not start with
    /// [`FRAME_START`], declares an oversized payload, or fails the checksum.
    /// Bytes after the frame are ignored.
    pub fn decode(data: &[u8]) -> Option<Self> {
        if data.len() < MIN_FRAME_SIZE || data[0] != FRAME_START {
            return None;
        }

        let command_id = data[1];
        let length = u16::from_be_bytes([data[2], data[3]]) as usize;
        if length > MAX_PAYLOAD_SIZE || data.len() < MIN_FRAME_SIZE + length {
            return None;
        }

        let payload = &data[HEADER_SIZE..HEADER_SIZE + length];
        let crc_at = HEADER_SIZE + length;
        let received = u16::from_be_bytes([data[crc_at], data[crc_at + 1]]);
        if received != frame_checksum(command_id, payload) {
            return None;
        }

        Self::new(command_id, payload).ok()
    }
}

/// Encode a frame from its parts without building a [`Frame`] first
pub fn encode_parts(
    command_id: u8,
    payload: &[u8],
    buffer: &mut [u8],
) -> Result<usize, FrameError> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(FrameError::PayloadTooLarge);
    }
    let frame_len = MIN_FRAME_SIZE + payload.len();
    if buffer.len() < frame_len {
        return Err(FrameError::BufferTooSmall);
    }

    let length = payload.len() as u16;
    let crc = frame_checksum(command_id, payload);

    buffer[0] = FRAME_START;
    buffer[1] = command_id;
    buffer[2..4].copy_from_slice(&length.to_be_bytes());
    buffer[HEADER_SIZE..HEADER_SIZE + payload.len()].copy_from_slice(payload);
    buffer[HEADER_SIZE + payload.len()..frame_len].copy_from_slice(&crc.to_be_bytes());

    Ok(frame_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_encode_ping() {
        let frame = Frame::empty(CommandId::Ping.to_byte());
        let mut buffer = [0u8; 10];
        let len = frame.encode(&mut buffer).unwrap();

        assert_eq!(len, 6);
        assert_eq!(&buffer[..6], &[0xAA, 0x01, 0x00, 0x00, 0xFB, 0xAC]);
    }

    #[test]
    fn test_frame_encode_with_payload() {
        // LED_BLINK for 500 ms
        let frame = Frame::new(0x11, &[0x01, 0xF4]).unwrap();
        let encoded = frame.encode_to_vec();

        assert_eq!(
            &encoded[..],
            &[0xAA, 0x11, 0x00, 0x02, 0x01, 0xF4, 0x4D, 0xCD]
        );
        assert_eq!(frame.checksum(), 0x4DCD);
    }

    #[test]
    fn test_start_byte_in_payload_needs_no_escaping() {
        let frame = Frame::new(0x50, &[FRAME_START, FRAME_START]).unwrap();
        let encoded = frame.encode_to_vec();
        assert_eq!(encoded.len(), 8);
        assert_eq!(Frame::decode(&encoded), Some(frame));
    }

    #[test]
    fn test_frame_roundtrip_max_payload() {
        let payload = [0x5Au8; MAX_PAYLOAD_SIZE];
        let original = Frame::new(0x55, &payload).unwrap();
        let encoded = original.encode_to_vec();
        assert_eq!(encoded.len(), MAX_FRAME_SIZE);
        assert_eq!(Frame::decode(&encoded), Some(original));
    }

    #[test]
    fn test_payload_too_large() {
        let large_payload = [0u8; MAX_PAYLOAD_SIZE + 1];
        assert_eq!(
            Frame::new(0x21, &large_payload),
            Err(FrameError::PayloadTooLarge)
        );
        let mut buffer = [0u8; MAX_FRAME_SIZE + 1];
        assert_eq!(
            encode_parts(0x21, &large_payload, &mut buffer),
            Err(FrameError::PayloadTooLarge)
        );
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let frame = Frame::new(0x21, &[1, 2, 3]).unwrap();
        let mut buffer = [0u8; 8];
        assert_eq!(frame.encode(&mut buffer), Err(FrameError::BufferTooSmall));
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        let good = Frame::new(0x21, &[7, 8]).unwrap().encode_to_vec();

        assert!(Frame::decode(&good[..good.len() - 1]).is_none());

        let mut bad_start = good.clone();
        bad_start[0] = 0x55;
        assert!(Frame::decode(&bad_start).is_none());

        let mut bad_crc = good.clone();
        let last = bad_crc.len() - 1;
        bad_crc[last] ^= 0x01;
        assert!(Frame::decode(&bad_crc).is_none());

        let oversize = [0xAA, 0x01, 0x04, 0x01, 0x00, 0x00];
        assert!(Frame::decode(&oversize).is_none());
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let mut data = Frame::empty(0x04).encode_to_vec();
        data.extend_from_slice(&[0xAA, 0x00]).unwrap();
        assert_eq!(Frame::decode(&data), Some(Frame::empty(0x04)));
    }

    #[test]
    fn test_error_code_accessor() {
        let nack = Frame::new(CommandId::Error.to_byte(), &[0x05]).unwrap();
        assert_eq!(nack.command(), Some(CommandId::Error));
        assert_eq!(nack.error_code(), Some(ErrorCode::InvalidParam));

        let ack = Frame::empty(CommandId::Ack.to_byte());
        assert_eq!(ack.error_code(), None);
        assert_eq!(Frame::empty(CommandId::Error.to_byte()).error_code(), None);
    }

    #[test]
    fn test_payload_parser_view() {
        let frame = Frame::new(0x21, &[3, 0x00, 0x64]).unwrap();
        let mut parser = frame.parser();
        assert_eq!(parser.read_u8(), Ok(3));
        assert_eq!(parser.read_i16(), Ok(100));
    }
}
