//! Command identifiers and error codes
//!
//! The framing layer carries `command_id` as a raw byte; the meaning belongs
//! to the application. These enumerations are the one shared vocabulary both
//! ends of the link use, so every component speaking the protocol agrees on
//! the numeric values.

use crate::payload::PayloadError;

/// Known command identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CommandId {
    // Link control
    Ping = 0x01,
    Pong = 0x02,
    Error = 0x03,
    Ack = 0x04,

    // LED
    LedSet = 0x10,
    LedBlink = 0x11,
    LedPattern = 0x12,

    // Sensors
    SensorRead = 0x20,
    SensorData = 0x21,
    SensorConfig = 0x22,

    // Rotary encoder
    EncoderRead = 0x30,
    EncoderData = 0x31,
    EncoderReset = 0x32,

    // OLED display
    OledClear = 0x40,
    OledText = 0x41,
    OledPixel = 0x42,
    OledLine = 0x43,
    OledRect = 0x44,
    OledBitmap = 0x45,

    // Generic data
    DataU8 = 0x50,
    DataI16 = 0x51,
    DataI32 = 0x52,
    DataF32 = 0x53,
    DataString = 0x54,
    DataArray = 0x55,
}

impl CommandId {
    /// Parse a command from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        use CommandId::*;
        let cmd = match byte {
            0x01 => Ping,
            0x02 => Pong,
            0x03 => Error,
            0x04 => Ack,
            0x10 => LedSet,
            0x11 => LedBlink,
            0x12 => LedPattern,
            0x20 => SensorRead,
            0x21 => SensorData,
            0x22 => SensorConfig,
            0x30 => EncoderRead,
            0x31 => EncoderData,
            0x32 => EncoderReset,
            0x40 => OledClear,
            0x41 => OledText,
            0x42 => OledPixel,
            0x43 => OledLine,
            0x44 => OledRect,
            0x45 => OledBitmap,
            0x50 => DataU8,
            0x51 => DataI16,
            0x52 => DataI32,
            0x53 => DataF32,
            0x54 => DataString,
            0x55 => DataArray,
            _ => return None,
        };
        Some(cmd)
    }

    /// Convert to wire byte
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Returns true for the link-control commands (ping/pong/ack/error)
    pub fn is_link_control(&self) -> bool {
        matches!(
            self,
            CommandId::Ping | CommandId::Pong | CommandId::Error | CommandId::Ack
        )
    }
}

impl From<CommandId> for u8 {
    fn from(cmd: CommandId) -> u8 {
        cmd.to_byte()
    }
}

/// Error codes carried as the single payload byte of an `Error` frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ErrorCode {
    Ok = 0x00,
    InvalidCommand = 0x01,
    InvalidCrc = 0x02,
    Timeout = 0x03,
    BufferOverflow = 0x04,
    InvalidParam = 0x05,
    NotReady = 0x06,
}

impl ErrorCode {
    /// Parse an error code from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(ErrorCode::Ok),
            0x01 => Some(ErrorCode::InvalidCommand),
            0x02 => Some(ErrorCode::InvalidCrc),
            0x03 => Some(ErrorCode::Timeout),
            0x04 => Some(ErrorCode::BufferOverflow),
            0x05 => Some(ErrorCode::InvalidParam),
            0x06 => Some(ErrorCode::NotReady),
            _ => None,
        }
    }

    /// Convert to wire byte
    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

impl From<ErrorCode> for u8 {
    fn from(code: ErrorCode) -> u8 {
        code.to_byte()
    }
}

/// Payload decode failures are answered with a NACK, not treated as link faults
impl From<PayloadError> for ErrorCode {
    fn from(e: PayloadError) -> Self {
        match e {
            PayloadError::BufferFull => ErrorCode::BufferOverflow,
            PayloadError::InsufficientData
            | PayloadError::StringTooLong
            | PayloadError::InvalidUtf8 => ErrorCode::InvalidParam,
        }
    }
}
