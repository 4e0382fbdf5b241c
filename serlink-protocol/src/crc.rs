//! CRC-16 checksum (polynomial 0x1021, initial value 0xFFFF, no reflection,
//! no final XOR), also known as CRC-16/CCITT-FALSE.
//!
//! Both ends of the link must compute this bit-for-bit identically; there is
//! no version negotiation on the wire.

const POLY: u16 = 0x1021;
const INIT: u16 = 0xFFFF;

/// Incremental CRC-16 over several byte runs
///
/// Lets the encoder and receiver checksum `command ‖ length ‖ payload`
/// without first copying them into one contiguous buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc16 {
    state: u16,
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc16 {
    /// Start a new checksum
    pub const fn new() -> Self {
        Self { state: INIT }
    }

    /// Feed a single byte
    pub fn update_byte(&mut self, byte: u8) {
        self.state ^= (byte as u16) << 8;
        for _ in 0..8 {
            if self.state & 0x8000 != 0 {
                self.state = (self.state << 1) ^ POLY;
            } else {
                self.state <<= 1;
            }
        }
    }

    /// Feed a run of bytes
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.update_byte(byte);
        }
    }

    /// Current checksum value
    pub fn finish(&self) -> u16 {
        self.state
    }
}

/// Compute the checksum of a byte span
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = Crc16::new();
    crc.update(data);
    crc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_returns_init() {
        assert_eq!(crc16(&[]), 0xFFFF);
    }

    #[test]
    fn test_check_vector() {
        // Standard check value for CRC-16/CCITT-FALSE
        assert_eq!(crc16(b"123456789"), 0x29B1);
    }

    #[test]
    fn test_ping_header_vector() {
        // CMD_PING with zero length
        assert_eq!(crc16(&[0x01, 0x00, 0x00]), 0xFBAC);
    }

    #[test]
    fn test_incremental_matches_one_shot() {
        let data = [0x11, 0x00, 0x02, 0x01, 0xF4];
        let mut crc = Crc16::new();
        crc.update(&data[..1]);
        crc.update(&data[1..3]);
        crc.update_byte(data[3]);
        crc.update(&data[4..]);
        assert_eq!(crc.finish(), crc16(&data));
        assert_eq!(crc.finish(), 0x4DCD);
    }

    #[test]
    fn test_deterministic() {
        let data = [0xAA; 32];
        assert_eq!(crc16(&data), crc16(&data));
    }
}
