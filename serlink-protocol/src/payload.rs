//! Typed payload encoding and decoding
//!
//! Payloads are opaque to the framing layer. Applications give them structure
//! with [`PayloadBuilder`] and [`PayloadParser`], which agree on these
//! encodings (all multi-byte values big-endian):
//!
//! | Shape   | Bytes                                        |
//! |---------|----------------------------------------------|
//! | `u8`    | 1                                            |
//! | `i16`   | 2                                            |
//! | `u16`   | 2                                            |
//! | `i32`   | 4                                            |
//! | `f32`   | 4, IEEE-754 bit pattern sent as an `i32`     |
//! | string  | 1 length byte (0-255) followed by that many  |
//! | bytes   | raw, length tracked by the caller            |
//!
//! Every operation is all-or-nothing: on failure the cursor does not move
//! and the buffer is not touched.

/// Payload encode/decode errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PayloadError {
    /// Not enough capacity left in the output buffer
    BufferFull,
    /// Not enough bytes left in the input
    InsufficientData,
    /// String does not fit the one-byte length prefix or the caller's limit
    StringTooLong,
    /// String bytes are not valid UTF-8
    InvalidUtf8,
}

/// Appends typed values to a caller-owned buffer
///
/// Capacity is the length of the borrowed slice and never changes.
#[derive(Debug)]
pub struct PayloadBuilder<'a> {
    buffer: &'a mut [u8],
    position: usize,
}

impl<'a> PayloadBuilder<'a> {
    /// Create a builder writing from the start of `buffer`
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Rewind to the start without clearing; later writes overwrite old bytes
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Number of bytes written so far
    pub fn len(&self) -> usize {
        self.position
    }

    /// Returns true if nothing has been written
    pub fn is_empty(&self) -> bool {
        self.position == 0
    }

    /// Total capacity of the underlying buffer
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Bytes still available for writing
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    /// The encoded payload so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..self.position]
    }

    /// Reserve `n` bytes and return them for writing, or fail untouched
    fn claim(&mut self, n: usize) -> Result<&mut [u8], PayloadError> {
        if n > self.remaining() {
            return Err(PayloadError::BufferFull);
        }
        let start = self.position;
        self.position += n;
        Ok(&mut self.buffer[start..start + n])
    }

    pub fn add_u8(&mut self, value: u8) -> Result<(), PayloadError> {
        self.claim(1)?[0] = value;
        Ok(())
    }

    pub fn add_i16(&mut self, value: i16) -> Result<(), PayloadError> {
        self.claim(2)?.copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    pub fn add_u16(&mut self, value: u16) -> Result<(), PayloadError> {
        self.claim(2)?.copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    pub fn add_i32(&mut self, value: i32) -> Result<(), PayloadError> {
        self.claim(4)?.copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    /// Append a float as its raw bit pattern
    ///
    /// NaN payloads and signed zeros survive unchanged.
    pub fn add_f32(&mut self, value: f32) -> Result<(), PayloadError> {
        self.add_i32(value.to_bits() as i32)
    }

    /// Append a length-prefixed string
    ///
    /// Fails as a whole if the string is longer than 255 bytes or if the
    /// prefix plus the string does not fit the remaining capacity.
    pub fn add_str(&mut self, value: &str) -> Result<(), PayloadError> {
        let bytes = value.as_bytes();
        let len = u8::try_from(bytes.len()).map_err(|_| PayloadError::StringTooLong)?;
        let out = self.claim(1 + bytes.len())?;
        out[0] = len;
        out[1..].copy_from_slice(bytes);
        Ok(())
    }

    /// Append raw bytes with no length prefix
    pub fn add_bytes(&mut self, data: &[u8]) -> Result<(), PayloadError> {
        self.claim(data.len())?.copy_from_slice(data);
        Ok(())
    }
}

/// Reads typed values from a received payload
#[derive(Debug, Clone)]
pub struct PayloadParser<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> PayloadParser<'a> {
    /// Create a parser reading from the start of `buffer`
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Rewind to the start
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Current read offset
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    /// Returns true if unread bytes remain
    pub fn has_data(&self) -> bool {
        self.position < self.buffer.len()
    }

    /// Everything not yet consumed, without advancing
    pub fn rest(&self) -> &'a [u8] {
        &self.buffer[self.position..]
    }

    /// Take exactly `N` bytes, or fail without advancing
    fn take<const N: usize>(&mut self) -> Result<[u8; N], PayloadError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, PayloadError> {
        Ok(self.take::<1>()?[0])
    }

    pub fn read_i16(&mut self) -> Result<i16, PayloadError> {
        self.take().map(i16::from_be_bytes)
    }

    pub fn read_u16(&mut self) -> Result<u16, PayloadError> {
        self.take().map(u16::from_be_bytes)
    }

    pub fn read_i32(&mut self) -> Result<i32, PayloadError> {
        self.take().map(i32::from_be_bytes)
    }

    /// Read a float from its raw bit pattern
    pub fn read_f32(&mut self) -> Result<f32, PayloadError> {
        self.read_i32().map(|bits| f32::from_bits(bits as u32))
    }

    /// Read a length-prefixed string no longer than `max_len - 1` bytes
    ///
    /// `max_len` is the size of the caller's destination including room for
    /// a terminator, so an encoded length `>= max_len` is rejected. On any
    /// failure, including the length byte itself, the position is unchanged.
    pub fn read_str(&mut self, max_len: usize) -> Result<&'a str, PayloadError> {
        let start = self.position;
        let result = self.read_str_inner(max_len);
        if result.is_err() {
            self.position = start;
        }
        result
    }

    fn read_str_inner(&mut self, max_len: usize) -> Result<&'a str, PayloadError> {
        let len = self.read_u8()? as usize;
        if len >= max_len {
            return Err(PayloadError::StringTooLong);
        }
        let start = self.position;
        if len > self.remaining() {
            return Err(PayloadError::InsufficientData);
        }
        let text = core::str::from_utf8(&self.buffer[start..start + len])
            .map_err(|_| PayloadError::InvalidUtf8)?;
        self.position += len;
        Ok(text)
    }

    /// Borrow the next `len` raw bytes
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], PayloadError> {
        if len > self.remaining() {
            return Err(PayloadError::InsufficientData);
        }
        let start = self.position;
        self.position += len;
        Ok(&self.buffer[start..start + len])
    }

    /// Copy the next `out.len()` raw bytes into `out`
    pub fn read_into(&mut self, out: &mut [u8]) -> Result<(), PayloadError> {
        out.copy_from_slice(self.read_bytes(out.len())?);
        Ok(())
    }
}
