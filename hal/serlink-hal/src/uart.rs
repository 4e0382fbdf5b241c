//! Serial transport abstractions
//!
//! The protocol only needs four primitives from a UART-like channel: write a
//! run of bytes, flush, ask how many bytes are already buffered, and take one
//! buffered byte. There are no message boundaries at this level.

/// Serial transmitter
pub trait SerialTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the transport
    ///
    /// Blocks until all data has been accepted or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data out to the wire
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Serial receiver
///
/// Reads never block: callers check [`SerialRx::bytes_available`] first and
/// only take bytes that are already buffered.
pub trait SerialRx {
    /// Error type for receive operations
    type Error;

    /// Number of bytes that can be read right now without blocking
    ///
    /// Implementations that cannot report an exact count may return a lower
    /// bound (e.g. `1` when at least one byte is ready).
    fn bytes_available(&mut self) -> usize;

    /// Take one buffered byte
    fn read_byte(&mut self) -> Result<u8, Self::Error>;
}

/// Combined serial interface
///
/// For transports that provide both TX and RX on a single peripheral.
pub trait Serial: SerialTx + SerialRx {}

// Blanket implementation
impl<T: SerialTx + SerialRx> Serial for T {}

impl<T: SerialTx + ?Sized> SerialTx for &mut T {
    type Error = T::Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        T::write_blocking(self, data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        T::flush(self)
    }
}

impl<T: SerialRx + ?Sized> SerialRx for &mut T {
    type Error = T::Error;

    fn bytes_available(&mut self) -> usize {
        T::bytes_available(self)
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        T::read_byte(self)
    }
}
