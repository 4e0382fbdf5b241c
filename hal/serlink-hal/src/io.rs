//! Adapter from `embedded-io` peripherals to the serial traits
//!
//! Any blocking UART driver implementing [`embedded_io::Read`],
//! [`embedded_io::ReadReady`] and [`embedded_io::Write`] (the embassy
//! buffered UARTs do) can be handed to the protocol through [`IoSerial`].

use embedded_io::{Read, ReadReady, Write};

use crate::uart::{SerialRx, SerialTx};

/// Wraps an `embedded-io` peripheral
#[derive(Debug)]
pub struct IoSerial<T> {
    inner: T,
}

impl<T> IoSerial<T> {
    /// Wrap a peripheral
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Access the wrapped peripheral
    pub fn inner(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the adapter and return the peripheral
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Write> SerialTx for IoSerial<T> {
    type Error = T::Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush()
    }
}

/// Receive error from an [`IoSerial`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoRxError<E> {
    /// Peripheral reported ready but returned end-of-stream
    Eof,
    /// Error from the underlying peripheral
    Io(E),
}

impl<T: Read + ReadReady> SerialRx for IoSerial<T> {
    type Error = IoRxError<T::Error>;

    /// `ReadReady` only reports readiness, so this is a lower bound of 0 or 1
    fn bytes_available(&mut self) -> usize {
        match self.inner.read_ready() {
            Ok(true) => 1,
            _ => 0,
        }
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        match self.inner.read(&mut buf).map_err(IoRxError::Io)? {
            0 => Err(IoRxError::Eof),
            _ => Ok(buf[0]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_io::ErrorType;

    /// In-memory peripheral: reads from `rx`, appends writes to `tx`
    struct FakeUart {
        rx: [u8; 4],
        rx_pos: usize,
        tx: heapless::Vec<u8, 16>,
        flushed: bool,
    }

    impl ErrorType for FakeUart {
        type Error = Infallible;
    }

    impl Read for FakeUart {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            let left = &self.rx[self.rx_pos..];
            let n = left.len().min(buf.len());
            buf[..n].copy_from_slice(&left[..n]);
            self.rx_pos += n;
            Ok(n)
        }
    }

    impl ReadReady for FakeUart {
        fn read_ready(&mut self) -> Result<bool, Self::Error> {
            Ok(self.rx_pos < self.rx.len())
        }
    }

    impl Write for FakeUart {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            let _ = self.tx.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.flushed = true;
            Ok(())
        }
    }

    fn fake() -> FakeUart {
        FakeUart {
            rx: [0xAA, 0x01, 0x00, 0x00],
            rx_pos: 0,
            tx: heapless::Vec::new(),
            flushed: false,
        }
    }

    #[test]
    fn test_reads_until_drained() {
        let mut serial = IoSerial::new(fake());
        let mut got = heapless::Vec::<u8, 4>::new();
        while serial.bytes_available() > 0 {
            got.push(serial.read_byte().unwrap()).unwrap();
        }
        assert_eq!(&got[..], &[0xAA, 0x01, 0x00, 0x00]);
        assert_eq!(serial.read_byte(), Err(IoRxError::Eof));
    }

    #[test]
    fn test_write_and_flush() {
        let mut serial = IoSerial::new(fake());
        serial.write_blocking(&[1, 2, 3]).unwrap();
        SerialTx::flush(&mut serial).unwrap();

        let uart = serial.into_inner();
        assert_eq!(&uart.tx[..], &[1, 2, 3]);
        assert!(uart.flushed);
    }
}
