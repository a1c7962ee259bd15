//! Adapter from `embedded-io` byte streams to the UART traits
//!
//! Chip HALs that expose buffered UARTs through `embedded-io` (blocking
//! `Read`/`Write` plus `ReadReady`) can be used directly as a scaler or
//! switcher link by wrapping them in [`IoUart`].

use embedded_io::{Read, ReadReady, Write};

use crate::uart::{UartRx, UartTx};

/// Non-blocking UART view over an `embedded-io` stream
pub struct IoUart<T> {
    inner: T,
}

impl<T> IoUart<T> {
    /// Wrap a buffered stream
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Release the wrapped stream
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Write> UartTx for IoUart<T> {
    type Error = T::Error;

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        if data.is_empty() {
            return Ok(0);
        }
        self.inner.write(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush()
    }
}

impl<T: Read + ReadReady> UartRx for IoUart<T> {
    type Error = T::Error;

    fn try_read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        // read() would block on an empty buffer
        if buf.is_empty() || !self.inner.read_ready()? {
            return Ok(0);
        }
        self.inner.read(buf)
    }
}
