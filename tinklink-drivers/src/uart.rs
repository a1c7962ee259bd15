//! UART transport
//!
//! Serves both the scaler link (115200 8-N-1) and the switcher link
//! (9600 8-N-1). Lines end at LF; CR is dropped.

use tinklink_core::log::Log;
use tinklink_core::traits::SerialLink;
use tinklink_core::{log_debug, log_warn};
use tinklink_hal::Uart;
use tinklink_protocol::{LineAssembler, LineBuf, Terminator};

/// Serial link over an on-chip UART
pub struct UartSerial<U, L> {
    uart: U,
    log: L,
    assembler: LineAssembler,
    open: bool,
}

impl<U: Uart, L: Log> UartSerial<U, L> {
    /// Wrap an already configured UART
    pub fn new(uart: U, log: L) -> Self {
        Self {
            uart,
            log,
            assembler: LineAssembler::new(Terminator::Lf),
            open: true,
        }
    }

    /// Stop using the link
    ///
    /// A closed link reports disconnected and refuses sends.
    pub fn close(&mut self) {
        if self.open {
            self.open = false;
            self.assembler.clear();
            log_debug!(self.log, "uart: closed");
        }
    }

    pub fn inner(&self) -> &U {
        &self.uart
    }

    pub fn inner_mut(&mut self) -> &mut U {
        &mut self.uart
    }
}

impl<U: Uart, L: Log> SerialLink for UartSerial<U, L> {
    fn update(&mut self) {
        // Bytes wait in the peripheral's buffer until read_line
    }

    fn is_connected(&self) -> bool {
        self.open
    }

    fn send(&mut self, data: &[u8]) -> bool {
        if !self.open {
            log_warn!(self.log, "uart: send on closed link");
            return false;
        }

        let mut written = 0;
        while written < data.len() {
            match self.uart.write(&data[written..]) {
                Ok(0) => break,
                Ok(n) => written += n,
                Err(_) => {
                    log_warn!(self.log, "uart: write error");
                    return false;
                }
            }
        }

        if written < data.len() {
            log_warn!(self.log, "uart: wrote {} of {} bytes", written, data.len());
            return false;
        }
        if self.uart.flush().is_err() {
            log_warn!(self.log, "uart: flush error");
            return false;
        }
        true
    }

    fn read_line(&mut self) -> Option<LineBuf> {
        if !self.open {
            return None;
        }

        let mut byte = [0u8; 1];
        loop {
            match self.uart.try_read(&mut byte) {
                Ok(0) => return None,
                Ok(_) => {
                    if let Some(line) = self.assembler.push(byte[0]) {
                        return Some(line);
                    }
                }
                Err(_) => {
                    log_warn!(self.log, "uart: read error, discarding partial line");
                    self.assembler.clear();
                    return None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinklink_core::log::recording::RecordingLog;
    use std::collections::VecDeque;
    use tinklink_core::log::Level;
    use tinklink_hal::{UartRx, UartTx};

    /// Scripted UART: reads drain `rx`, writes land in `tx`
    #[derive(Default)]
    struct FakeUart {
        rx: VecDeque<u8>,
        tx: Vec<u8>,
        /// Max bytes accepted per write call
        tx_chunk: Option<usize>,
        /// Writes accept nothing once this many bytes are in `tx`
        tx_limit: Option<usize>,
        read_error: bool,
    }

    impl UartTx for FakeUart {
        type Error = ();

        fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
            let room = self.tx_limit.map_or(usize::MAX, |l| l - self.tx.len());
            let n = data.len().min(self.tx_chunk.unwrap_or(usize::MAX)).min(room);
            self.tx.extend_from_slice(&data[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> Result<(), ()> {
            Ok(())
        }
    }

    impl UartRx for FakeUart {
        type Error = ();

        fn try_read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
            if self.read_error {
                self.read_error = false;
                return Err(());
            }
            let mut n = 0;
            while n < buf.len() {
                match self.rx.pop_front() {
                    Some(b) => {
                        buf[n] = b;
                        n += 1;
                    }
                    None => break,
                }
            }
            Ok(n)
        }
    }

    fn with_input(input: &[u8]) -> FakeUart {
        FakeUart {
            rx: input.iter().copied().collect(),
            ..FakeUart::default()
        }
    }

    #[test]
    fn test_lf_terminates_cr_dropped() {
        let log = RecordingLog::new();
        let mut link = UartSerial::new(with_input(b"In3 All\r\nIn4 Vid\n\npartial"), &log);
        link.update();
        assert_eq!(link.read_line().unwrap().as_slice(), b"In3 All");
        assert_eq!(link.read_line().unwrap().as_slice(), b"In4 Vid");
        assert!(link.read_line().is_none());

        link.inner_mut().rx.extend(b" line\n");
        assert_eq!(link.read_line().unwrap().as_slice(), b"partial line");
    }

    #[test]
    fn test_update_leaves_bytes_for_read_line() {
        let log = RecordingLog::new();
        let mut link = UartSerial::new(with_input(b"In2 All\n"), &log);
        link.update();
        link.update();
        assert_eq!(link.inner().rx.len(), 8);
        assert_eq!(link.read_line().unwrap().as_slice(), b"In2 All");
    }

    #[test]
    fn test_bare_cr_does_not_end_line() {
        let log = RecordingLog::new();
        let mut link = UartSerial::new(with_input(b"one\rtwo\n"), &log);
        assert_eq!(link.read_line().unwrap().as_slice(), b"onetwo");
    }

    #[test]
    fn test_send_writes_all_chunks() {
        let log = RecordingLog::new();
        let uart = FakeUart {
            tx_chunk: Some(3),
            ..FakeUart::default()
        };
        let mut link = UartSerial::new(uart, &log);
        assert!(link.send(b"\rSVS NEW INPUT=2\r"));
        assert_eq!(link.inner().tx, b"\rSVS NEW INPUT=2\r");
    }

    #[test]
    fn test_short_write_fails() {
        let log = RecordingLog::new();
        let uart = FakeUart {
            tx_limit: Some(4),
            ..FakeUart::default()
        };
        let mut link = UartSerial::new(uart, &log);
        assert!(!link.send(b"\rpwr on\r"));
        assert!(log.contains(Level::Warn, "wrote 4 of 8 bytes"));
    }

    #[test]
    fn test_read_error_clears_partial() {
        let log = RecordingLog::new();
        let mut link = UartSerial::new(with_input(b"garb"), &log);
        assert!(link.read_line().is_none());
        link.inner_mut().read_error = true;
        link.inner_mut().rx.extend(b"age\nok\n");
        assert!(link.read_line().is_none());
        assert_eq!(link.read_line().unwrap().as_slice(), b"age");
        assert_eq!(link.read_line().unwrap().as_slice(), b"ok");
    }

    #[test]
    fn test_closed_link() {
        let log = RecordingLog::new();
        let mut link = UartSerial::new(with_input(b"line\n"), &log);
        assert!(link.is_connected());
        link.close();
        assert!(!link.is_connected());
        assert!(!link.send(b"x"));
        assert!(link.read_line().is_none());
        assert!(link.inner().tx.is_empty());
    }
}
