//! Network transport
//!
//! Reaches the scaler over a plain TCP session. The session is opened
//! lazily by the first send and reopened by the next send after it drops.
//! Lines end at CR; LF is dropped.

use heapless::String;
use tinklink_core::log::Log;
use tinklink_core::traits::SerialLink;
use tinklink_core::{log_debug, log_error, log_info, log_warn};
use tinklink_hal::net::{CONNECT_TIMEOUT_MS, DEFAULT_PORT, MAX_HOST_LEN};
use tinklink_hal::TcpClient;
use tinklink_protocol::{LineAssembler, LineBuf, Terminator};

/// Host name does not fit in [`MAX_HOST_LEN`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HostTooLong;

/// Serial link over a TCP session
pub struct TcpSerial<C, L> {
    client: C,
    log: L,
    host: String<MAX_HOST_LEN>,
    port: u16,
    assembler: LineAssembler,
    /// A session was open at the last check
    was_connected: bool,
}

impl<C: TcpClient, L: Log> TcpSerial<C, L> {
    /// Create an unconfigured transport; sends fail until a host is set
    pub fn new(client: C, log: L) -> Self {
        Self {
            client,
            log,
            host: String::new(),
            port: DEFAULT_PORT,
            assembler: LineAssembler::new(Terminator::Cr),
            was_connected: false,
        }
    }

    /// Set the target, dropping the current session if it changes
    pub fn configure(&mut self, host: &str, port: u16) -> Result<(), HostTooLong> {
        if host == self.host.as_str() && port == self.port {
            return Ok(());
        }
        let host = String::try_from(host).map_err(|_| HostTooLong)?;

        log_debug!(
            self.log,
            "network: target {}:{} -> {}:{}",
            self.host,
            self.port,
            host,
            port
        );
        self.disconnect();
        self.host = host;
        self.port = port;
        Ok(())
    }

    /// Close the session and discard any partial line
    pub fn disconnect(&mut self) {
        if self.client.is_connected() {
            self.client.close();
            log_debug!(self.log, "network: disconnected");
        }
        self.was_connected = false;
        self.assembler.clear();
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    fn ensure_connected(&mut self) -> bool {
        if self.client.is_connected() {
            return true;
        }

        log_debug!(self.log, "network: connecting to {}:{}", self.host, self.port);
        match self
            .client
            .connect(&self.host, self.port, CONNECT_TIMEOUT_MS)
        {
            Ok(()) => {
                log_info!(self.log, "network: connected to {}:{}", self.host, self.port);
                self.assembler.clear();
                self.was_connected = true;
                true
            }
            Err(_) => {
                log_error!(
                    self.log,
                    "network: failed to connect to {}:{}",
                    self.host,
                    self.port
                );
                false
            }
        }
    }
}

impl<C: TcpClient, L: Log> SerialLink for TcpSerial<C, L> {
    fn update(&mut self) {
        if self.was_connected && !self.client.is_connected() {
            log_warn!(self.log, "network: session to {} dropped", self.host);
            self.was_connected = false;
            self.assembler.clear();
        }
    }

    fn is_connected(&self) -> bool {
        self.client.is_connected()
    }

    fn send(&mut self, data: &[u8]) -> bool {
        if self.host.is_empty() {
            log_debug!(self.log, "network: no host configured");
            return false;
        }
        if !self.ensure_connected() {
            return false;
        }

        match self.client.write(data) {
            Ok(n) if n == data.len() => true,
            Ok(n) => {
                log_error!(self.log, "network: wrote {} of {} bytes", n, data.len());
                false
            }
            Err(_) => {
                log_error!(self.log, "network: write failed");
                false
            }
        }
    }

    fn read_line(&mut self) -> Option<LineBuf> {
        let mut byte = [0u8; 1];
        loop {
            match self.client.try_read(&mut byte) {
                Ok(0) | Err(_) => return None,
                Ok(_) => {
                    if let Some(line) = self.assembler.push(byte[0]) {
                        return Some(line);
                    }
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

    #[derive(Default)]
    struct FakeTcp {
        reachable: bool,
        connected: bool,
        connects: Vec<(std::string::String, u16, u32)>,
        written: Vec<u8>,
        rx: VecDeque<u8>,
        closes: usize,
    }

    impl TcpClient for FakeTcp {
        type Error = ();

        fn connect(&mut self, host: &str, port: u16, timeout_ms: u32) -> Result<(), ()> {
            self.connects.push((host.into(), port, timeout_ms));
            if self.reachable {
                self.connected = true;
                Ok(())
            } else {
                Err(())
            }
        }

        fn is_connected(&self) -> bool {
            self.connected
        }

        fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
            if !self.connected {
                return Err(());
            }
            self.written.extend_from_slice(data);
            Ok(data.len())
        }

        fn try_read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
            match self.rx.pop_front() {
                Some(b) if !buf.is_empty() => {
                    buf[0] = b;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }

        fn close(&mut self) {
            self.connected = false;
            self.closes += 1;
        }
    }

    fn reachable() -> FakeTcp {
        FakeTcp {
            reachable: true,
            ..FakeTcp::default()
        }
    }

    #[test]
    fn test_unconfigured_send_fails() {
        let log = RecordingLog::new();
        let mut link = TcpSerial::new(reachable(), &log);
        assert!(!link.send(b"x"));
        assert!(link.client().connects.is_empty());
    }

    #[test]
    fn test_connects_lazily_on_send() {
        let log = RecordingLog::new();
        let mut link = TcpSerial::new(reachable(), &log);
        link.configure("192.168.1.40", 23).unwrap();
        assert!(!link.is_connected());

        assert!(link.send(b"\rpwr on\r"));
        assert!(link.send(b"\rremote prof2\r"));
        assert_eq!(
            link.client().connects,
            vec![("192.168.1.40".to_string(), 23, CONNECT_TIMEOUT_MS)]
        );
        assert_eq!(link.client().written, b"\rpwr on\r\rremote prof2\r");
    }

    #[test]
    fn test_reconnects_after_drop() {
        let log = RecordingLog::new();
        let mut link = TcpSerial::new(reachable(), &log);
        link.configure("scaler.local", 2323).unwrap();
        assert!(link.send(b"a"));

        link.client_mut().connected = false;
        link.update();
        link.update();
        assert_eq!(log.count("dropped"), 1);

        assert!(link.send(b"b"));
        assert_eq!(link.client().connects.len(), 2);
    }

    #[test]
    fn test_connect_failure_logged() {
        let log = RecordingLog::new();
        let mut link = TcpSerial::new(FakeTcp::default(), &log);
        link.configure("10.0.0.9", 23).unwrap();
        assert!(!link.send(b"x"));
        assert!(log.contains(Level::Error, "failed to connect to 10.0.0.9:23"));
    }

    #[test]
    fn test_cr_terminates_lf_dropped() {
        let log = RecordingLog::new();
        let mut client = reachable();
        client.rx.extend(b"\nPowering Up\r\nok\r\r\npart");
        let mut link = TcpSerial::new(client, &log);
        assert_eq!(link.read_line().unwrap().as_slice(), b"Powering Up");
        assert_eq!(link.read_line().unwrap().as_slice(), b"ok");
        assert!(link.read_line().is_none());
    }

    #[test]
    fn test_configure_changes_target() {
        let log = RecordingLog::new();
        let mut link = TcpSerial::new(reachable(), &log);
        link.configure("10.0.0.1", 23).unwrap();
        assert!(link.send(b"x"));

        // Same target keeps the session
        link.configure("10.0.0.1", 23).unwrap();
        assert_eq!(link.client().closes, 0);

        link.configure("10.0.0.2", 23).unwrap();
        assert_eq!(link.client().closes, 1);
        assert!(!link.is_connected());
        assert_eq!(link.host(), "10.0.0.2");

        let long = "h".repeat(MAX_HOST_LEN + 1);
        assert_eq!(link.configure(&long, 23), Err(HostTooLong));
        assert_eq!(link.host(), "10.0.0.2");
    }

    #[test]
    fn test_drop_discards_partial_line() {
        let log = RecordingLog::new();
        let mut link = TcpSerial::new(reachable(), &log);
        link.configure("10.0.0.1", 23).unwrap();
        assert!(link.send(b"x"));

        link.client_mut().rx.extend(b"half");
        assert!(link.read_line().is_none());
        link.client_mut().connected = false;
        link.update();

        link.client_mut().rx.extend(b"whole\r");
        assert_eq!(link.read_line().unwrap().as_slice(), b"whole");
    }
}
