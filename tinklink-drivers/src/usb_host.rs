//! Ring-buffered USB host transport
//!
//! The board's USB host stack delivers attach, detach and receive
//! notifications to a shared [`UsbRxState`], typically from interrupt
//! context. The transport itself only runs in the main loop: it polls the
//! host stack, drains complete lines from the ring and submits bulk OUT
//! transfers.

use portable_atomic::{AtomicBool, Ordering};
use tinklink_core::log::Log;
use tinklink_core::traits::SerialLink;
use tinklink_core::{log_debug, log_info, log_warn};
use tinklink_hal::{UsbSerialEvents, UsbSerialHost};
use tinklink_protocol::LineBuf;

use crate::ring::{RxRing, RX_RING_SIZE};

/// State shared between the host-stack callbacks and the transport
pub struct UsbRxState<const N: usize = RX_RING_SIZE> {
    ring: RxRing<N>,
    connected: AtomicBool,
}

impl<const N: usize> UsbRxState<N> {
    pub const fn new() -> Self {
        Self {
            ring: RxRing::new(),
            connected: AtomicBool::new(false),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    pub fn ring(&self) -> &RxRing<N> {
        &self.ring
    }
}

impl<const N: usize> Default for UsbRxState<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> UsbSerialEvents for UsbRxState<N> {
    fn on_attach(&self) {
        self.ring.clear();
        self.connected.store(true, Ordering::Release);
    }

    fn on_detach(&self) {
        self.connected.store(false, Ordering::Release);
        // In-flight partial lines are meaningless once the device is gone
        self.ring.clear();
    }

    fn on_receive(&self, data: &[u8]) {
        self.ring.push_slice(data);
    }
}

/// USB-serial transport to the scaler
pub struct UsbHostSerial<'a, H, L, const N: usize = RX_RING_SIZE> {
    host: H,
    rx: &'a UsbRxState<N>,
    log: L,
    /// Connection state last reported, for edge logging
    was_connected: bool,
}

impl<'a, H: UsbSerialHost, L: Log, const N: usize> UsbHostSerial<'a, H, L, N> {
    pub fn new(host: H, rx: &'a UsbRxState<N>, log: L) -> Self {
        Self {
            host,
            rx,
            log,
            was_connected: false,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

impl<H: UsbSerialHost, L: Log, const N: usize> SerialLink for UsbHostSerial<'_, H, L, N> {
    fn update(&mut self) {
        self.host.poll();

        let connected = self.rx.is_connected();
        if connected == self.was_connected {
            return;
        }
        self.was_connected = connected;

        if connected {
            log_info!(
                self.log,
                "usb: device attached ({} {})",
                self.host.manufacturer().unwrap_or("unknown"),
                self.host.product().unwrap_or("device")
            );
        } else {
            log_warn!(self.log, "usb: device detached");
        }
    }

    fn is_connected(&self) -> bool {
        self.rx.is_connected()
    }

    fn send(&mut self, data: &[u8]) -> bool {
        if !self.rx.is_connected() {
            log_debug!(self.log, "usb: no device, dropping {} bytes", data.len());
            return false;
        }

        let max = self.host.max_packet_size();
        if data.len() > max {
            log_warn!(
                self.log,
                "usb: {} bytes exceeds packet size {}",
                data.len(),
                max
            );
            return false;
        }

        match self.host.submit(data) {
            Ok(()) => true,
            Err(_) => {
                log_warn!(self.log, "usb: bulk transfer failed");
                false
            }
        }
    }

    fn read_line(&mut self) -> Option<LineBuf> {
        self.rx.ring().take_line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinklink_core::log::recording::RecordingLog;
    use tinklink_core::log::Level;

    /// Host that records submissions
    #[derive(Default)]
    struct FakeHost {
        polls: usize,
        submitted: Vec<Vec<u8>>,
        fail: bool,
    }

    impl UsbSerialHost for FakeHost {
        type Error = ();

        fn poll(&mut self) {
            self.polls += 1;
        }

        fn submit(&mut self, data: &[u8]) -> Result<(), ()> {
            if self.fail {
                return Err(());
            }
            self.submitted.push(data.to_vec());
            Ok(())
        }

        fn manufacturer(&self) -> Option<&str> {
            Some("FTDI")
        }

        fn product(&self) -> Option<&str> {
            Some("FT232R USB UART")
        }
    }

    #[test]
    fn test_send_requires_device() {
        let rx: UsbRxState = UsbRxState::new();
        let log = RecordingLog::new();
        let mut link = UsbHostSerial::new(FakeHost::default(), &rx, &log);

        assert!(!link.send(b"\rpwr on\r"));
        rx.on_attach();
        assert!(link.send(b"\rpwr on\r"));
        assert_eq!(link.host().submitted, vec![b"\rpwr on\r".to_vec()]);
    }

    #[test]
    fn test_oversized_payload_rejected() {
        let rx: UsbRxState = UsbRxState::new();
        rx.on_attach();
        let log = RecordingLog::new();
        let mut link = UsbHostSerial::new(FakeHost::default(), &rx, &log);

        assert!(!link.send(&[b'a'; 65]));
        assert!(link.send(&[b'a'; 64]));
        assert!(log.contains(Level::Warn, "exceeds packet size 64"));
    }

    #[test]
    fn test_submit_failure_reported() {
        let rx: UsbRxState = UsbRxState::new();
        rx.on_attach();
        let log = RecordingLog::new();
        let host = FakeHost {
            fail: true,
            ..FakeHost::default()
        };
        let mut link = UsbHostSerial::new(host, &rx, &log);
        assert!(!link.send(b"x"));
        assert!(log.contains(Level::Warn, "bulk transfer failed"));
    }

    #[test]
    fn test_lines_from_receive_callback() {
        let rx: UsbRxState = UsbRxState::new();
        let log = RecordingLog::new();
        let mut link = UsbHostSerial::new(FakeHost::default(), &rx, &log);

        rx.on_attach();
        rx.on_receive(b"[PWR] Powering Up\r\n[MCU] Boot");
        rx.on_receive(b" Sequence Complete\r\n");
        link.update();

        assert_eq!(link.read_line().unwrap().as_slice(), b"[PWR] Powering Up");
        assert_eq!(
            link.read_line().unwrap().as_slice(),
            b"[MCU] Boot Sequence Complete"
        );
        assert!(link.read_line().is_none());
    }

    #[test]
    fn test_detach_discards_partial_line() {
        let rx: UsbRxState = UsbRxState::new();
        let log = RecordingLog::new();
        let mut link = UsbHostSerial::new(FakeHost::default(), &rx, &log);

        rx.on_attach();
        rx.on_receive(b"Power O");
        rx.on_detach();
        rx.on_attach();
        rx.on_receive(b"ff\r\n");
        assert_eq!(link.read_line().unwrap().as_slice(), b"ff");
    }

    #[test]
    fn test_connection_edges_logged_once() {
        let rx: UsbRxState = UsbRxState::new();
        let log = RecordingLog::new();
        let mut link = UsbHostSerial::new(FakeHost::default(), &rx, &log);

        link.update();
        rx.on_attach();
        link.update();
        link.update();
        assert!(link.is_connected());
        rx.on_detach();
        link.update();
        link.update();

        assert!(!link.is_connected());
        assert_eq!(link.host().polls, 5);
        assert_eq!(log.count("attached (FTDI FT232R USB UART)"), 1);
        assert_eq!(log.count("detached"), 1);
    }
}
