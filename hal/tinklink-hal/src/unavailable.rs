//! Placeholder for links a board does not provide
//!
//! Lets a board build the closed set of scaler transports even when it has
//! no USB host controller or network interface. The placeholder never
//! connects, so a transport built on it simply reports disconnected and
//! drops every command.

use crate::net::TcpClient;
use crate::usb::UsbSerialHost;

/// Error returned by every [`Unavailable`] operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NotPresent;

/// Peripheral that is not fitted on this board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unavailable;

impl UsbSerialHost for Unavailable {
    type Error = NotPresent;

    fn poll(&mut self) {}

    fn submit(&mut self, _data: &[u8]) -> Result<(), NotPresent> {
        Err(NotPresent)
    }
}

impl TcpClient for Unavailable {
    type Error = NotPresent;

    fn connect(&mut self, _host: &str, _port: u16, _timeout_ms: u32) -> Result<(), NotPresent> {
        Err(NotPresent)
    }

    fn is_connected(&self) -> bool {
        false
    }

    fn write(&mut self, _data: &[u8]) -> Result<usize, NotPresent> {
        Err(NotPresent)
    }

    fn try_read(&mut self, _buf: &mut [u8]) -> Result<usize, NotPresent> {
        Ok(0)
    }

    fn close(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_connects() {
        let mut net = Unavailable;
        assert_eq!(net.connect("10.0.0.2", 23, 2000), Err(NotPresent));
        assert!(!net.is_connected());
        assert_eq!(TcpClient::write(&mut net, b"x"), Err(NotPresent));

        let mut usb = Unavailable;
        usb.poll();
        assert_eq!(usb.submit(b"x"), Err(NotPresent));
        assert_eq!(usb.manufacturer(), None);
    }
}
