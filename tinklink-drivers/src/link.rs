//! Closed set of scaler transports
//!
//! Exactly one transport is built at startup from configuration and never
//! changes, so an enum gives static dispatch without trait objects.

use tinklink_core::log::Log;
use tinklink_core::traits::SerialLink;
use tinklink_hal::{TcpClient, Uart, UsbSerialHost};
use tinklink_protocol::LineBuf;

use crate::tcp::TcpSerial;
use crate::uart::UartSerial;
use crate::usb_host::UsbHostSerial;

/// Any scaler transport
pub enum AnyLink<'a, H, U, C, L> {
    Usb(UsbHostSerial<'a, H, L>),
    Uart(UartSerial<U, L>),
    Network(TcpSerial<C, L>),
}

impl<H, U, C, L> AnyLink<'_, H, U, C, L> {
    /// Transport name as used in configuration
    pub fn kind(&self) -> &'static str {
        match self {
            AnyLink::Usb(_) => "usb",
            AnyLink::Uart(_) => "uart",
            AnyLink::Network(_) => "network",
        }
    }
}

impl<H, U, C, L> SerialLink for AnyLink<'_, H, U, C, L>
where
    H: UsbSerialHost,
    U: Uart,
    C: TcpClient,
    L: Log,
{
    fn update(&mut self) {
        match self {
            AnyLink::Usb(link) => link.update(),
            AnyLink::Uart(link) => link.update(),
            AnyLink::Network(link) => link.update(),
        }
    }

    fn is_connected(&self) -> bool {
        match self {
            AnyLink::Usb(link) => link.is_connected(),
            AnyLink::Uart(link) => link.is_connected(),
            AnyLink::Network(link) => link.is_connected(),
        }
    }

    fn send(&mut self, data: &[u8]) -> bool {
        match self {
            AnyLink::Usb(link) => link.send(data),
            AnyLink::Uart(link) => link.send(data),
            AnyLink::Network(link) => link.send(data),
        }
    }

    fn read_line(&mut self) -> Option<LineBuf> {
        match self {
            AnyLink::Usb(link) => link.read_line(),
            AnyLink::Uart(link) => link.read_line(),
            AnyLink::Network(link) => link.read_line(),
        }
    }
}
