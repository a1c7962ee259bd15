//! Scaler transport implementations
//!
//! This crate provides concrete implementations of the
//! [`SerialLink`](tinklink_core::traits::SerialLink) contract on top of the
//! peripheral traits in tinklink-hal:
//!
//! - USB host serial, fed by a lock-free receive ring
//! - UART at a fixed baud rate
//! - TCP with lazy connect and automatic reconnect
//! - [`AnyLink`], the closed set selected by configuration

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod link;
pub mod ring;
pub mod tcp;
pub mod uart;
pub mod usb_host;

pub use link::AnyLink;
pub use ring::{RxRing, RX_RING_SIZE};
pub use tcp::{HostTooLong, TcpSerial};
pub use uart::UartSerial;
pub use usb_host::{UsbHostSerial, UsbRxState};
