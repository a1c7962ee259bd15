//! TinkLink Hardware Abstraction Layer
//!
//! This crate defines the peripheral traits the bridge needs to reach the
//! scaler and the switcher. Chip-specific HALs implement them, so the same
//! transports and controller run on any board (or against test fakes on
//! the host).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (tinklink-firmware)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tinklink-drivers (scaler transports)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tinklink-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ tinklink-hal- │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::UartRx`] - Non-blocking serial communication
//! - [`usb::UsbSerialHost`], [`usb::UsbSerialEvents`] - USB host serial device
//! - [`net::TcpClient`] - Single-session TCP client

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod io;
pub mod net;
pub mod uart;
pub mod unavailable;
pub mod usb;

// Re-export key traits at crate root for convenience
pub use io::IoUart;
pub use net::TcpClient;
pub use uart::{Uart, UartConfig, UartRx, UartTx};
pub use unavailable::{NotPresent, Unavailable};
pub use usb::{UsbSerialEvents, UsbSerialHost};
