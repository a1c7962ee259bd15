//! RP2040-specific HAL for the bridge firmware
//!
//! The bridge needs two UARTs (scaler and switcher) on configurable pins.
//! This crate knows which GPIOs route to which UART peripheral and rejects
//! pin pairs the RP2040 cannot wire up.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod uart;

pub use uart::{gpio_to_uart, validate_pins, PinError, PinRole, UartAllocator, UartId};
