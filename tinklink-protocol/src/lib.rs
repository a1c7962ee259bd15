//! Scaler Console Protocol
//!
//! This crate defines the text protocol spoken by the scaler on its serial
//! console (USB-serial or UART, 115200 8-N-1, or a TCP session). The bridge
//! sends a handful of commands and watches the console output for lines that
//! reveal the scaler's power state.
//!
//! # Protocol Overview
//!
//! Outbound commands are ASCII, wrapped in carriage returns:
//! ```text
//! ┌────┬──────────────────────┬────┐
//! │ CR │ COMMAND              │ CR │
//! │ 1B │ 1–62B                │ 1B │
//! └────┴──────────────────────┴────┘
//! ```
//!
//! The leading CR terminates whatever partial input the scaler may be
//! holding, so the real command always starts on a fresh line.
//!
//! Inbound output is free-form text. Lines are sanitized to printable ASCII
//! and matched by substring against a few documented markers.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod commands;
pub mod events;
pub mod frame;
pub mod line;

pub use commands::Command;
pub use events::PeerEvent;
pub use frame::{CommandText, Frame, FrameError, MAX_COMMAND_LEN, MAX_FRAME_SIZE};
pub use line::{sanitize_line, Line, LineAssembler, LineBuf, Terminator, MAX_LINE_LEN};
