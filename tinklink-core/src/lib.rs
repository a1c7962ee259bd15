//! Board-agnostic control logic for the TinkLink scaler bridge
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Transport contract for the scaler link
//! - Injected logging
//! - Configuration types and parser
//! - Scaler controller (trigger lookup, power tracking, keep-alive)
//! - Switcher input message recognition

#![cfg_attr(not(any(test, feature = "testing")), no_std)]
#![deny(unsafe_code)]

pub mod log;

pub mod config;
pub mod scaler;
pub mod switcher;
pub mod traits;

pub use log::{Level, Log, NullLog};
pub use scaler::{PowerPolicy, PowerState, ScalerController};
pub use traits::SerialLink;
