//! Scaler control
//!
//! Trigger mappings, power state and the controller that ties them to a
//! transport.

pub mod controller;
pub mod power;
pub mod trigger;

pub use controller::{ScalerController, BOOT_WINDOW_MS, KEEP_ALIVE_DELAY_MS, WAKE_WINDOW_MS};
pub use power::{PowerPolicy, PowerState};
pub use trigger::{TableFull, TriggerMapping, TriggerMode, TriggerTable, MAX_TRIGGERS};
