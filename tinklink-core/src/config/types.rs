//! Configuration type definitions
//!
//! The bridge configuration is read once at startup. Only the trigger table
//! may change at runtime, and then only by wholesale replacement.

use heapless::String;

use crate::scaler::{PowerPolicy, TriggerTable};

/// Maximum network host name length
pub const MAX_HOST_LEN: usize = 64;

/// Default TCP port for the scaler's network console
pub const DEFAULT_NETWORK_PORT: u16 = 23;

/// TX/RX GPIO pair for a UART link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartPins {
    pub tx: u8,
    pub rx: u8,
}

impl UartPins {
    pub const fn new(tx: u8, rx: u8) -> Self {
        Self { tx, rx }
    }

    /// Returns true if either pin is shared with `other`
    pub fn overlaps(&self, other: &UartPins) -> bool {
        let mine = [self.tx, self.rx];
        mine.contains(&other.tx) || mine.contains(&other.rx)
    }
}

/// Which transport carries the scaler link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportKind {
    /// USB host to a USB-serial adapter
    #[default]
    Usb,
    /// Dedicated on-chip UART
    Uart,
    /// TCP session to the scaler's network console
    Network,
}

impl TransportKind {
    pub fn from_config(value: &str) -> Option<Self> {
        match value {
            "usb" => Some(TransportKind::Usb),
            "uart" => Some(TransportKind::Uart),
            "network" => Some(TransportKind::Network),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Usb => "usb",
            TransportKind::Uart => "uart",
            TransportKind::Network => "network",
        }
    }
}

/// Network console target
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NetworkTarget {
    pub host: String<MAX_HOST_LEN>,
    pub port: u16,
}

impl Default for NetworkTarget {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_NETWORK_PORT,
        }
    }
}

/// Scaler link configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScalerConfig {
    pub transport: TransportKind,
    pub power_policy: PowerPolicy,
    /// Used by the UART transport only
    pub uart: UartPins,
    /// Used by the network transport only
    pub network: NetworkTarget,
}

impl Default for ScalerConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::Usb,
            power_policy: PowerPolicy::Tracked,
            uart: UartPins::new(4, 5),
            network: NetworkTarget::default(),
        }
    }
}

/// Switcher link configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwitcherConfig {
    pub uart: UartPins,
}

impl Default for SwitcherConfig {
    fn default() -> Self {
        Self {
            uart: UartPins::new(0, 1),
        }
    }
}

/// Complete bridge configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeConfig {
    pub scaler: ScalerConfig,
    pub switcher: SwitcherConfig,
    pub triggers: TriggerTable,
}

/// Inconsistent configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Network transport selected without a host
    MissingHost,
    /// Scaler and switcher UARTs share a pin
    PinConflict,
}

impl BridgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check cross-field consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.scaler.transport {
            TransportKind::Network if self.scaler.network.host.is_empty() => {
                Err(ConfigError::MissingHost)
            }
            TransportKind::Uart if self.scaler.uart.overlaps(&self.switcher.uart) => {
                Err(ConfigError::PinConflict)
            }
            _ => Ok(()),
        }
    }
}
