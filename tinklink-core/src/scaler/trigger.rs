//! Switcher input to scaler profile mappings

use heapless::{String, Vec};
use tinklink_protocol::Command;

/// Maximum number of trigger mappings
pub const MAX_TRIGGERS: usize = 16;

/// Maximum display name length
pub const MAX_TRIGGER_NAME_LEN: usize = 24;

/// How a mapping selects its profile on the scaler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerMode {
    /// `SVS NEW INPUT=<n>`; followed by a keep-alive
    #[default]
    IndexedSwitch,
    /// `remote prof<n>` button press
    RemoteEmulation,
}

impl TriggerMode {
    /// Parse the configuration keyword (`svs` or `remote`, any case)
    pub fn from_config(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("svs") {
            Some(TriggerMode::IndexedSwitch)
        } else if value.eq_ignore_ascii_case("remote") {
            Some(TriggerMode::RemoteEmulation)
        } else {
            None
        }
    }

    /// Command selecting `profile` in this mode
    pub fn command(&self, profile: u16) -> Command {
        match self {
            TriggerMode::IndexedSwitch => Command::SvsNewInput(profile),
            TriggerMode::RemoteEmulation => Command::RemoteProfile(profile),
        }
    }

    pub fn keeps_alive(&self) -> bool {
        matches!(self, TriggerMode::IndexedSwitch)
    }
}

/// One switcher input mapped to one scaler profile
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TriggerMapping {
    /// Switcher input number
    pub input: u16,
    /// Scaler profile number
    pub profile: u16,
    pub mode: TriggerMode,
    /// Display name; not used by the control logic
    pub name: String<MAX_TRIGGER_NAME_LEN>,
}

impl TriggerMapping {
    /// Create a mapping; over-long names are truncated
    pub fn new(input: u16, profile: u16, mode: TriggerMode, name: &str) -> Self {
        let mut label = String::new();
        for ch in name.chars() {
            if label.push(ch).is_err() {
                break;
            }
        }
        Self {
            input,
            profile,
            mode,
            name: label,
        }
    }

    /// Command this mapping sends
    pub fn command(&self) -> Command {
        self.mode.command(self.profile)
    }
}

/// Trigger table is at capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TableFull;

/// Ordered trigger mappings; the first match for an input wins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerTable {
    mappings: Vec<TriggerMapping, MAX_TRIGGERS>,
}

impl TriggerTable {
    pub const fn new() -> Self {
        Self {
            mappings: Vec::new(),
        }
    }

    pub fn push(&mut self, mapping: TriggerMapping) -> Result<(), TableFull> {
        self.mappings.push(mapping).map_err(|_| TableFull)
    }

    pub fn clear(&mut self) {
        self.mappings.clear();
    }

    /// First mapping for `input`
    pub fn find(&self, input: u16) -> Option<&TriggerMapping> {
        self.mappings.iter().find(|m| m.input == input)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TriggerMapping> {
        self.mappings.iter()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}
