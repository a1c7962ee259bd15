//! Scaler power state and power-management policy

/// What the bridge believes about the scaler's power
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// No information yet
    #[default]
    Unknown,
    /// Wake sent from `Unknown`; waiting to learn whether it was off
    Waking,
    /// Confirmed powering up; waiting for boot complete
    Booting,
    /// Ready for commands
    On,
    /// Confirmed powered down
    Sleeping,
}

impl PowerState {
    /// Status string exposed to the status layer
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerState::Unknown => "unknown",
            PowerState::Waking => "waking",
            PowerState::Booting => "booting",
            PowerState::On => "on",
            PowerState::Sleeping => "sleeping",
        }
    }

    /// A wake sequence is outstanding
    pub fn is_waiting(&self) -> bool {
        matches!(self, PowerState::Waking | PowerState::Booting)
    }
}

/// Operator-selected power management
///
/// Fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerPolicy {
    /// Assume the scaler is always on (`off`)
    Disabled,
    /// Send one wake ever, then assume it is available (`simple`)
    Minimal,
    /// Track power state from console output (`full`)
    #[default]
    Tracked,
}

impl PowerPolicy {
    /// Parse the configuration keyword
    pub fn from_config(value: &str) -> Option<Self> {
        match value {
            "off" => Some(PowerPolicy::Disabled),
            "simple" => Some(PowerPolicy::Minimal),
            "full" => Some(PowerPolicy::Tracked),
            _ => None,
        }
    }

    /// Configuration keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerPolicy::Disabled => "off",
            PowerPolicy::Minimal => "simple",
            PowerPolicy::Tracked => "full",
        }
    }

    /// State to assume when a boot confirmation never arrives
    pub fn boot_timeout_state(&self) -> PowerState {
        match self {
            PowerPolicy::Tracked => PowerState::Unknown,
            PowerPolicy::Minimal | PowerPolicy::Disabled => PowerState::On,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_strings() {
        assert_eq!(PowerState::Unknown.as_str(), "unknown");
        assert_eq!(PowerState::Waking.as_str(), "waking");
        assert_eq!(PowerState::Booting.as_str(), "booting");
        assert_eq!(PowerState::On.as_str(), "on");
        assert_eq!(PowerState::Sleeping.as_str(), "sleeping");
    }

    #[test]
    fn test_policy_keywords() {
        for policy in [PowerPolicy::Disabled, PowerPolicy::Minimal, PowerPolicy::Tracked] {
            assert_eq!(PowerPolicy::from_config(policy.as_str()), Some(policy));
        }
        assert_eq!(PowerPolicy::from_config("FULL"), None);
    }

    #[test]
    fn test_boot_timeout_state() {
        assert_eq!(PowerPolicy::Tracked.boot_timeout_state(), PowerState::Unknown);
        assert_eq!(PowerPolicy::Minimal.boot_timeout_state(), PowerState::On);
        assert_eq!(PowerPolicy::Disabled.boot_timeout_state(), PowerState::On);
    }
}
