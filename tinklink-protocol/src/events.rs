//! Inbound console lines relevant to power-state tracking
//!
//! The scaler prints a steady stream of diagnostic chatter. Only a handful
//! of lines say anything about its power state; everything else is
//! classified as [`PeerEvent::Other`].

/// Printed when the scaler starts powering up
pub const MARKER_POWERING_UP: &str = "Powering Up";

/// Printed once the scaler has finished booting
pub const MARKER_BOOT_COMPLETE: &str = "[MCU] Boot Sequence Complete";

/// Printed when the scaler is switched off
pub const MARKER_POWER_OFF: &str = "Power Off";

/// Printed when the scaler drops into standby
pub const MARKER_SLEEP: &str = "Entering Sleep";

/// Power-related events recognized in scaler output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeerEvent {
    /// Scaler is powering up
    PoweringUp,
    /// Scaler finished booting and accepts commands
    BootComplete,
    /// Scaler powered down or entered standby
    PoweredOff,
    /// Anything else
    Other,
}

impl PeerEvent {
    /// Classify a line by substring match (case-sensitive)
    pub fn classify(line: &str) -> Self {
        if line.contains(MARKER_POWERING_UP) {
            PeerEvent::PoweringUp
        } else if line.contains(MARKER_BOOT_COMPLETE) {
            PeerEvent::BootComplete
        } else if line.contains(MARKER_POWER_OFF) || line.contains(MARKER_SLEEP) {
            PeerEvent::PoweredOff
        } else {
            PeerEvent::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_markers_amid_chatter() {
        assert_eq!(
            PeerEvent::classify("[PWR] Powering Up..."),
            PeerEvent::PoweringUp
        );
        assert_eq!(
            PeerEvent::classify("12.034 [MCU] Boot Sequence Complete"),
            PeerEvent::BootComplete
        );
        assert_eq!(PeerEvent::classify("Power Off"), PeerEvent::PoweredOff);
        assert_eq!(
            PeerEvent::classify("[PWR] Entering Sleep mode"),
            PeerEvent::PoweredOff
        );
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        assert_eq!(PeerEvent::classify("powering up"), PeerEvent::Other);
        assert_eq!(
            PeerEvent::classify("[mcu] boot sequence complete"),
            PeerEvent::Other
        );
        assert_eq!(PeerEvent::classify("POWER OFF"), PeerEvent::Other);
    }

    #[test]
    fn test_boot_marker_requires_prefix() {
        assert_eq!(
            PeerEvent::classify("Boot Sequence Complete"),
            PeerEvent::Other
        );
    }

    #[test]
    fn test_other_lines() {
        let other = PeerEvent::classify("HDMI RX: 1920x1080p60");
        assert_eq!(other, PeerEvent::Other);
    }
}
