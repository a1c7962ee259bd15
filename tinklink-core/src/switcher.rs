//! Switcher input messages
//!
//! The video switcher reports manual and front-panel input selections on its
//! serial port as `In<n> All` or `In<n> Vid`. Signal-presence reports and
//! other chatter are ignored here.

/// Parse an input selection message, returning the input number
pub fn parse_input_message(line: &str) -> Option<u16> {
    let rest = line.strip_prefix("In")?;
    let (number, tail) = rest.split_once(' ')?;
    if !(tail.contains("All") || tail.contains("Vid")) {
        return None;
    }
    match number.parse::<u16>() {
        Ok(0) | Err(_) => None,
        Ok(input) => Some(input),
    }
}

/// Tracks the switcher's selected input and reports genuine changes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputTracker {
    current: Option<u16>,
}

impl InputTracker {
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Feed one sanitized line
    ///
    /// Returns the new input when the line selects a different input
    /// than the last one reported.
    pub fn on_line(&mut self, line: &str) -> Option<u16> {
        let input = parse_input_message(line)?;
        if self.current == Some(input) {
            return None;
        }
        self.current = Some(input);
        Some(input)
    }

    pub fn current(&self) -> Option<u16> {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_message() {
        assert_eq!(parse_input_message("In3 All"), Some(3));
        assert_eq!(parse_input_message("In10 Vid"), Some(10));
        assert_eq!(parse_input_message("In0 All"), None);
        assert_eq!(parse_input_message("Sig1 0 0 0"), None);
        assert_eq!(parse_input_message("In3"), None);
        assert_eq!(parse_input_message("In3 Aud"), None);
        assert_eq!(parse_input_message("Inx All"), None);
    }

    #[test]
    fn test_tracker_reports_changes_only() {
        let mut tracker = InputTracker::new();
        assert_eq!(tracker.on_line("In2 All"), Some(2));
        assert_eq!(tracker.on_line("In2 Vid"), None);
        assert_eq!(tracker.on_line("Vrb3"), None);
        assert_eq!(tracker.on_line("In5 All"), Some(5));
        assert_eq!(tracker.current(), Some(5));
    }
}
