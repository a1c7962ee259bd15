//! Outbound command vocabulary for the scaler console
//!
//! Only the commands the bridge actually issues are modelled. Anything
//! else can still be sent as raw text through [`Frame::new`].

use core::fmt::{self, Write};

use crate::frame::{CommandText, Frame, FrameError};

// Command prefixes
const SVS_NEW_INPUT: &str = "SVS NEW INPUT=";
const SVS_CURRENT_INPUT: &str = "SVS CURRENT INPUT=";
const REMOTE_PROFILE: &str = "remote prof";
const REMOTE_MENU: &str = "remote menu";
const POWER_ON: &str = "pwr on";

/// Commands sent to the scaler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Select an SVS input; the scaler loads the matching profile
    SvsNewInput(u16),
    /// Re-assert the current SVS input (keep-alive after a switch)
    SvsCurrentInput(u16),
    /// Emulate the remote's profile button
    RemoteProfile(u16),
    /// Emulate the remote's menu button
    RemoteMenu,
    /// Wake the scaler from standby
    PowerOn,
}

impl Command {
    /// Render the command text
    pub fn text(&self) -> Result<CommandText, FrameError> {
        let mut text = CommandText::new();
        write!(text, "{}", self).map_err(|_| FrameError::CommandTooLong)?;
        Ok(text)
    }

    /// Render and frame the command
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        Frame::new(&self.text()?)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SvsNewInput(n) => write!(f, "{}{}", SVS_NEW_INPUT, n),
            Command::SvsCurrentInput(n) => write!(f, "{}{}", SVS_CURRENT_INPUT, n),
            Command::RemoteProfile(n) => write!(f, "{}{}", REMOTE_PROFILE, n),
            Command::RemoteMenu => f.write_str(REMOTE_MENU),
            Command::PowerOn => f.write_str(POWER_ON),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_text() {
        assert_eq!(Command::SvsNewInput(3).text().unwrap(), "SVS NEW INPUT=3");
        assert_eq!(
            Command::SvsCurrentInput(12).text().unwrap(),
            "SVS CURRENT INPUT=12"
        );
        assert_eq!(Command::RemoteProfile(7).text().unwrap(), "remote prof7");
        assert_eq!(Command::RemoteMenu.text().unwrap(), "remote menu");
        assert_eq!(Command::PowerOn.text().unwrap(), "pwr on");
    }

    #[test]
    fn test_command_frame() {
        let frame = Command::SvsNewInput(1).to_frame().unwrap();
        assert_eq!(frame.as_bytes(), b"\rSVS NEW INPUT=1\r");
    }

    #[test]
    fn test_largest_profile_fits() {
        let frame = Command::SvsCurrentInput(u16::MAX).to_frame().unwrap();
        assert_eq!(frame.command(), "SVS CURRENT INPUT=65535");
    }
}
