//! Command framing for the scaler console.
//!
//! Frame format:
//! - CR (1 byte): flushes any partial line left in the scaler's input buffer
//! - COMMAND (1-62 bytes): ASCII command text
//! - CR (1 byte): submits the command
//!
//! A complete frame never exceeds one 64-byte USB bulk packet.

use heapless::{String, Vec};

/// Frame delimiter, sent before and after every command
pub const FRAME_DELIMITER: u8 = b'\r';

/// Maximum command length in bytes
pub const MAX_COMMAND_LEN: usize = 62;

/// Maximum complete frame size (CR + COMMAND + CR)
pub const MAX_FRAME_SIZE: usize = MAX_COMMAND_LEN + 2;

/// Bounded command text
pub type CommandText = String<MAX_COMMAND_LEN>;

/// Errors that can occur during frame encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Command is empty
    EmptyCommand,
    /// Command exceeds [`MAX_COMMAND_LEN`]
    CommandTooLong,
}

/// A framed command ready for transmission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Vec<u8, MAX_FRAME_SIZE>,
}

impl Frame {
    /// Frame a command as `"\r" + command + "\r"`
    pub fn new(command: &str) -> Result<Self, FrameError> {
        if command.is_empty() {
            return Err(FrameError::EmptyCommand);
        }
        if command.len() > MAX_COMMAND_LEN {
            return Err(FrameError::CommandTooLong);
        }

        let mut bytes = Vec::new();
        bytes
            .push(FRAME_DELIMITER)
            .map_err(|_| FrameError::CommandTooLong)?;
        bytes
            .extend_from_slice(command.as_bytes())
            .map_err(|_| FrameError::CommandTooLong)?;
        bytes
            .push(FRAME_DELIMITER)
            .map_err(|_| FrameError::CommandTooLong)?;

        Ok(Self { bytes })
    }

    /// Wire bytes, delimiters included
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Command text without delimiters
    pub fn command(&self) -> &str {
        let inner = &self.bytes[1..self.bytes.len() - 1];
        // Built from a &str in new(), so always valid UTF-8
        core::str::from_utf8(inner).unwrap_or("")
    }

    /// Total frame length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Frames always carry at least one command byte
    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_frame_wraps_command_in_cr() {
        let frame = Frame::new("pwr on").unwrap();
        assert_eq!(frame.as_bytes(), b"\rpwr on\r");
        assert_eq!(frame.command(), "pwr on");
        assert_eq!(frame.len(), 8);
    }

    #[test]
    fn test_frame_fits_usb_packet() {
        let longest = [b'x'; MAX_COMMAND_LEN];
        let frame = Frame::new(core::str::from_utf8(&longest).unwrap()).unwrap();
        assert_eq!(frame.len(), 64);
    }

    #[test]
    fn test_command_too_long() {
        let too_long = [b'x'; MAX_COMMAND_LEN + 1];
        let result = Frame::new(core::str::from_utf8(&too_long).unwrap());
        assert_eq!(result, Err(FrameError::CommandTooLong));
    }

    #[test]
    fn test_empty_command_rejected() {
        assert_eq!(Frame::new(""), Err(FrameError::EmptyCommand));
    }

    proptest! {
        #[test]
        fn prop_frame_is_delimited(command in "[ -~]{1,62}") {
            let frame = Frame::new(&command).unwrap();
            let bytes = frame.as_bytes();
            prop_assert_eq!(bytes.len(), command.len() + 2);
            prop_assert_eq!(bytes[0], FRAME_DELIMITER);
            prop_assert_eq!(bytes[bytes.len() - 1], FRAME_DELIMITER);
            prop_assert_eq!(frame.command(), command.as_str());
        }
    }
}
