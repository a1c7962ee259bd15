//! Line handling for scaler and switcher console output
//!
//! Serial links are noisy: glitches show up as stray control or high-bit
//! bytes, and line terminators differ per link. Lines are sanitized rather
//! than rejected so that garbled output stays visible in the logs.

use heapless::{String, Vec};

/// Longest line kept; longer lines are truncated
pub const MAX_LINE_LEN: usize = 256;

/// Replacement for bytes outside printable ASCII
pub const REPLACEMENT: u8 = b'?';

/// Raw line bytes as received, terminator stripped
pub type LineBuf = Vec<u8, MAX_LINE_LEN>;

/// Sanitized, printable line
pub type Line = String<MAX_LINE_LEN>;

/// Returns true for printable ASCII (0x20..=0x7E)
pub fn is_printable(byte: u8) -> bool {
    (0x20..=0x7E).contains(&byte)
}

/// Returns true for CR or LF
pub fn is_terminator(byte: u8) -> bool {
    byte == b'\r' || byte == b'\n'
}

/// Build a printable string from raw line bytes
///
/// The result has exactly as many characters as `bytes` has bytes (up to
/// [`MAX_LINE_LEN`]).
pub fn sanitize_line(bytes: &[u8]) -> Line {
    let mut line = Line::new();
    for &byte in bytes.iter().take(MAX_LINE_LEN) {
        let ch = if is_printable(byte) { byte } else { REPLACEMENT };
        // Capacity checked by take() above
        let _ = line.push(ch as char);
    }
    line
}

/// Which byte ends a line on a given link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Terminator {
    /// LF ends a line; CR is dropped
    Lf,
    /// CR ends a line; LF is dropped
    Cr,
}

impl Terminator {
    fn ends_line(self, byte: u8) -> bool {
        match self {
            Terminator::Lf => byte == b'\n',
            Terminator::Cr => byte == b'\r',
        }
    }
}

/// Accumulates bytes into lines for links read byte by byte
///
/// Partial lines persist across calls. Empty lines are never emitted and
/// bytes beyond [`MAX_LINE_LEN`] are discarded up to the next terminator.
#[derive(Debug, Clone)]
pub struct LineAssembler {
    buffer: LineBuf,
    terminator: Terminator,
}

impl LineAssembler {
    /// Create an assembler with the given terminator discipline
    pub fn new(terminator: Terminator) -> Self {
        Self {
            buffer: Vec::new(),
            terminator,
        }
    }

    /// Feed a single byte
    ///
    /// Returns `Some(line)` when the byte completes a non-empty line.
    pub fn push(&mut self, byte: u8) -> Option<LineBuf> {
        if self.terminator.ends_line(byte) {
            if self.buffer.is_empty() {
                return None;
            }
            return Some(core::mem::take(&mut self.buffer));
        }

        if is_terminator(byte) {
            // The other terminator is dropped
            return None;
        }

        // Bytes past MAX_LINE_LEN are dropped until the terminator
        let _ = self.buffer.push(byte);
        None
    }

    /// Number of bytes in the current partial line
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Discard the current partial line
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn feed(assembler: &mut LineAssembler, bytes: &[u8]) -> std::vec::Vec<std::vec::Vec<u8>> {
        bytes
            .iter()
            .filter_map(|&b| assembler.push(b))
            .map(|line| line.to_vec())
            .collect()
    }

    #[test]
    fn test_sanitize_replaces_control_and_high_bytes() {
        let line = sanitize_line(b"ok\x00\x7f\xff\x1b[");
        assert_eq!(line.as_str(), "ok????[");
    }

    #[test]
    fn test_sanitize_line_keeps_printable() {
        let line = sanitize_line(b"[MCU] Boot Sequence Complete");
        assert_eq!(line.as_str(), "[MCU] Boot Sequence Complete");
    }

    #[test]
    fn test_lf_discipline_drops_cr() {
        let mut assembler = LineAssembler::new(Terminator::Lf);
        let lines = feed(&mut assembler, b"In3 All\r\nIn4 Vid\n");
        assert_eq!(lines, vec![b"In3 All".to_vec(), b"In4 Vid".to_vec()]);
    }

    #[test]
    fn test_cr_discipline_drops_lf() {
        let mut assembler = LineAssembler::new(Terminator::Cr);
        let lines = feed(&mut assembler, b"PWON\r\nSIGAME\r");
        assert_eq!(lines, vec![b"PWON".to_vec(), b"SIGAME".to_vec()]);
    }

    #[test]
    fn test_partial_line_persists() {
        let mut assembler = LineAssembler::new(Terminator::Lf);
        assert!(feed(&mut assembler, b"Power").is_empty());
        assert_eq!(assembler.pending(), 5);
        let lines = feed(&mut assembler, b" Off\n");
        assert_eq!(lines, vec![b"Power Off".to_vec()]);
        assert_eq!(assembler.pending(), 0);
    }

    #[test]
    fn test_empty_lines_suppressed() {
        let mut assembler = LineAssembler::new(Terminator::Lf);
        assert!(feed(&mut assembler, b"\n\r\n\n").is_empty());
    }

    #[test]
    fn test_overlong_line_truncated() {
        let mut assembler = LineAssembler::new(Terminator::Lf);
        let long = [b'a'; MAX_LINE_LEN + 10];
        assert!(feed(&mut assembler, &long).is_empty());
        assert_eq!(assembler.pending(), MAX_LINE_LEN);
        let lines = feed(&mut assembler, b"\nnext\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), MAX_LINE_LEN);
        assert_eq!(lines[1], b"next".to_vec());
    }

    #[test]
    fn test_clear_discards_partial() {
        let mut assembler = LineAssembler::new(Terminator::Cr);
        feed(&mut assembler, b"garbage");
        assembler.clear();
        let lines = feed(&mut assembler, b"PWSTANDBY\r");
        assert_eq!(lines, vec![b"PWSTANDBY".to_vec()]);
    }

    proptest! {
        #[test]
        fn prop_sanitize_preserves_length(bytes in proptest::collection::vec(any::<u8>(), 0..MAX_LINE_LEN)) {
            let line = sanitize_line(&bytes);
            prop_assert_eq!(line.len(), bytes.len());
            prop_assert!(line.bytes().all(is_printable));
        }

        #[test]
        fn prop_sanitize_keeps_printable_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let line = sanitize_line(&bytes);
            for (before, after) in bytes.iter().zip(line.bytes()) {
                if is_printable(*before) {
                    prop_assert_eq!(*before, after);
                } else {
                    prop_assert_eq!(after, REPLACEMENT);
                }
            }
        }
    }
}
