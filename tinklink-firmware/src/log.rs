//! defmt-backed logger for the bridge components

use core::fmt::{self, Write};

use heapless::String;
use tinklink_core::log::{Level, Log};

/// Longest message forwarded to defmt; the rest is cut off
const MAX_MESSAGE_LEN: usize = 128;

/// Forwards component log records to defmt over RTT
#[derive(Clone, Copy, Default)]
pub struct DefmtLog;

impl Log for DefmtLog {
    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        let mut message: String<MAX_MESSAGE_LEN> = String::new();
        // Truncation is the only possible error
        let _ = Truncating(&mut message).write_fmt(args);

        match level {
            Level::Debug => defmt::debug!("{}", message.as_str()),
            Level::Info => defmt::info!("{}", message.as_str()),
            Level::Warn => defmt::warn!("{}", message.as_str()),
            Level::Error => defmt::error!("{}", message.as_str()),
        }
    }
}

/// Writer that keeps as much of the message as fits
struct Truncating<'a, const N: usize>(&'a mut String<N>);

impl<const N: usize> Write for Truncating<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            self.0.push(c).map_err(|_| fmt::Error)?;
        }
        Ok(())
    }
}
