//! Injected logging
//!
//! Components never reach for a global logger. Anything that logs is generic
//! over [`Log`] and receives its logger at construction, so tests can swap in
//! a recording logger and firmware can forward to defmt.

use core::fmt;

/// Log severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

/// Logger sink
pub trait Log {
    /// Emit one formatted message
    fn log(&self, level: Level, args: fmt::Arguments<'_>);
}

impl<L: Log + ?Sized> Log for &L {
    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        (**self).log(level, args)
    }
}

/// Logger that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLog;

impl Log for NullLog {
    fn log(&self, _level: Level, _args: fmt::Arguments<'_>) {}
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log::Log::log(&$logger, $crate::log::Level::Debug, format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log::Log::log(&$logger, $crate::log::Level::Info, format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log::Log::log(&$logger, $crate::log::Level::Warn, format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log::Log::log(&$logger, $crate::log::Level::Error, format_args!($($arg)+))
    };
}

/// Logger that keeps every message, for asserting on log output in tests
///
/// Available to other crates' tests through the `testing` feature.
#[cfg(any(test, feature = "testing"))]
pub mod recording {
    use super::{Level, Log};
    use core::cell::RefCell;
    use core::fmt;
    use std::string::String;
    use std::vec::Vec;

    #[derive(Default)]
    pub struct RecordingLog {
        entries: RefCell<Vec<(Level, String)>>,
    }

    impl RecordingLog {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn contains(&self, level: Level, needle: &str) -> bool {
            self.entries
                .borrow()
                .iter()
                .any(|(l, msg)| *l == level && msg.contains(needle))
        }

        pub fn count(&self, needle: &str) -> usize {
            self.entries
                .borrow()
                .iter()
                .filter(|(_, msg)| msg.contains(needle))
                .count()
        }
    }

    impl Log for RecordingLog {
        fn log(&self, level: Level, args: fmt::Arguments<'_>) {
            self.entries.borrow_mut().push((level, std::format!("{}", args)));
        }
    }
}
