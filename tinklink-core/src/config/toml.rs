//! Simple TOML parser for bridge configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! the bridge configuration. It does NOT support the full TOML format and
//! never allocates.
//!
//! Supported features:
//! - Key = value pairs (string, integer)
//! - [section] headers
//! - [section name] and [section.name] headers
//! - Comments (# ...)
//!
//! NOT supported:
//! - Arrays and inline tables
//! - Multi-line strings
//! - Dotted keys outside section headers

use heapless::String as HString;

use super::types::{BridgeConfig, TransportKind};
use crate::scaler::{PowerPolicy, TriggerMapping, TriggerMode};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid section header
    InvalidSection,
    /// Invalid value type
    InvalidValue,
    /// Too many items (exceeded heapless capacity)
    TooManyItems,
    /// Invalid pin string
    InvalidPin,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section<'a> {
    Root,
    Scaler,
    Switcher,
    Trigger(&'a str),
}

/// Trigger section being built
#[derive(Debug, Clone, Copy)]
struct TriggerDraft<'a> {
    input: u16,
    profile: u16,
    mode: TriggerMode,
    name: &'a str,
}

impl<'a> TriggerDraft<'a> {
    fn new(name: &'a str) -> Self {
        Self {
            input: 0,
            profile: 0,
            mode: TriggerMode::IndexedSwitch,
            name,
        }
    }
}

/// Parse a TOML configuration string
pub fn parse_config(input: &str) -> Result<BridgeConfig, ParseError> {
    let mut config = BridgeConfig::new();
    let mut section = Section::Root;
    let mut current_trigger: Option<TriggerDraft<'_>> = None;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Check for section header
        if line.starts_with('[') && line.ends_with(']') {
            save_trigger(&mut config, current_trigger.take())?;

            section = parse_section_header(&line[1..line.len() - 1])?;
            if let Section::Trigger(name) = section {
                current_trigger = Some(TriggerDraft::new(name));
            }
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config, &mut current_trigger)?;
        }
    }

    // Save final section
    save_trigger(&mut config, current_trigger)?;

    Ok(config)
}

/// Parse the text between the brackets of a section header
fn parse_section_header(header: &str) -> Result<Section<'_>, ParseError> {
    let header = header.trim();

    let (section_type, name) = match header.split_once('.') {
        Some((kind, name)) => (kind.trim(), Some(name.trim())),
        None => {
            let mut parts = header.split_whitespace();
            let kind = parts.next().ok_or(ParseError::InvalidSection)?;
            let name = parts.next();
            if parts.next().is_some() {
                return Err(ParseError::InvalidSection);
            }
            (kind, name)
        }
    };

    match (section_type, name) {
        ("scaler", None) => Ok(Section::Scaler),
        ("switcher", None) => Ok(Section::Switcher),
        ("trigger", Some(name)) if !name.is_empty() => Ok(Section::Trigger(name)),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = if let Some(hash_pos) = value.find('#') {
        // Make sure # is not inside a string
        let quote_count = value[..hash_pos].matches('"').count();
        if quote_count % 2 == 0 {
            value[..hash_pos].trim()
        } else {
            value
        }
    } else {
        value
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a pin string like "gpio4"
fn parse_pin(value: &str) -> Result<u8, ParseError> {
    let number = parse_string(value)
        .strip_prefix("gpio")
        .ok_or(ParseError::InvalidPin)?;
    number.parse().map_err(|_| ParseError::InvalidPin)
}

fn parse_transport(value: &str) -> Result<TransportKind, ParseError> {
    TransportKind::from_config(parse_string(value)).ok_or(ParseError::InvalidValue)
}

fn parse_policy(value: &str) -> Result<PowerPolicy, ParseError> {
    PowerPolicy::from_config(parse_string(value)).ok_or(ParseError::InvalidValue)
}

fn parse_mode(value: &str) -> Result<TriggerMode, ParseError> {
    TriggerMode::from_config(parse_string(value)).ok_or(ParseError::InvalidValue)
}

/// Apply a key-value pair to the current section
fn apply_value<'a>(
    section: Section<'a>,
    key: &str,
    value: &'a str,
    config: &mut BridgeConfig,
    current_trigger: &mut Option<TriggerDraft<'a>>,
) -> Result<(), ParseError> {
    match section {
        Section::Scaler => match key {
            "transport" => config.scaler.transport = parse_transport(value)?,
            "power_management" => config.scaler.power_policy = parse_policy(value)?,
            "uart_tx_pin" => config.scaler.uart.tx = parse_pin(value)?,
            "uart_rx_pin" => config.scaler.uart.rx = parse_pin(value)?,
            "host" => {
                config.scaler.network.host =
                    HString::try_from(parse_string(value)).map_err(|_| ParseError::InvalidValue)?;
            }
            "port" => config.scaler.network.port = parse_int(value)?,
            _ => {}
        },
        Section::Switcher => match key {
            "uart_tx_pin" => config.switcher.uart.tx = parse_pin(value)?,
            "uart_rx_pin" => config.switcher.uart.rx = parse_pin(value)?,
            _ => {}
        },
        Section::Trigger(_) => {
            if let Some(trigger) = current_trigger.as_mut() {
                match key {
                    "input" => trigger.input = parse_int(value)?,
                    "profile" => trigger.profile = parse_int(value)?,
                    "mode" => trigger.mode = parse_mode(value)?,
                    "name" => trigger.name = parse_string(value),
                    _ => {}
                }
            }
        }
        Section::Root => {}
    }
    Ok(())
}

/// Add a finished trigger section to the table
///
/// Triggers without an input or profile are skipped.
fn save_trigger(
    config: &mut BridgeConfig,
    trigger: Option<TriggerDraft<'_>>,
) -> Result<(), ParseError> {
    let Some(trigger) = trigger else {
        return Ok(());
    };
    if trigger.input == 0 || trigger.profile == 0 {
        return Ok(());
    }
    config
        .triggers
        .push(TriggerMapping::new(
            trigger.input,
            trigger.profile,
            trigger.mode,
            trigger.name,
        ))
        .map_err(|_| ParseError::TooManyItems)
}
