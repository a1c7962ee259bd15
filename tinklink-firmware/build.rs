//! Build script for tinklink-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates bridge.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const TRANSPORTS: &[&str] = &["usb", "uart", "network"];
const POLICIES: &[&str] = &["off", "simple", "full"];
const MODES: &[&str] = &["svs", "remote"];
const MAX_TRIGGERS: usize = 16;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate bridge.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=bridge.toml");

    let config_path = Path::new("bridge.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: bridge.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds bridge.toml as its configuration.           ║\n\
            ║  Please create one in the tinklink-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read bridge.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in bridge.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_scaler(&config, &mut errors);
    validate_switcher(&config, &mut errors);
    validate_triggers(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid bridge configuration                             ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=bridge.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn check_choice(
    table: &toml::Table,
    section: &str,
    key: &str,
    allowed: &[&str],
    errors: &mut Vec<String>,
) {
    match table.get(key) {
        None => {}
        Some(toml::Value::String(value)) => {
            if !allowed.contains(&value.to_ascii_lowercase().as_str()) {
                errors.push(format!(
                    "[{}] {} must be one of: {}",
                    section,
                    key,
                    allowed.join(", ")
                ));
            }
        }
        Some(_) => errors.push(format!("[{}] {} must be a string", section, key)),
    }
}

fn check_pin(table: &toml::Table, section: &str, key: &str, errors: &mut Vec<String>) {
    let Some(value) = table.get(key) else {
        return;
    };
    let pin = value
        .as_str()
        .and_then(|s| s.strip_prefix("gpio"))
        .and_then(|n| n.parse::<i64>().ok())
        .filter(|n| (0..30).contains(n));
    if pin.is_none() {
        errors.push(format!("[{}] {} must be \"gpio0\"-\"gpio29\"", section, key));
    }
}

fn validate_scaler(config: &toml::Value, errors: &mut Vec<String>) {
    let scaler = match config.get("scaler") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[scaler] must be a table".to_string());
            return;
        }
        None => return,
    };

    check_choice(scaler, "scaler", "transport", TRANSPORTS, errors);
    check_choice(scaler, "scaler", "power_management", POLICIES, errors);
    check_pin(scaler, "scaler", "uart_tx_pin", errors);
    check_pin(scaler, "scaler", "uart_rx_pin", errors);

    if let Some(toml::Value::Integer(port)) = scaler.get("port") {
        if *port < 1 || *port > 65535 {
            errors.push("[scaler] port must be 1-65535".to_string());
        }
    }

    if scaler.get("transport").and_then(|t| t.as_str()) == Some("network") {
        match scaler.get("host").and_then(|h| h.as_str()) {
            Some(host) if !host.is_empty() && host.len() <= 64 => {}
            _ => errors.push("[scaler] network transport needs a host (max 64 chars)".to_string()),
        }
    }
}

fn validate_switcher(config: &toml::Value, errors: &mut Vec<String>) {
    let switcher = match config.get("switcher") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[switcher] must be a table".to_string());
            return;
        }
        None => return,
    };

    check_pin(switcher, "switcher", "uart_tx_pin", errors);
    check_pin(switcher, "switcher", "uart_rx_pin", errors);
}

/// Validate `[trigger.*]` sections
///
/// The firmware parser also takes `[trigger name]`, but that is not valid
/// TOML, so the embedded file must use the dotted form.
fn validate_triggers(config: &toml::Value, errors: &mut Vec<String>) {
    let triggers = match config.get("trigger") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[trigger.*] sections must be tables".to_string());
            return;
        }
        None => return,
    };

    if triggers.len() > MAX_TRIGGERS {
        errors.push(format!("at most {} triggers are supported", MAX_TRIGGERS));
    }

    for (name, trigger) in triggers {
        let Some(trigger) = trigger.as_table() else {
            errors.push(format!("[trigger.{}] must be a table", name));
            continue;
        };
        let section = format!("trigger.{}", name);
        for key in ["input", "profile"] {
            match trigger.get(key) {
                Some(toml::Value::Integer(n)) if (0..=i64::from(u16::MAX)).contains(n) => {}
                Some(_) => errors.push(format!("[{}] {} must be 0-65535", section, key)),
                None => errors.push(format!("[{}] missing '{}'", section, key)),
            }
        }
        check_choice(trigger, &section, "mode", MODES, errors);
    }
}
