//! Embedded bridge configuration
//!
//! `bridge.toml` is compiled into the image and checked by the build
//! script; parsing happens once at startup.

use defmt::*;
use tinklink_core::config::{parse_config, BridgeConfig};

/// Embedded configuration (compiled into firmware)
/// Edit bridge.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../bridge.toml");

/// Parse and check the embedded configuration
///
/// Falls back to the defaults (USB transport, no triggers) when the file
/// does not parse or is inconsistent, so the bridge still boots.
pub fn load() -> BridgeConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("Config parse failed: {:?}, using defaults", Debug2Format(&e));
            return BridgeConfig::default();
        }
    };

    if let Err(e) = config.validate() {
        error!("Config invalid: {:?}, using defaults", Debug2Format(&e));
        return BridgeConfig::default();
    }

    info!(
        "Config: transport={}, power={}, {} triggers",
        config.scaler.transport.as_str(),
        config.scaler.power_policy.as_str(),
        config.triggers.len()
    );
    config
}
