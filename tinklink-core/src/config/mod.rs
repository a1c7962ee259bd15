//! Configuration
//!
//! Bridge configuration types and the TOML-subset parser that builds them.

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ParseError};
pub use types::*;
