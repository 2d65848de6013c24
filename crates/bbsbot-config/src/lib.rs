//! bbsbot configuration management
//!
//! Typed configuration for the BBS automation client: connection endpoint,
//! transport kind, charset, timing knobs, and terminal geometry, with
//! layered loading from a TOML file and environment variables.

pub mod error;
pub mod manager;
pub mod types;

pub use error::{ConfigError, Result};
pub use manager::ConfigManager;
pub use types::{ClientConfig, TerminalGeometry};
